use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use thiserror::Error;

use crate::domain::{CompletionSignal, ProviderButton, TxParams, TxRequest};

/// EIP-1193 error code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Failure reported by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("user rejected the request (code {code}): {message}")]
    UserRejected { code: i64, message: String },
    #[error("provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Classifies an EIP-1193 / JSON-RPC error by its code.
    pub fn from_rpc(code: Option<i64>, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            Some(USER_REJECTED_CODE) => Self::UserRejected {
                code: USER_REJECTED_CODE,
                message,
            },
            Some(code) => Self::Other(format!("{message} (code {code})")),
            None => Self::Other(message),
        }
    }

    pub fn is_user_rejected(&self) -> bool {
        matches!(self, Self::UserRejected { .. })
    }
}

/// Wallet capability handle carried by an announcement.
#[async_trait(?Send)]
pub trait ProviderPort {
    /// `eth_requestAccounts`; accounts in wallet order.
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;
    /// `eth_sendTransaction`; resolves with the transaction hash.
    async fn send_transaction(&self, tx: &TxRequest) -> Result<String, ProviderError>;
}

/// The same-origin server that hands out parameters and collects the outcome.
#[async_trait(?Send)]
pub trait ServerPort {
    async fn fetch_params(&self) -> Result<TxParams, PortError>;
    async fn report_done(&self, signal: &CompletionSignal) -> Result<(), PortError>;
}

pub type ClickHandler = Box<dyn Fn()>;

/// Container the provider buttons are appended to.
pub trait ProviderListPort {
    fn append_button(&self, button: ProviderButton, on_click: ClickHandler)
        -> Result<(), PortError>;
}

/// Runs click-triggered workflows on the current thread.
pub trait TaskSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
