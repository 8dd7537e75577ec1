use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{CompletionSignal, ProviderDetail, TxRequest};
use crate::ports::{PortError, ProviderError, ProviderPort, ServerPort};

/// Failures before the transaction reaches the wallet. None of them is reported to the server.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("account request failed")]
    Accounts(#[source] ProviderError),
    #[error("transaction parameter fetch failed")]
    Params(#[source] PortError),
}

#[derive(Debug)]
pub enum ConnectOutcome {
    /// The wallet was asked to send and the server was told how that went.
    Reported(CompletionSignal),
    /// Stopped before submission; nothing was reported.
    Aborted(ConnectError),
}

impl ConnectOutcome {
    pub fn signal(&self) -> Option<&CompletionSignal> {
        match self {
            Self::Reported(signal) => Some(signal),
            Self::Aborted(_) => None,
        }
    }
}

/// Connect, fetch parameters, send through the wallet, report.
#[derive(Debug)]
pub struct ConnectWorkflow<S> {
    server: S,
}

impl<S: ServerPort> ConnectWorkflow<S> {
    pub fn new(server: S) -> Self {
        Self { server }
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    /// Runs one connect attempt against the announced provider.
    ///
    /// Account and parameter failures are logged and end in
    /// [`ConnectOutcome::Aborted`]. Once the transaction is handed to the
    /// wallet exactly one completion signal is reported, the hash on
    /// success and `rejected` on any provider error. Only a failing report
    /// surfaces as `Err`.
    pub async fn connect<P: ProviderPort>(
        &self,
        detail: &ProviderDetail<P>,
    ) -> Result<ConnectOutcome, PortError> {
        let wallet = detail.info.name.as_str();
        let tx = match self.prepare(&detail.provider).await {
            Ok(tx) => tx,
            Err(e) => {
                error!(
                    wallet,
                    error = %e,
                    cause = %source_of(&e),
                    "failed to connect to provider"
                );
                return Ok(ConnectOutcome::Aborted(e));
            }
        };

        let signal = match detail.provider.send_transaction(&tx).await {
            Ok(hash) => {
                info!(wallet, tx_hash = %hash, "transaction sent");
                CompletionSignal::TxHash(hash)
            }
            Err(e) => {
                error!(
                    wallet,
                    error = %e,
                    user_rejected = e.is_user_rejected(),
                    "transaction submission failed"
                );
                CompletionSignal::Rejected
            }
        };

        self.server.report_done(&signal).await?;
        info!(wallet, tx_hash = signal.as_query_value(), "completion reported");
        Ok(ConnectOutcome::Reported(signal))
    }

    async fn prepare<P: ProviderPort>(&self, provider: &P) -> Result<TxRequest, ConnectError> {
        let from = provider
            .request_accounts()
            .await
            .map_err(ConnectError::Accounts)?
            .into_iter()
            .next();
        if from.is_none() {
            warn!("provider returned no accounts; sending without a from address");
        }
        let params = self
            .server
            .fetch_params()
            .await
            .map_err(ConnectError::Params)?;
        Ok(TxRequest::new(params, from))
    }
}

fn source_of(e: &ConnectError) -> String {
    std::error::Error::source(e)
        .map(ToString::to_string)
        .unwrap_or_default()
}
