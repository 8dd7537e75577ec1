#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use serde_json::json;

use local_sign_core::{
    ClickHandler, CompletionSignal, ConnectWorkflow, InMemoryEventBus, PortError, ProviderButton,
    ProviderDetail, ProviderError, ProviderInfo, ProviderListPort, ProviderPort, ProviderRegistry,
    ServerPort, TaskSpawner, TxParams, TxRequest,
};

pub const ACCOUNT: &str = "0x1000000000000000000000000000000000000001";

/// Wallet double with scripted answers and call counters.
#[derive(Clone)]
pub struct ScriptedProvider {
    pub accounts: Result<Vec<String>, ProviderError>,
    pub send: Result<String, ProviderError>,
    pub account_calls: Rc<Cell<usize>>,
    pub sent: Rc<RefCell<Vec<TxRequest>>>,
}

impl ScriptedProvider {
    pub fn sending(hash: &str) -> Self {
        Self {
            accounts: Ok(vec![
                ACCOUNT.to_owned(),
                "0x2000000000000000000000000000000000000002".to_owned(),
            ]),
            send: Ok(hash.to_owned()),
            account_calls: Rc::new(Cell::new(0)),
            sent: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn rejecting_send(err: ProviderError) -> Self {
        Self {
            send: Err(err),
            ..Self::sending("unused")
        }
    }

    pub fn rejecting_accounts(err: ProviderError) -> Self {
        Self {
            accounts: Err(err),
            ..Self::sending("unused")
        }
    }
}

#[async_trait(?Send)]
impl ProviderPort for ScriptedProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.account_calls.set(self.account_calls.get() + 1);
        self.accounts.clone()
    }

    async fn send_transaction(&self, tx: &TxRequest) -> Result<String, ProviderError> {
        self.sent.borrow_mut().push(tx.clone());
        self.send.clone()
    }
}

/// Server double recording every `/done` report.
#[derive(Clone)]
pub struct RecordingServer {
    pub params_status: Option<u16>,
    pub done_status: Option<u16>,
    pub params_calls: Rc<Cell<usize>>,
    pub reports: Rc<RefCell<Vec<CompletionSignal>>>,
}

impl Default for RecordingServer {
    fn default() -> Self {
        Self {
            params_status: None,
            done_status: None,
            params_calls: Rc::new(Cell::new(0)),
            reports: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl RecordingServer {
    pub fn failing_params(status: u16) -> Self {
        Self {
            params_status: Some(status),
            ..Self::default()
        }
    }

    pub fn failing_done(status: u16) -> Self {
        Self {
            done_status: Some(status),
            ..Self::default()
        }
    }

    pub fn reports(&self) -> Vec<CompletionSignal> {
        self.reports.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ServerPort for RecordingServer {
    async fn fetch_params(&self) -> Result<TxParams, PortError> {
        self.params_calls.set(self.params_calls.get() + 1);
        if let Some(status) = self.params_status {
            return Err(PortError::Status {
                status,
                url: "/params".to_owned(),
            });
        }
        Ok(sample_params())
    }

    async fn report_done(&self, signal: &CompletionSignal) -> Result<(), PortError> {
        self.reports.borrow_mut().push(signal.clone());
        if let Some(status) = self.done_status {
            return Err(PortError::Status {
                status,
                url: "/done".to_owned(),
            });
        }
        Ok(())
    }
}

/// Button container double.
#[derive(Clone, Default)]
pub struct RecordingList {
    entries: Rc<RefCell<Vec<(ProviderButton, Rc<dyn Fn()>)>>>,
}

impl RecordingList {
    pub fn buttons(&self) -> Vec<ProviderButton> {
        self.entries.borrow().iter().map(|(b, _)| b.clone()).collect()
    }

    pub fn click(&self, index: usize) {
        let handler = Rc::clone(&self.entries.borrow()[index].1);
        handler();
    }
}

impl ProviderListPort for RecordingList {
    fn append_button(&self, button: ProviderButton, on_click: ClickHandler) -> Result<(), PortError> {
        self.entries.borrow_mut().push((button, Rc::from(on_click)));
        Ok(())
    }
}

/// Hands spawned workflows to a `LocalPool` the test drives.
pub struct PoolSpawner(pub LocalSpawner);

impl TaskSpawner for PoolSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.0.spawn_local(task).expect("spawn on local pool");
    }
}

pub type TestRegistry = ProviderRegistry<InMemoryEventBus<ScriptedProvider>, RecordingServer, PoolSpawner>;

pub fn new_registry(server: RecordingServer) -> (TestRegistry, LocalPool) {
    let pool = LocalPool::new();
    let registry = ProviderRegistry::new(
        InMemoryEventBus::new(),
        ConnectWorkflow::new(server),
        PoolSpawner(pool.spawner()),
    );
    (registry, pool)
}

pub fn info(name: &str, icon: &str) -> ProviderInfo {
    ProviderInfo {
        uuid: format!("{name}-uuid"),
        name: name.to_owned(),
        icon: icon.to_owned(),
        rdns: format!("io.{}", name.to_ascii_lowercase()),
    }
}

pub fn detail(name: &str, provider: ScriptedProvider) -> ProviderDetail<ScriptedProvider> {
    ProviderDetail {
        info: info(name, &format!("{name}.png")),
        provider,
    }
}

pub fn sample_params() -> TxParams {
    serde_json::from_value(json!({
        "to": "0x000000000000000000000000000000000000CAFE",
        "value": "0x0",
        "data": "0xdeadbeef",
        "chainId": "0x1"
    }))
    .expect("valid params fixture")
}
