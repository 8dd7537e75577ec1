//! Native runner: one configured wallet announces itself on an in-memory
//! bus and its button is clicked, as a user would in the browser.

use eyre::{Result, WrapErr};
use tokio::task::LocalSet;
use tracing::info;

use local_sign_adapters::{
    Eip1193Adapter, HttpServerAdapter, InMemoryProviderList, LocalSignConfig, LocalSpawner,
};
use local_sign_core::{
    ConnectWorkflow, InMemoryEventBus, ProviderDetail, ProviderInfo, ProviderRegistry,
};

pub const DEFAULT_WALLET_NAME: &str = "Local Wallet";

/// Lists the configured wallet, selects it and waits until the workflow has finished.
pub async fn run(config: LocalSignConfig) -> Result<InMemoryProviderList> {
    let wallet_name = config
        .wallet_name
        .clone()
        .unwrap_or_else(|| DEFAULT_WALLET_NAME.to_owned());
    let wallet = Eip1193Adapter::with_config(config.clone());
    info!(
        wallet = %wallet_name,
        mode = wallet.mode_name(),
        origin = %config.server_origin,
        "starting headless run"
    );

    let bus = InMemoryEventBus::new();
    let announcer = bus.clone();
    let info = ProviderInfo {
        uuid: String::new(),
        name: wallet_name.clone(),
        icon: String::new(),
        rdns: "local-sign.headless".to_owned(),
    };
    bus.on_provider_request(Box::new(move || {
        announcer.announce(ProviderDetail {
            info: info.clone(),
            provider: wallet.clone(),
        })
    }));

    let server = HttpServerAdapter::with_config(&config).wrap_err("building server client")?;
    let registry = ProviderRegistry::new(bus, ConnectWorkflow::new(server), LocalSpawner);
    let list = InMemoryProviderList::default();

    let local = LocalSet::new();
    local
        .run_until(async {
            registry.list_providers(list.clone())?;
            list.click_by_name(&wallet_name)
        })
        .await
        .wrap_err("selecting wallet")?;
    local.await;
    Ok(list)
}
