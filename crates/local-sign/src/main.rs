//! local-sign: headless native runner. The browser build starts from the library's wasm entry point.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting local-sign");

    let config = local_sign_adapters::LocalSignConfig::from_env();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let list = runtime.block_on(local_sign::headless::run(config))?;

    tracing::info!(buttons = list.len(), "headless run finished");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
