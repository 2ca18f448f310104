use std::path::PathBuf;

/// Start the action server. Runs until the server errors or ctrl-c.
pub fn run(config: &[PathBuf], port: u16) -> anyhow::Result<()> {
    let registry = super::load_registry(config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let engine = super::connect_engine().await?;
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;

        tokio::select! {
            result = fanout_server::serve_on(registry, engine, listener) => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
