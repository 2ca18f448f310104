pub mod batch;
pub mod check;
pub mod serve;

use anyhow::{anyhow, bail, Context};
use fanout_core::{Engine, Registry, ReqwestCaller};
use fanout_kube::KubeInventory;
use std::path::PathBuf;
use std::sync::Arc;

/// Load and validate the config files, failing fast when none were given.
pub fn load_registry(config: &[PathBuf]) -> anyhow::Result<Arc<Registry>> {
    if config.is_empty() {
        bail!("no config files given; pass at least one --config <FILE>");
    }
    let registry = Registry::load(config).context("failed to load config")?;
    Ok(Arc::new(registry))
}

/// Build an engine wired to the real cluster and real HTTP stack.
pub async fn connect_engine() -> anyhow::Result<Engine> {
    let inventory = KubeInventory::connect()
        .await
        .map_err(|e| anyhow!("failed to create kubernetes client: {e}"))?;
    Ok(Engine::new(
        Arc::new(inventory),
        Arc::new(ReqwestCaller::new()),
    ))
}
