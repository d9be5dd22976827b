pub mod health;
pub mod init;
pub mod run;

use std::path::Path;
use std::sync::Arc;

use fleet_core::FleetConfig;
use fleetgrid_registry::NodeRegistry;
use tracing::info;

/// Load `fleet.toml` from `path`, or fall back to the scaffold fleet.
pub fn load_config(path: Option<&str>) -> anyhow::Result<FleetConfig> {
    match path {
        Some(path) => {
            let config = FleetConfig::from_file(Path::new(path))?;
            info!(%path, nodes = config.nodes.len(), tasks = config.tasks.len(), "config loaded");
            Ok(config)
        }
        None => Ok(FleetConfig::scaffold()),
    }
}

pub fn build_registry(config: &FleetConfig) -> anyhow::Result<Arc<NodeRegistry>> {
    Ok(Arc::new(NodeRegistry::with_nodes(config.seed_nodes())?))
}
