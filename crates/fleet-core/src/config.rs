//! fleet.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::{AllocationPolicy, Node, Task};

/// Default heartbeat-age threshold for the health check.
pub const DEFAULT_CHECK_INTERVAL_THRESHOLD: u64 = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub health: HealthSettings,
    #[serde(default)]
    pub dispatch: DispatchSettings,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSettings {
    /// Nodes whose heartbeat age exceeds this are unhealthy.
    pub check_interval_threshold: u64,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            check_interval_threshold: DEFAULT_CHECK_INTERVAL_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchSettings {
    #[serde(default)]
    pub policy: AllocationPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    pub capacity: u64,
    #[serde(default)]
    pub heartbeat_age: u64,
}

impl From<&NodeConfig> for Node {
    fn from(cfg: &NodeConfig) -> Self {
        Node::new(cfg.id.clone(), cfg.capacity).with_heartbeat_age(cfg.heartbeat_age)
    }
}

impl FleetConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: FleetConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Registry seed nodes built from the `[[nodes]]` tables.
    pub fn seed_nodes(&self) -> Vec<Node> {
        self.nodes.iter().map(Node::from).collect()
    }

    /// Scaffold a small three-node fleet with a three-task batch.
    pub fn scaffold() -> Self {
        let node = |id: &str, capacity| NodeConfig {
            id: id.to_string(),
            capacity,
            heartbeat_age: 0,
        };
        FleetConfig {
            health: HealthSettings::default(),
            dispatch: DispatchSettings::default(),
            nodes: vec![node("Node1", 100), node("Node2", 150), node("Node3", 200)],
            tasks: vec![
                Task::new("Task1", 50),
                Task::new("Task2", 120),
                Task::new("Task3", 75),
            ],
        }
    }
}
