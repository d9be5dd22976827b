//! Health evaluation over the node registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fleet_core::config::HealthSettings;
use fleet_core::{Node, NodeId};
use fleetgrid_registry::NodeRegistry;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Health classification of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// A node is healthy iff it has capacity left and its heartbeat is no
/// older than `threshold`.
pub fn is_node_healthy(node: &Node, threshold: u64) -> bool {
    node.available_capacity > 0 && node.heartbeat_age <= threshold
}

#[derive(Debug, Default)]
struct HealthTable {
    statuses: HashMap<NodeId, HealthStatus>,
    unhealthy: Vec<NodeId>,
}

impl HealthTable {
    fn mark_healthy(&mut self, node_id: &str) {
        self.unhealthy.retain(|id| id != node_id);
    }

    fn mark_unhealthy(&mut self, node_id: &str) {
        if !self.unhealthy.iter().any(|id| id == node_id) {
            self.unhealthy.push(node_id.to_string());
        }
    }
}

/// Classifies registered nodes and tracks which ones are unhealthy.
#[derive(Debug)]
pub struct HealthEvaluator {
    registry: Arc<NodeRegistry>,
    check_interval_threshold: u64,
    table: Mutex<HealthTable>,
}

impl HealthEvaluator {
    pub fn new(registry: Arc<NodeRegistry>, check_interval_threshold: u64) -> Self {
        Self {
            registry,
            check_interval_threshold,
            table: Mutex::new(HealthTable::default()),
        }
    }

    pub fn from_config(registry: Arc<NodeRegistry>, settings: &HealthSettings) -> Self {
        Self::new(registry, settings.check_interval_threshold)
    }

    pub fn check_interval_threshold(&self) -> u64 {
        self.check_interval_threshold
    }

    fn table(&self) -> MutexGuard<'_, HealthTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Classify every registered node and update the unhealthy set.
    pub fn run_health_check_pass(&self) {
        let nodes = self.registry.nodes();
        let mut table = self.table();

        for node in &nodes {
            let status = if is_node_healthy(node, self.check_interval_threshold) {
                HealthStatus::Healthy
            } else {
                HealthStatus::Unhealthy
            };
            let previous = table.statuses.insert(node.id.clone(), status);

            match status {
                HealthStatus::Healthy => {
                    table.mark_healthy(&node.id);
                    if previous == Some(HealthStatus::Unhealthy) {
                        info!(node_id = %node.id, "node recovered to healthy");
                    } else {
                        debug!(node_id = %node.id, "node is healthy");
                    }
                }
                HealthStatus::Unhealthy => {
                    table.mark_unhealthy(&node.id);
                    if previous != Some(HealthStatus::Unhealthy) {
                        warn!(
                            node_id = %node.id,
                            capacity = node.available_capacity,
                            heartbeat_age = node.heartbeat_age,
                            threshold = self.check_interval_threshold,
                            "node is unhealthy"
                        );
                    } else {
                        debug!(node_id = %node.id, "node still unhealthy");
                    }
                }
            }
        }

        // Forget nodes that have left the registry.
        let HealthTable { statuses, unhealthy } = &mut *table;
        statuses.retain(|id, _| nodes.iter().any(|n| &n.id == id));
        unhealthy.retain(|id| statuses.contains_key(id));

        debug!(
            evaluated = nodes.len(),
            unhealthy = table.unhealthy.len(),
            "health check pass complete"
        );
    }

    /// Copy of the current unhealthy set, in the order nodes were flagged.
    pub fn unhealthy_nodes(&self) -> Vec<NodeId> {
        self.table().unhealthy.clone()
    }

    /// Last classification of a node, or `None` if it was never evaluated.
    pub fn status(&self, node_id: &str) -> Option<HealthStatus> {
        self.table().statuses.get(node_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_registry() -> Arc<NodeRegistry> {
        Arc::new(
            NodeRegistry::with_nodes([
                Node::new("Node1", 100).with_heartbeat_age(2000),
                Node::new("Node2", 0).with_heartbeat_age(6000),
                Node::new("Node3", 50).with_heartbeat_age(3000),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let node = Node::new("n1", 10).with_heartbeat_age(5000);
        assert!(is_node_healthy(&node, 5000));
        assert!(!is_node_healthy(&node.clone().with_heartbeat_age(5001), 5000));
    }

    #[test]
    fn zero_capacity_is_unhealthy_even_when_fresh() {
        let node = Node::new("n1", 0);
        assert!(!is_node_healthy(&node, 5000));
    }

    #[test]
    fn pass_flags_zero_capacity_node() {
        let evaluator = HealthEvaluator::new(scenario_registry(), 5000);
        evaluator.run_health_check_pass();

        assert_eq!(evaluator.unhealthy_nodes(), vec!["Node2".to_string()]);
        assert_eq!(evaluator.status("Node1"), Some(HealthStatus::Healthy));
        assert_eq!(evaluator.status("Node2"), Some(HealthStatus::Unhealthy));
    }

    #[test]
    fn status_unknown_before_first_pass() {
        let evaluator = HealthEvaluator::new(scenario_registry(), 5000);
        assert_eq!(evaluator.status("Node1"), None);
        assert!(evaluator.unhealthy_nodes().is_empty());
    }

    #[test]
    fn repeated_passes_never_duplicate() {
        let evaluator = HealthEvaluator::new(scenario_registry(), 5000);
        for _ in 0..5 {
            evaluator.run_health_check_pass();
        }
        assert_eq!(evaluator.unhealthy_nodes(), vec!["Node2".to_string()]);
    }

    #[test]
    fn unhealthy_node_stays_flagged_until_recovery() {
        let registry = scenario_registry();
        let evaluator = HealthEvaluator::new(registry.clone(), 5000);

        registry.set_heartbeat_age("Node3", 9000).unwrap();
        evaluator.run_health_check_pass();
        assert_eq!(
            evaluator.unhealthy_nodes(),
            vec!["Node2".to_string(), "Node3".to_string()]
        );

        // Node2 recovers; Node3 remains stale.
        registry.update_capacity("Node2", 10).unwrap();
        registry.set_heartbeat_age("Node2", 100).unwrap();
        evaluator.run_health_check_pass();
        assert_eq!(evaluator.unhealthy_nodes(), vec!["Node3".to_string()]);
        assert_eq!(evaluator.status("Node2"), Some(HealthStatus::Healthy));

        registry.set_heartbeat_age("Node3", 0).unwrap();
        evaluator.run_health_check_pass();
        assert!(evaluator.unhealthy_nodes().is_empty());
    }

    #[test]
    fn unhealthy_nodes_returns_a_copy() {
        let evaluator = HealthEvaluator::new(scenario_registry(), 5000);
        evaluator.run_health_check_pass();

        let mut copy = evaluator.unhealthy_nodes();
        copy.clear();
        copy.push("bogus".to_string());

        assert_eq!(evaluator.unhealthy_nodes(), vec!["Node2".to_string()]);
    }

    #[test]
    fn removed_nodes_are_forgotten() {
        let registry = scenario_registry();
        let evaluator = HealthEvaluator::new(registry.clone(), 5000);
        evaluator.run_health_check_pass();
        assert_eq!(evaluator.unhealthy_nodes().len(), 1);

        registry.remove_node("Node2").unwrap();
        evaluator.run_health_check_pass();
        assert!(evaluator.unhealthy_nodes().is_empty());
        assert_eq!(evaluator.status("Node2"), None);
    }

    #[test]
    fn pass_never_mutates_capacity() {
        let registry = scenario_registry();
        let before = registry.nodes();
        HealthEvaluator::new(registry.clone(), 1).run_health_check_pass();
        assert_eq!(registry.nodes(), before);
    }

    #[test]
    fn from_config_uses_threshold() {
        let settings = HealthSettings {
            check_interval_threshold: 2500,
        };
        let evaluator = HealthEvaluator::from_config(scenario_registry(), &settings);
        assert_eq!(evaluator.check_interval_threshold(), 2500);

        evaluator.run_health_check_pass();
        // Node3 (3000) is now stale too.
        assert_eq!(
            evaluator.unhealthy_nodes(),
            vec!["Node2".to_string(), "Node3".to_string()]
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }
}
