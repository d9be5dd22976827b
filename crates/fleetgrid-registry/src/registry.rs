//! NodeRegistry — lock-guarded node map with typed mutations.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fleet_core::{Node, NodeId};
use tracing::{debug, info, warn};

use crate::error::{RegistryError, RegistryResult};

/// Thread-safe registry of worker nodes, keyed and ordered by id.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: RwLock<BTreeMap<NodeId, Node>>,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the given nodes.
    ///
    /// Fails with `DuplicateNode` if two seed nodes share an id.
    pub fn with_nodes(nodes: impl IntoIterator<Item = Node>) -> RegistryResult<Self> {
        let mut map = BTreeMap::new();
        for node in nodes {
            if map.contains_key(&node.id) {
                return Err(RegistryError::DuplicateNode(node.id));
            }
            map.insert(node.id.clone(), node);
        }
        debug!(count = map.len(), "node registry seeded");
        Ok(Self {
            nodes: RwLock::new(map),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<NodeId, Node>> {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<NodeId, Node>> {
        self.nodes.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Every node with available capacity strictly greater than zero.
    ///
    /// An empty map is a valid result.
    pub fn available_nodes(&self) -> BTreeMap<NodeId, Node> {
        self.read()
            .iter()
            .filter(|(_, node)| node.available_capacity > 0)
            .map(|(id, node)| (id.clone(), node.clone()))
            .collect()
    }

    /// All registered nodes, regardless of capacity, in id order.
    pub fn nodes(&self) -> Vec<Node> {
        self.read().values().cloned().collect()
    }

    /// Snapshot of a single node.
    pub fn node(&self, node_id: &str) -> Option<Node> {
        self.read().get(node_id).cloned()
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.read().contains_key(node_id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // ── Mutations ──────────────────────────────────────────────────

    /// Register a new node with a fresh heartbeat.
    pub fn add_node(&self, node_id: &str, capacity: u64) -> RegistryResult<()> {
        let mut nodes = self.write();
        if nodes.contains_key(node_id) {
            warn!(%node_id, "node already exists");
            return Err(RegistryError::DuplicateNode(node_id.to_string()));
        }
        nodes.insert(node_id.to_string(), Node::new(node_id, capacity));
        info!(%node_id, capacity, "node added");
        Ok(())
    }

    /// Remove a node. Later commits against it fail with `NodeNotFound`.
    pub fn remove_node(&self, node_id: &str) -> RegistryResult<Node> {
        match self.write().remove(node_id) {
            Some(node) => {
                info!(%node_id, "node removed");
                Ok(node)
            }
            None => Err(not_found(node_id)),
        }
    }

    /// Overwrite a node's available capacity (absolute, not a delta).
    pub fn update_capacity(&self, node_id: &str, new_capacity: u64) -> RegistryResult<()> {
        let mut nodes = self.write();
        let node = nodes.get_mut(node_id).ok_or_else(|| not_found(node_id))?;
        node.available_capacity = new_capacity;
        info!(%node_id, capacity = new_capacity, "node capacity updated");
        Ok(())
    }

    /// Overwrite a node's heartbeat age.
    pub fn set_heartbeat_age(&self, node_id: &str, age: u64) -> RegistryResult<()> {
        let mut nodes = self.write();
        let node = nodes.get_mut(node_id).ok_or_else(|| not_found(node_id))?;
        node.heartbeat_age = age;
        debug!(%node_id, age, "heartbeat age updated");
        Ok(())
    }

    /// Atomically check and decrement a node's capacity for an allocation.
    ///
    /// Returns the capacity left on the node. The node is untouched when
    /// the allocation is rejected.
    pub fn commit_allocation(&self, node_id: &str, required: u64) -> RegistryResult<u64> {
        let mut nodes = self.write();
        let node = nodes.get_mut(node_id).ok_or_else(|| not_found(node_id))?;

        let Some(remaining) = node.available_capacity.checked_sub(required) else {
            warn!(
                %node_id,
                available = node.available_capacity,
                required,
                "allocation rejected: insufficient capacity"
            );
            return Err(RegistryError::InsufficientCapacity {
                node_id: node_id.to_string(),
                available: node.available_capacity,
                required,
            });
        };

        node.available_capacity = remaining;
        debug!(%node_id, required, remaining, "allocation committed");
        Ok(remaining)
    }
}

fn not_found(node_id: &str) -> RegistryError {
    warn!(%node_id, "node not found");
    RegistryError::NodeNotFound(node_id.to_string())
}
