//! Shared types used across fleetgrid crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a worker node.
pub type NodeId = String;

/// Identifier for a task, unique within a batch.
pub type TaskId = String;

// ── Node ──────────────────────────────────────────────────────────

/// A worker node with its remaining capacity and liveness signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Capacity still available for new tasks.
    pub available_capacity: u64,
    /// Time units since the last heartbeat was observed. Lower is fresher.
    #[serde(default)]
    pub heartbeat_age: u64,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, available_capacity: u64) -> Self {
        Self {
            id: id.into(),
            available_capacity,
            heartbeat_age: 0,
        }
    }

    pub fn with_heartbeat_age(mut self, heartbeat_age: u64) -> Self {
        self.heartbeat_age = heartbeat_age;
        self
    }

    /// Whether this node can take a task without going below zero.
    pub fn fits(&self, task: &Task) -> bool {
        self.available_capacity >= task.required_capacity
    }
}

// ── Task ──────────────────────────────────────────────────────────

/// A unit of work. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    required_capacity: u64,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, required_capacity: u64) -> Self {
        Self {
            id: id.into(),
            required_capacity,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn required_capacity(&self) -> u64 {
        self.required_capacity
    }
}

// ── Allocation policy ─────────────────────────────────────────────

/// Which allocation strategy the dispatcher uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// Pick the eligible node with the most remaining capacity.
    #[default]
    BestFit,
    /// Cycle through nodes, starting after the last one used.
    RoundRobin,
}

impl AllocationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationPolicy::BestFit => "best_fit",
            AllocationPolicy::RoundRobin => "round_robin",
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown allocation policy: {0} (expected best_fit or round_robin)")]
pub struct ParsePolicyError(String);

impl FromStr for AllocationPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "best_fit" => Ok(AllocationPolicy::BestFit),
            "round_robin" => Ok(AllocationPolicy::RoundRobin),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}
