//! Dispatcher — places a batch of tasks onto registry nodes.
//!
//! One batch works against a single snapshot of the available nodes.
//! After every successful commit the dispatcher writes the capacity the
//! registry reports back into its snapshot, so later tasks in the batch
//! see earlier assignments. A commit that the registry rejects (the node
//! was removed or resized underneath us) is reported for that task and
//! the snapshot entry is corrected; the batch continues.

use std::sync::Arc;

use fleet_core::{AllocationPolicy, Node, NodeId, Task, TaskId};
use fleetgrid_placement::select;
use fleetgrid_registry::{NodeRegistry, RegistryError};
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::error::{SchedulerError, SchedulerResult};
use crate::load_balancer::RoundRobinCursor;

/// A task placed on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub task_id: TaskId,
    pub node_id: NodeId,
    /// Capacity left on the node after this task.
    pub remaining_capacity: u64,
}

/// A task that was not placed, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unallocated {
    pub task_id: TaskId,
    #[serde(serialize_with = "serialize_display")]
    pub reason: SchedulerError,
}

/// Outcome of one `distribute_tasks` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub assignments: Vec<Assignment>,
    pub unallocated: Vec<Unallocated>,
    /// The available-node snapshot was empty; no task was attempted.
    pub no_nodes_available: bool,
}

impl DispatchReport {
    /// The batch-level condition, if the batch was short-circuited.
    pub fn condition(&self) -> Option<SchedulerError> {
        self.no_nodes_available.then_some(SchedulerError::NoNodesAvailable)
    }

    /// Node the given task landed on, if it was placed.
    pub fn node_for(&self, task_id: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.task_id == task_id)
            .map(|a| a.node_id.as_str())
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }
}

/// Assigns tasks to nodes under a fixed allocation policy.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<NodeRegistry>,
    policy: AllocationPolicy,
    cursor: RoundRobinCursor,
}

impl Dispatcher {
    pub fn new(registry: Arc<NodeRegistry>, policy: AllocationPolicy) -> Self {
        Self {
            registry,
            policy,
            cursor: RoundRobinCursor::new(),
        }
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    /// Round-robin position, carried across batches.
    pub fn cursor(&self) -> &RoundRobinCursor {
        &self.cursor
    }

    /// Place each task, in order, on a node from the available snapshot.
    ///
    /// Never fails as a whole: an empty snapshot sets `no_nodes_available`,
    /// and a task that cannot be placed is listed in `unallocated`.
    pub fn distribute_tasks(&self, tasks: &[Task]) -> DispatchReport {
        let mut snapshot: Vec<Node> = self.registry.available_nodes().into_values().collect();
        let mut report = DispatchReport::default();

        if snapshot.is_empty() {
            warn!(tasks = tasks.len(), "no nodes available for task allocation");
            report.no_nodes_available = true;
            return report;
        }

        debug!(
            tasks = tasks.len(),
            nodes = snapshot.len(),
            policy = %self.policy,
            "dispatching batch"
        );

        for task in tasks {
            match self.place(&mut snapshot, task) {
                Ok(assignment) => {
                    info!(
                        task_id = %assignment.task_id,
                        node_id = %assignment.node_id,
                        remaining = assignment.remaining_capacity,
                        "task assigned"
                    );
                    report.assignments.push(assignment);
                }
                Err(reason) => {
                    warn!(task_id = task.id(), error = %reason, "task could not be allocated");
                    report.unallocated.push(Unallocated {
                        task_id: task.id().to_string(),
                        reason,
                    });
                }
            }
        }

        info!(
            assigned = report.assignments.len(),
            unallocated = report.unallocated.len(),
            "batch dispatched"
        );
        report
    }

    fn place(&self, snapshot: &mut Vec<Node>, task: &Task) -> SchedulerResult<Assignment> {
        let last_index = self.cursor.last_index_in(&snapshot[..]);
        let idx = select(self.policy, &snapshot[..], task, last_index)
            .ok_or_else(|| SchedulerError::UnallocatableTask(task.id().to_string()))?;
        let node_id = snapshot[idx].id.clone();

        match self.registry.commit_allocation(&node_id, task.required_capacity()) {
            Ok(remaining) => {
                snapshot[idx].available_capacity = remaining;
                if self.policy == AllocationPolicy::RoundRobin {
                    self.cursor.record(&node_id);
                }
                Ok(Assignment {
                    task_id: task.id().to_string(),
                    node_id,
                    remaining_capacity: remaining,
                })
            }
            Err(err) => {
                match &err {
                    RegistryError::NodeNotFound(_) => {
                        snapshot.remove(idx);
                    }
                    RegistryError::InsufficientCapacity { available, .. } => {
                        snapshot[idx].available_capacity = *available;
                    }
                    RegistryError::DuplicateNode(_) => {}
                }
                Err(err.into())
            }
        }
    }
}

fn serialize_display<T: std::fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
