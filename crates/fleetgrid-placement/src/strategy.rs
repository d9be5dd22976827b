//! Node selection for a single task.
//!
//! - **Best-fit**: the eligible node with the most available capacity.
//!   Ties go to the first candidate seen; over an id-keyed map or an
//!   id-ordered slice that is the smallest id.
//! - **Round-robin**: the first eligible node scanning forward from just
//!   after `last_index`, wrapping at most once.
//!
//! A node is eligible when its available capacity is at least the task's
//! required capacity.

use std::collections::BTreeMap;

use fleet_core::{AllocationPolicy, Node, NodeId, Task};
use tracing::debug;

/// Best-fit over an id-keyed view of available nodes.
pub fn best_fit<'a>(nodes: &'a BTreeMap<NodeId, Node>, task: &Task) -> Option<&'a Node> {
    let selected = pick_largest(nodes.iter(), task).map(|(_, node)| node);
    log_selection(task, selected, "best_fit");
    selected
}

/// Best-fit over an ordered slice, returning the index of the chosen node.
pub fn best_fit_position(nodes: &[Node], task: &Task) -> Option<usize> {
    let selected = pick_largest(nodes.iter().enumerate(), task);
    log_selection(task, selected.map(|(_, node)| node), "best_fit");
    selected.map(|(idx, _)| idx)
}

/// Round-robin over an ordered slice.
///
/// Scanning starts at `(last_index + 1) % len`, or at 0 when nothing has
/// been allocated yet, and visits each node at most once. Returns the index
/// of the chosen node; the caller owns and advances `last_index`.
pub fn round_robin(nodes: &[Node], task: &Task, last_index: Option<usize>) -> Option<usize> {
    let len = nodes.len();
    if len == 0 {
        debug!(task_id = task.id(), "round-robin: no nodes to scan");
        return None;
    }

    let start = last_index.map_or(0, |last| last.wrapping_add(1) % len);
    let selected = (0..len)
        .map(|offset| (start + offset) % len)
        .find(|&idx| nodes[idx].fits(task));

    log_selection(task, selected.map(|idx| &nodes[idx]), "round_robin");
    selected
}

/// Select a node index under the given policy. `last_index` only matters
/// for round-robin.
pub fn select(
    policy: AllocationPolicy,
    nodes: &[Node],
    task: &Task,
    last_index: Option<usize>,
) -> Option<usize> {
    match policy {
        AllocationPolicy::BestFit => best_fit_position(nodes, task),
        AllocationPolicy::RoundRobin => round_robin(nodes, task, last_index),
    }
}

fn pick_largest<'a, K>(
    candidates: impl IntoIterator<Item = (K, &'a Node)>,
    task: &Task,
) -> Option<(K, &'a Node)> {
    let mut best: Option<(K, &'a Node)> = None;
    for (key, node) in candidates {
        if !node.fits(task) {
            continue;
        }
        // Strictly greater keeps the earliest candidate on ties.
        if best
            .as_ref()
            .is_none_or(|(_, b)| node.available_capacity > b.available_capacity)
        {
            best = Some((key, node));
        }
    }
    best
}

fn log_selection(task: &Task, node: Option<&Node>, policy: &str) {
    match node {
        Some(node) => debug!(
            task_id = task.id(),
            node_id = %node.id,
            capacity = node.available_capacity,
            policy,
            "node selected"
        ),
        None => debug!(
            task_id = task.id(),
            required = task.required_capacity(),
            policy,
            "no node has enough capacity"
        ),
    }
}
