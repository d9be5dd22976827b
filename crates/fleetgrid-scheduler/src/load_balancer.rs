//! Round-robin cursor.
//!
//! Remembers the id of the last node a round-robin allocation went to, so
//! the next scan starts at the first node after it in id order. Tracking the
//! id rather than a position keeps rotation stable when nodes are drained,
//! removed or added between batches.

use std::sync::{Mutex, MutexGuard, PoisonError};

use fleet_core::{Node, NodeId};

/// Holder for the last-allocated node of a round-robin dispatcher.
#[derive(Debug, Default)]
pub struct RoundRobinCursor {
    last: Mutex<Option<NodeId>>,
}

impl RoundRobinCursor {
    /// Create a cursor with no allocation recorded.
    pub fn new() -> Self {
        Self::default()
    }

    fn last(&self) -> MutexGuard<'_, Option<NodeId>> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Id of the last allocated node, if any.
    pub fn last_node(&self) -> Option<NodeId> {
        self.last().clone()
    }

    /// Position in an id-ordered `nodes` slice to treat as "last allocated".
    ///
    /// This is the node just before the first id greater than the recorded
    /// one, so a scan starting after it lands on the recorded node's
    /// successor even if the recorded node is gone. `None` when nothing was
    /// recorded or every node sorts after it.
    pub fn last_index_in(&self, nodes: &[Node]) -> Option<usize> {
        let last = self.last();
        let last_id = last.as_deref()?;
        nodes
            .partition_point(|n| n.id.as_str() <= last_id)
            .checked_sub(1)
    }

    /// Record an allocation to `node_id`.
    pub fn record(&self, node_id: &str) {
        *self.last() = Some(node_id.to_string());
    }

    /// Forget the last allocation; the next scan starts at the first node.
    pub fn reset(&self) {
        *self.last() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter().map(|id| Node::new(*id, 10)).collect()
    }

    #[test]
    fn new_cursor_has_no_last_node() {
        let cursor = RoundRobinCursor::new();
        assert_eq!(cursor.last_node(), None);
        assert_eq!(cursor.last_index_in(&nodes(&["a", "b"])), None);
    }

    #[test]
    fn record_then_reset() {
        let cursor = RoundRobinCursor::new();

        cursor.record("a");
        assert_eq!(cursor.last_node().as_deref(), Some("a"));
        cursor.record("c");
        assert_eq!(cursor.last_node().as_deref(), Some("c"));

        cursor.reset();
        assert_eq!(cursor.last_node(), None);
    }

    #[test]
    fn index_follows_recorded_node() {
        let cursor = RoundRobinCursor::new();
        cursor.record("b");

        assert_eq!(cursor.last_index_in(&nodes(&["a", "b", "c"])), Some(1));
        // A node added in front shifts positions, not the answer.
        assert_eq!(cursor.last_index_in(&nodes(&["0", "a", "b", "c"])), Some(2));
    }

    #[test]
    fn index_for_departed_node_points_before_successor() {
        let cursor = RoundRobinCursor::new();
        cursor.record("b");

        // "b" is gone: scanning after index 0 starts at "c".
        assert_eq!(cursor.last_index_in(&nodes(&["a", "c"])), Some(0));
        // Every node sorts after "b": scan from the start.
        assert_eq!(cursor.last_index_in(&nodes(&["c", "d"])), None);
        // Every node sorts before "b": the last one, so the scan wraps.
        assert_eq!(cursor.last_index_in(&nodes(&["a"])), Some(0));
    }

    #[test]
    fn cursor_concurrent_safety() {
        use std::sync::Arc;
        use std::thread;

        let cursor = Arc::new(RoundRobinCursor::new());
        let mut handles = vec![];

        for t in 0..4 {
            let cursor = cursor.clone();
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    cursor.record(&format!("n{t}-{i}"));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        // Whatever write landed last, it is one thread's final record.
        let last = cursor.last_node().unwrap();
        assert!(last.ends_with("-99"));
    }
}
