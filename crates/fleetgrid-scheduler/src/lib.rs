//! fleetgrid-scheduler — batch task dispatch.
//!
//! Takes a batch of tasks and places each one on a node from the
//! registry's available-node snapshot. The dispatcher:
//!
//! - Snapshots available nodes once per batch (id order)
//! - Selects a node per task under the configured `AllocationPolicy`
//! - Commits each choice through the registry, which rejects
//!   over-allocation and removed nodes atomically
//! - Keeps going when a single task cannot be placed
//!
//! # Architecture
//!
//! ```text
//! Dispatcher
//!   ├── Arc<NodeRegistry> (snapshot + commit_allocation)
//!   ├── AllocationPolicy (best-fit | round-robin)
//!   └── RoundRobinCursor (last allocated node id)
//! ```

pub mod dispatcher;
pub mod error;
pub mod load_balancer;

pub use dispatcher::{Assignment, DispatchReport, Dispatcher, Unallocated};
pub use error::{SchedulerError, SchedulerResult};
pub use load_balancer::RoundRobinCursor;
