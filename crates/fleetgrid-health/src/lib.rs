//! fleetgrid-health — health classification for registered nodes.
//!
//! A health-check pass walks every node in the registry and classifies it
//! `Healthy` or `Unhealthy`. The evaluator only reads the registry; it never
//! touches capacity.
//!
//! # Architecture
//!
//! ```text
//! HealthEvaluator
//!   ├── Arc<NodeRegistry> (read-only)
//!   ├── check_interval_threshold
//!   └── Mutex<HealthTable>
//!       ├── statuses: node_id → last HealthStatus
//!       └── unhealthy: ids in the order they were first flagged
//! ```
//!
//! # Unhealthy set
//!
//! The set is updated incrementally, never rebuilt: a node stays flagged
//! until a later pass classifies it healthy again, and an id is never held
//! twice. Passes are triggered synchronously by the caller.

pub mod evaluator;

pub use evaluator::{HealthEvaluator, HealthStatus, is_node_healthy};
