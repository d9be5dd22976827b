//! fleetgrid allocation strategies — best-fit and round-robin.
//!
//! Pure selection functions: given a view of nodes and one task, pick at
//! most one node. Nothing here mutates a node; committing the choice is
//! the dispatcher's job (via the registry), so a selection can be dropped
//! without side effects.
//!
//! # Components
//!
//! - **`strategy`** — `best_fit`, `round_robin` and the policy-driven `select`

pub mod strategy;

pub use strategy::{best_fit, best_fit_position, round_robin, select};
