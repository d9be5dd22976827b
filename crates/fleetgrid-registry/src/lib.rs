//! fleetgrid-registry — the authoritative in-memory set of worker nodes.
//!
//! Holds each node's available capacity and heartbeat age, and is the only
//! place either value is mutated. Health evaluation and dispatch both work
//! against a shared `Arc<NodeRegistry>`.
//!
//! # Snapshots
//!
//! Every read (`node`, `nodes`, `available_nodes`) returns owned copies.
//! A caller that wants its view to track a mutation it made must apply the
//! value returned by the mutating call (see `commit_allocation`).
//!
//! # Concurrency
//!
//! One registry-wide `RwLock` guards the node map. All mutations take the
//! write lock, so a capacity check and its decrement in
//! `commit_allocation` can never interleave with another commit.

pub mod error;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use registry::NodeRegistry;
