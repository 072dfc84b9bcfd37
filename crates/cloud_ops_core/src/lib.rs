//! Shared cloud-ops domain primitives.
//!
//! This crate owns the trigger-event contracts, name derivation, and
//! validated configuration for the instance scheduler and the snapshot
//! replicator. It intentionally excludes AWS SDK and Lambda runtime
//! concerns; those live in `crates/cloud_ops_lambda`.

pub mod config;
pub mod contract;
