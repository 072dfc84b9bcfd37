//! AWS-oriented adapters and handlers for the cloud-ops lambdas.
//!
//! This crate owns runtime integration details: the control-plane trait
//! seams, the two pure event handlers, and the Lambda binaries that wire
//! AWS SDK clients into those seams. Domain contracts and configuration
//! live in `crates/cloud_ops_core`.

pub mod adapters;
pub mod handlers;
pub mod telemetry;
