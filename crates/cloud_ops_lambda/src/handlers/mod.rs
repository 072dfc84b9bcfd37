pub mod replicator;
pub mod scheduler;
