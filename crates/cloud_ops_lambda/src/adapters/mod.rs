pub mod instance_control;
pub mod snapshot_copy;
