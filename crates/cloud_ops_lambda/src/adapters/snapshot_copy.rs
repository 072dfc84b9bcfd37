use cloud_ops_core::contract::SnapshotCopyRequest;

/// Control-plane seam for cross-region snapshot copies. The copy is
/// asynchronous on the provider side; implementations return as soon as
/// the request is acknowledged.
pub trait SnapshotCopier {
    /// Returns the provider-acknowledged target snapshot identifier.
    fn copy_snapshot(&self, request: &SnapshotCopyRequest) -> Result<String, String>;
}
