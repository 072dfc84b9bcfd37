use cloud_ops_core::contract::TagSelector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceState {
    pub instance_id: String,
    /// Provider state name, e.g. "pending", "running", "stopping",
    /// "stopped".
    pub state: String,
}

/// Control-plane seam for compute instances. Implementations own the
/// provider client; the handler never sees SDK types.
pub trait InstanceControl {
    /// Instance ids carrying the tag, flattened across reservations.
    fn instances_with_tag(&self, tag: &TagSelector) -> Result<Vec<String>, String>;

    fn start_instances(&self, instance_ids: &[String]) -> Result<(), String>;

    fn stop_instances(&self, instance_ids: &[String]) -> Result<(), String>;

    fn instance_states(&self, instance_ids: &[String]) -> Result<Vec<InstanceState>, String>;
}
