use serde::{Deserialize, Serialize};

pub const SCHEDULE_TAG_KEY: &str = "Scheduled";
pub const SCHEDULE_TAG_VALUE: &str = "OfficeHours";
pub const SOURCE_REGION_TAG_KEY: &str = "source_region";

/// Trigger payload for the instance scheduler. Any fields beyond `Action`
/// are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleEvent {
    #[serde(rename = "Action")]
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleAction {
    Start,
    Stop,
}

impl ScheduleAction {
    /// Exact match on the original trigger vocabulary; anything else is
    /// the unknown-action path.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Start" => Some(Self::Start),
            "Stop" => Some(Self::Stop),
            _ => None,
        }
    }

    /// Provider state name every matched instance must reach before the
    /// invocation completes.
    pub fn target_state(self) -> &'static str {
        match self {
            Self::Start => "running",
            Self::Stop => "stopped",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Stop => "Stop",
        }
    }
}

/// Tag key/value pair used as a read-only instance filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSelector {
    pub key: String,
    pub value: String,
}

impl Default for TagSelector {
    fn default() -> Self {
        Self {
            key: SCHEDULE_TAG_KEY.to_string(),
            value: SCHEDULE_TAG_VALUE.to_string(),
        }
    }
}

/// Trigger payload for the snapshot replicator: the fully qualified
/// resource names of newly created snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotEvent {
    pub resources: Vec<String>,
}

/// Trailing colon-delimited segment of a snapshot resource name. A name
/// with no colon is its own base name.
pub fn snapshot_base_name(resource_name: &str) -> &str {
    resource_name
        .rsplit(':')
        .next()
        .unwrap_or(resource_name)
}

pub fn copy_target_identifier(resource_name: &str) -> String {
    format!("copy-{}", snapshot_base_name(resource_name))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

/// Transient shape handed to the snapshot-copy seam. One request per
/// event record; all region/key fields come from deployment
/// configuration, never from the event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotCopyRequest {
    pub source_snapshot_arn: String,
    pub target_identifier: String,
    pub source_region: String,
    pub kms_key_id: String,
    pub tags: Vec<ResourceTag>,
}

pub const SCHEDULER_STATUS_COMPLETED: &str = "completed";
pub const SCHEDULER_STATUS_NO_MATCHING_INSTANCES: &str = "no_matching_instances";
pub const SCHEDULER_STATUS_IGNORED_UNKNOWN_ACTION: &str = "ignored_unknown_action";

/// Logged and returned to the platform; no caller consumes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchedulerReport {
    pub action: String,
    pub status: String,
    pub instance_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyRecord {
    pub source_snapshot_arn: String,
    pub target_identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicatorReport {
    pub status: String,
    pub copies: Vec<CopyRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn schedule_event_ignores_extra_fields() {
        let event: ScheduleEvent = serde_json::from_value(json!({
            "Action": "Start",
            "detail-type": "Scheduled Event",
            "source": "aws.events",
        }))
        .expect("event should parse");

        assert_eq!(event.action, "Start");
    }

    #[test]
    fn schedule_action_parses_exact_vocabulary_only() {
        assert_eq!(ScheduleAction::parse("Start"), Some(ScheduleAction::Start));
        assert_eq!(ScheduleAction::parse("Stop"), Some(ScheduleAction::Stop));
        assert_eq!(ScheduleAction::parse("start"), None);
        assert_eq!(ScheduleAction::parse("Restart"), None);
        assert_eq!(ScheduleAction::parse(""), None);
    }

    #[test]
    fn target_states_match_provider_names() {
        assert_eq!(ScheduleAction::Start.target_state(), "running");
        assert_eq!(ScheduleAction::Stop.target_state(), "stopped");
    }

    #[test]
    fn base_name_is_trailing_colon_segment() {
        assert_eq!(
            snapshot_base_name("arn:aws:rds:us-east-1:123456789012:snapshot:nightly-2024"),
            "nightly-2024"
        );
    }

    #[test]
    fn base_name_without_colon_is_whole_string() {
        assert_eq!(snapshot_base_name("nightly-2024"), "nightly-2024");
    }

    #[test]
    fn copy_target_prefixes_base_name() {
        assert_eq!(
            copy_target_identifier("arn:aws:rds:us-east-1:123456789012:snapshot:nightly-2024"),
            "copy-nightly-2024"
        );
    }

    #[test]
    fn default_tag_selector_is_office_hours() {
        let tag = TagSelector::default();
        assert_eq!(tag.key, "Scheduled");
        assert_eq!(tag.value, "OfficeHours");
    }
}
