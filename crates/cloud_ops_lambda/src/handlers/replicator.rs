use cloud_ops_core::config::ReplicatorConfig;
use cloud_ops_core::contract::{
    copy_target_identifier, CopyRecord, ReplicatorReport, ResourceTag, SnapshotCopyRequest,
    SnapshotEvent, SOURCE_REGION_TAG_KEY,
};
use serde_json::Value;
use tracing::info;

use crate::adapters::snapshot_copy::SnapshotCopier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicatorError {
    pub message: String,
}

impl ReplicatorError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ReplicatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ReplicatorError {}

/// Requests a cross-region copy of every snapshot named by the event,
/// under a `copy-<base name>` identifier tagged with the source region.
///
/// The copy is asynchronous on the provider side; this handler only
/// submits the requests. The first failed record aborts the rest of the
/// invocation.
pub fn handle_snapshot_event(
    event: Value,
    config: &ReplicatorConfig,
    copier: &impl SnapshotCopier,
) -> Result<ReplicatorReport, ReplicatorError> {
    let event: SnapshotEvent = serde_json::from_value(event)
        .map_err(|error| ReplicatorError::new(format!("Malformed trigger event: {error}")))?;

    let mut copies = Vec::with_capacity(event.resources.len());
    for snapshot_arn in &event.resources {
        let request = SnapshotCopyRequest {
            source_snapshot_arn: snapshot_arn.clone(),
            target_identifier: copy_target_identifier(snapshot_arn),
            source_region: config.source_region.clone(),
            kms_key_id: config.kms_key_id.clone(),
            tags: vec![ResourceTag {
                key: SOURCE_REGION_TAG_KEY.to_string(),
                value: config.source_region.clone(),
            }],
        };

        let acknowledged = copier.copy_snapshot(&request).map_err(ReplicatorError::new)?;
        info!(
            source_snapshot_arn = %snapshot_arn,
            target_identifier = %acknowledged,
            destination_region = %config.destination_region,
            "snapshot copy submitted"
        );

        copies.push(CopyRecord {
            source_snapshot_arn: snapshot_arn.clone(),
            target_identifier: request.target_identifier,
        });
    }

    if copies.is_empty() {
        info!("event named no snapshots; nothing to copy");
    }

    Ok(ReplicatorReport {
        status: "copies_submitted".to_string(),
        copies,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    struct CapturingCopier {
        requests: Mutex<Vec<SnapshotCopyRequest>>,
        fail_on_request: Option<usize>,
    }

    impl CapturingCopier {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_on_request: None,
            }
        }

        fn failing_on(request_index: usize) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_on_request: Some(request_index),
            }
        }

        fn requests(&self) -> Vec<SnapshotCopyRequest> {
            self.requests.lock().expect("poisoned mutex").clone()
        }
    }

    impl SnapshotCopier for CapturingCopier {
        fn copy_snapshot(&self, request: &SnapshotCopyRequest) -> Result<String, String> {
            let mut requests = self.requests.lock().expect("poisoned mutex");
            if self.fail_on_request == Some(requests.len()) {
                return Err(format!(
                    "KMSKeyNotAccessibleFault: cannot copy {}",
                    request.source_snapshot_arn
                ));
            }
            requests.push(request.clone());
            Ok(request.target_identifier.clone())
        }
    }

    fn config() -> ReplicatorConfig {
        ReplicatorConfig {
            source_region: "us-east-1".to_string(),
            destination_region: "eu-west-1".to_string(),
            kms_key_id: "alias/replica-key".to_string(),
        }
    }

    #[test]
    fn copies_snapshot_under_derived_name_with_provenance_tag() {
        let copier = CapturingCopier::new();
        let report = handle_snapshot_event(
            json!({
                "resources": ["arn:aws:rds:us-east-1:123456789012:snapshot:nightly-2024"]
            }),
            &config(),
            &copier,
        )
        .expect("copy should succeed");

        let requests = copier.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target_identifier, "copy-nightly-2024");
        assert_eq!(requests[0].source_region, "us-east-1");
        assert_eq!(requests[0].kms_key_id, "alias/replica-key");
        assert_eq!(
            requests[0].tags,
            vec![ResourceTag {
                key: "source_region".to_string(),
                value: "us-east-1".to_string(),
            }]
        );

        assert_eq!(report.copies.len(), 1);
        assert_eq!(report.copies[0].target_identifier, "copy-nightly-2024");
    }

    #[test]
    fn issues_one_copy_per_event_record() {
        let copier = CapturingCopier::new();
        let report = handle_snapshot_event(
            json!({
                "resources": [
                    "arn:aws:rds:us-east-1:123456789012:snapshot:nightly-2024",
                    "arn:aws:rds:us-east-1:123456789012:snapshot:weekly-07",
                    "arn:aws:rds:us-east-1:123456789012:snapshot:manual-backup",
                ]
            }),
            &config(),
            &copier,
        )
        .expect("copies should succeed");

        assert_eq!(copier.requests().len(), 3);
        assert_eq!(report.copies.len(), 3);
        assert_eq!(report.copies[1].target_identifier, "copy-weekly-07");
        assert!(copier
            .requests()
            .iter()
            .all(|request| request.source_region == "us-east-1"
                && request.tags[0].value == "us-east-1"));
    }

    #[test]
    fn first_failure_aborts_remaining_records() {
        let copier = CapturingCopier::failing_on(1);
        let error = handle_snapshot_event(
            json!({
                "resources": [
                    "arn:aws:rds:us-east-1:123456789012:snapshot:nightly-2024",
                    "arn:aws:rds:us-east-1:123456789012:snapshot:weekly-07",
                    "arn:aws:rds:us-east-1:123456789012:snapshot:manual-backup",
                ]
            }),
            &config(),
            &copier,
        )
        .expect_err("second record should abort the invocation");

        assert!(error.message.contains("KMSKeyNotAccessibleFault"));
        assert_eq!(copier.requests().len(), 1);
        assert_eq!(
            copier.requests()[0].source_snapshot_arn,
            "arn:aws:rds:us-east-1:123456789012:snapshot:nightly-2024"
        );
    }

    #[test]
    fn empty_resource_list_is_a_clean_no_op() {
        let copier = CapturingCopier::new();
        let report = handle_snapshot_event(json!({"resources": []}), &config(), &copier)
            .expect("empty event should succeed");

        assert!(copier.requests().is_empty());
        assert!(report.copies.is_empty());
    }

    #[test]
    fn payload_without_resources_is_an_error() {
        let copier = CapturingCopier::new();
        let error = handle_snapshot_event(json!({"detail": {}}), &config(), &copier)
            .expect_err("payload without resources should fail");

        assert!(error.message.contains("Malformed trigger event"));
        assert!(copier.requests().is_empty());
    }
}
