use aws_sdk_rds::types::Tag;
use cloud_ops_core::config::ReplicatorConfig;
use cloud_ops_core::contract::SnapshotCopyRequest;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

use cloud_ops_lambda::adapters::snapshot_copy::SnapshotCopier;
use cloud_ops_lambda::handlers::replicator::handle_snapshot_event;
use cloud_ops_lambda::telemetry::init_tracing;

struct RdsSnapshotCopier {
    rds_client: aws_sdk_rds::Client,
}

impl SnapshotCopier for RdsSnapshotCopier {
    fn copy_snapshot(&self, request: &SnapshotCopyRequest) -> Result<String, String> {
        let client = self.rds_client.clone();
        let request = request.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let mut copy = client
                    .copy_db_snapshot()
                    .source_db_snapshot_identifier(request.source_snapshot_arn)
                    .target_db_snapshot_identifier(request.target_identifier.clone())
                    .source_region(request.source_region)
                    .kms_key_id(request.kms_key_id);
                for tag in request.tags {
                    copy = copy.tags(Tag::builder().key(tag.key).value(tag.value).build());
                }

                let response = copy
                    .send()
                    .await
                    .map_err(|error| format!("failed to copy snapshot: {error}"))?;

                Ok(response
                    .db_snapshot()
                    .and_then(|snapshot| snapshot.db_snapshot_identifier())
                    .unwrap_or(&request.target_identifier)
                    .to_string())
            })
        })
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = ReplicatorConfig::from_env().map_err(|error| Error::from(error.message()))?;

    // The copy lands in the destination region, so the client is pinned
    // there; cross-region authentication uses the request's SourceRegion.
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.destination_region.clone()))
        .load()
        .await;
    let copier = RdsSnapshotCopier {
        rds_client: aws_sdk_rds::Client::new(&aws_config),
    };

    let report = handle_snapshot_event(event.payload, &config, &copier)
        .map_err(|error| Error::from(error.message))?;
    Ok(serde_json::to_value(report)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
