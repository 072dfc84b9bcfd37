use aws_sdk_ec2::types::Filter;
use cloud_ops_core::config::SchedulerConfig;
use cloud_ops_core::contract::TagSelector;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

use cloud_ops_lambda::adapters::instance_control::{InstanceControl, InstanceState};
use cloud_ops_lambda::handlers::scheduler::handle_schedule_event;
use cloud_ops_lambda::telemetry::init_tracing;

struct Ec2InstanceControl {
    ec2_client: aws_sdk_ec2::Client,
}

impl InstanceControl for Ec2InstanceControl {
    fn instances_with_tag(&self, tag: &TagSelector) -> Result<Vec<String>, String> {
        let client = self.ec2_client.clone();
        let filter = Filter::builder()
            .name(format!("tag:{}", tag.key))
            .values(tag.value.clone())
            .build();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .describe_instances()
                    .filters(filter)
                    .send()
                    .await
                    .map_err(|error| format!("failed to describe tagged instances: {error}"))?;

                let mut instance_ids = Vec::new();
                for reservation in response.reservations() {
                    for instance in reservation.instances() {
                        if let Some(instance_id) = instance.instance_id() {
                            instance_ids.push(instance_id.to_string());
                        }
                    }
                }
                Ok(instance_ids)
            })
        })
    }

    fn start_instances(&self, instance_ids: &[String]) -> Result<(), String> {
        let client = self.ec2_client.clone();
        let instance_ids = instance_ids.to_vec();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .start_instances()
                    .set_instance_ids(Some(instance_ids))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to start instances: {error}"))
            })
        })
    }

    fn stop_instances(&self, instance_ids: &[String]) -> Result<(), String> {
        let client = self.ec2_client.clone();
        let instance_ids = instance_ids.to_vec();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .stop_instances()
                    .set_instance_ids(Some(instance_ids))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to stop instances: {error}"))
            })
        })
    }

    fn instance_states(&self, instance_ids: &[String]) -> Result<Vec<InstanceState>, String> {
        let client = self.ec2_client.clone();
        let instance_ids = instance_ids.to_vec();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .describe_instances()
                    .set_instance_ids(Some(instance_ids))
                    .send()
                    .await
                    .map_err(|error| format!("failed to describe instance states: {error}"))?;

                let mut states = Vec::new();
                for reservation in response.reservations() {
                    for instance in reservation.instances() {
                        let Some(instance_id) = instance.instance_id() else {
                            continue;
                        };
                        let state = instance
                            .state()
                            .and_then(|state| state.name())
                            .map(|name| name.as_str().to_string())
                            .unwrap_or_default();
                        states.push(InstanceState {
                            instance_id: instance_id.to_string(),
                            state,
                        });
                    }
                }
                Ok(states)
            })
        })
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = SchedulerConfig::from_env().map_err(|error| Error::from(error.message()))?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let control = Ec2InstanceControl {
        ec2_client: aws_sdk_ec2::Client::new(&aws_config),
    };

    let report = handle_schedule_event(event.payload, &config, &control)
        .map_err(|error| Error::from(error.message))?;
    Ok(serde_json::to_value(report)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
