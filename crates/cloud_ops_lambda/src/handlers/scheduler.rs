use cloud_ops_core::config::SchedulerConfig;
use cloud_ops_core::contract::{
    ScheduleAction, ScheduleEvent, SchedulerReport, SCHEDULER_STATUS_COMPLETED,
    SCHEDULER_STATUS_IGNORED_UNKNOWN_ACTION, SCHEDULER_STATUS_NO_MATCHING_INSTANCES,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::adapters::instance_control::InstanceControl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerError {
    pub message: String,
}

impl SchedulerError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SchedulerError {}

/// Drives every instance tagged with the configured selector to the
/// requested power state, blocking until the provider reports it.
///
/// An empty tag lookup and an unrecognized action are both valid
/// non-error outcomes; every provider failure propagates to the caller.
pub fn handle_schedule_event(
    event: Value,
    config: &SchedulerConfig,
    control: &impl InstanceControl,
) -> Result<SchedulerReport, SchedulerError> {
    let event: ScheduleEvent = serde_json::from_value(event)
        .map_err(|error| SchedulerError::new(format!("Malformed trigger event: {error}")))?;

    let instance_ids = control
        .instances_with_tag(&config.tag)
        .map_err(SchedulerError::new)?;

    if instance_ids.is_empty() {
        info!(
            tag_key = %config.tag.key,
            tag_value = %config.tag.value,
            "found no instances with tag; nothing to do"
        );
        return Ok(SchedulerReport {
            action: event.action,
            status: SCHEDULER_STATUS_NO_MATCHING_INSTANCES.to_string(),
            instance_ids: Vec::new(),
        });
    }

    info!(
        tag_key = %config.tag.key,
        tag_value = %config.tag.value,
        instance_ids = %instance_ids.join(","),
        "found tagged instances"
    );

    let Some(action) = ScheduleAction::parse(&event.action) else {
        warn!(action = %event.action, "unknown action provided by event; ignoring");
        return Ok(SchedulerReport {
            action: event.action,
            status: SCHEDULER_STATUS_IGNORED_UNKNOWN_ACTION.to_string(),
            instance_ids,
        });
    };

    match action {
        ScheduleAction::Start => {
            info!("starting instances");
            control
                .start_instances(&instance_ids)
                .map_err(SchedulerError::new)?;
        }
        ScheduleAction::Stop => {
            info!("stopping instances");
            control
                .stop_instances(&instance_ids)
                .map_err(SchedulerError::new)?;
        }
    }

    info!(target_state = action.target_state(), "waiting for instances");
    wait_for_state(config, control, &instance_ids, action.target_state())?;
    info!(
        action = action.as_str(),
        target_state = action.target_state(),
        "instances reached target state"
    );

    Ok(SchedulerReport {
        action: event.action,
        status: SCHEDULER_STATUS_COMPLETED.to_string(),
        instance_ids,
    })
}

/// Bounded poll-until-state loop over the control seam. Sleeps
/// `poll_interval` between attempts; exhausting `max_attempts` is an
/// error surfaced to the invoking platform.
fn wait_for_state(
    config: &SchedulerConfig,
    control: &impl InstanceControl,
    instance_ids: &[String],
    target_state: &str,
) -> Result<(), SchedulerError> {
    for attempt in 1..=config.wait.max_attempts {
        let states = control
            .instance_states(instance_ids)
            .map_err(SchedulerError::new)?;

        if instance_ids.iter().all(|instance_id| {
            states
                .iter()
                .any(|state| &state.instance_id == instance_id && state.state == target_state)
        }) {
            return Ok(());
        }

        if attempt < config.wait.max_attempts && !config.wait.poll_interval.is_zero() {
            std::thread::sleep(config.wait.poll_interval);
        }
    }

    Err(SchedulerError::new(format!(
        "timed out waiting for {} instance(s) to reach state '{target_state}' after {} attempts",
        instance_ids.len(),
        config.wait.max_attempts
    )))
}
