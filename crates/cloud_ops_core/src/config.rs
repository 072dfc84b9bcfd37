use std::time::Duration;

use crate::contract::{ConfigError, TagSelector};

pub const SOURCE_REGION_VAR: &str = "SOURCE_REGION";
pub const DESTINATION_REGION_VAR: &str = "DESTINATION_REGION";
pub const KMS_KEY_ID_VAR: &str = "DESTINATION_REGION_KMS_KEY_ID";
pub const WAIT_MAX_ATTEMPTS_VAR: &str = "WAIT_MAX_ATTEMPTS";
pub const WAIT_POLL_SECONDS_VAR: &str = "WAIT_POLL_SECONDS";

/// Replicator deployment configuration, validated once at startup. All
/// three fields are fixed per deployment and never read from the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicatorConfig {
    pub source_region: String,
    pub destination_region: String,
    pub kms_key_id: String,
}

impl ReplicatorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            source_region: required(&lookup, SOURCE_REGION_VAR)?,
            destination_region: required(&lookup, DESTINATION_REGION_VAR)?,
            kms_key_id: required(&lookup, KMS_KEY_ID_VAR)?,
        })
    }
}

/// Bounds for the scheduler's poll-until-state wait. The defaults match
/// the provider waiter this handler used to rely on implicitly: 40
/// attempts, 15 seconds apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub max_attempts: u32,
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 40,
            poll_interval: Duration::from_secs(15),
        }
    }
}

impl WaitPolicy {
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let max_attempts = match lookup(WAIT_MAX_ATTEMPTS_VAR) {
            Some(raw) => parse_positive(WAIT_MAX_ATTEMPTS_VAR, &raw)?,
            None => defaults.max_attempts,
        };
        let poll_interval = match lookup(WAIT_POLL_SECONDS_VAR) {
            Some(raw) => Duration::from_secs(u64::from(parse_positive(
                WAIT_POLL_SECONDS_VAR,
                &raw,
            )?)),
            None => defaults.poll_interval,
        };

        Ok(Self {
            max_attempts,
            poll_interval,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub tag: TagSelector,
    pub wait: WaitPolicy,
}

impl SchedulerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            tag: TagSelector::default(),
            wait: WaitPolicy::from_lookup(lookup)?,
        })
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tag: TagSelector::default(),
            wait: WaitPolicy::default(),
        }
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::new(format!("{name} must be configured"))),
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::new(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))),
    }
}
