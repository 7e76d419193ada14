use std::{env, fmt::Display, str::FromStr, time::Duration};

use reqwest::Url;
use tracing::{info, warn};

use crate::framework::RetryPolicy;
use crate::warmup::WarmupConfig;

const MAX_PROBE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection and polling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Timeout of ordinary calls.
    pub timeout: Duration,
    /// Timeout of each wake-up probe.
    pub probe_timeout: Duration,
    pub health_timeout: Duration,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub dashboard_poll: Duration,
    pub orders_poll: Duration,
    pub warmup_probes: usize,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let probe_timeout = try_load_secs(&lookup, "BACKEND_PROBE_TIMEOUT_SECS", "30")?;
        if probe_timeout > MAX_PROBE_TIMEOUT {
            warn!("BACKEND_PROBE_TIMEOUT_SECS capped at {}s", MAX_PROBE_TIMEOUT.as_secs());
        }
        let probes: usize = try_load(&lookup, "WARMUP_PROBES", "3")?;

        Ok(Self {
            base_url: try_load(&lookup, "BACKEND_URL", "http://localhost:5000")?,
            timeout: try_load_secs(&lookup, "BACKEND_TIMEOUT_SECS", "30")?,
            probe_timeout: probe_timeout.min(MAX_PROBE_TIMEOUT),
            health_timeout: try_load_secs(&lookup, "BACKEND_HEALTH_TIMEOUT_SECS", "15")?,
            max_attempts: try_load(&lookup, "BACKEND_MAX_ATTEMPTS", "5")?,
            retry_delay: Duration::from_millis(try_load(&lookup, "BACKEND_RETRY_DELAY_MS", "2000")?),
            dashboard_poll: try_load_secs(&lookup, "DASHBOARD_POLL_SECS", "15")?,
            orders_poll: try_load_secs(&lookup, "ORDERS_POLL_SECS", "30")?,
            warmup_probes: probes.clamp(2, 3),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.retry_delay)
    }

    pub fn warmup_config(&self) -> WarmupConfig {
        WarmupConfig {
            probes: self.warmup_probes,
            probe_timeout: self.probe_timeout,
            health_timeout: self.health_timeout,
            ..Default::default()
        }
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}

/// A whole number of seconds, at least one.
fn try_load_secs<F>(lookup: &F, key: &'static str, default: &str) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match try_load::<u64, F>(lookup, key, default)? {
        0 => {
            warn!("Invalid {key} value: must be at least 1");
            Err(ConfigError::Invalid {
                key,
                value: "0".to_string(),
                reason: "must be at least 1 second".to_string(),
            })
        }
        secs => Ok(Duration::from_secs(secs)),
    }
}
