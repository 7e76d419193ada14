//! # Cold-Start Warmup
//!
//! The backend host idles the service when unused, and the first request after that can take
//! tens of seconds. [`Warmup::wake_up`] fires a few concurrent liveness probes and returns as soon
//! as one of them succeeds. It is advisory: total failure is reported, never raised.
//!
//! [`WarmupProgress`] is the simulated progress shown while waiting. It is cosmetic; the real
//! ready signal is the outcome of `wake_up`.

use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::framework::{RetryingTransport, TransportError};

#[derive(Debug, Clone, PartialEq)]
pub struct WarmupConfig {
    /// Concurrent probes fired by [`Warmup::wake_up`].
    pub probes: usize,
    /// Timeout of each wake-up probe.
    pub probe_timeout: Duration,
    /// Timeout of [`Warmup::check_health`].
    pub health_timeout: Duration,
    pub health_path: String,
    /// Text the health endpoint's `status` field contains when the service is up.
    pub ready_marker: String,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            probes: 3,
            probe_timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(15),
            health_path: "/health".to_string(),
            ready_marker: "Backend is running".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeOutcome {
    /// A probe succeeded after `elapsed`.
    Awake { elapsed: Duration },
    /// Every probe failed. The backend may still be starting.
    StillStarting,
}

impl WakeOutcome {
    pub fn is_awake(&self) -> bool {
        matches!(self, WakeOutcome::Awake { .. })
    }
}

#[derive(Clone)]
pub struct Warmup {
    transport: RetryingTransport,
    config: WarmupConfig,
}

impl Warmup {
    pub fn new(transport: RetryingTransport, config: WarmupConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &WarmupConfig {
        &self.config
    }

    /// One probe of the health endpoint. `true` only when the backend reports itself running.
    pub async fn check_health(&self) -> bool {
        let path = &self.config.health_path;
        match self.transport.probe(path, self.config.health_timeout).await {
            Ok(reply) => {
                let running = self.reports_running(&reply.body);
                debug!(running, "Health check answered");
                running
            }
            Err(e) => {
                if matches!(e, TransportError::Timeout(_)) {
                    warn!("Health check timed out, backend might be asleep");
                } else {
                    warn!(error = %e, "Health check failed");
                }
                false
            }
        }
    }

    /// Whether a health body says the service is up.
    fn reports_running(&self, body: &Value) -> bool {
        body.get("status")
            .and_then(Value::as_str)
            .is_some_and(|status| status.contains(&self.config.ready_marker))
    }

    /// Races the configured number of probes and resolves on the first success. A probe succeeds
    /// when the backend reports itself running, like [`check_health`](Self::check_health).
    ///
    /// The remaining probes are not cancelled. They run to completion in the background and their
    /// results are dropped.
    pub async fn wake_up(&self) -> WakeOutcome {
        let probes = self.config.probes.max(1);
        info!(probes, "Waking up backend service");
        let started = Instant::now();

        let (tx, mut rx) = mpsc::channel(probes);
        for probe in 0..probes {
            let transport = self.transport.clone();
            let path = self.config.health_path.clone();
            let timeout = self.config.probe_timeout;
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = transport.probe(&path, timeout).await;
                let _ = tx.send((probe, outcome.map(|reply| reply.body))).await;
            });
        }
        drop(tx);

        while let Some((probe, outcome)) = rx.recv().await {
            match outcome {
                Ok(body) if self.reports_running(&body) => {
                    let elapsed = started.elapsed();
                    info!(probe, ?elapsed, "Backend is awake");
                    return WakeOutcome::Awake { elapsed };
                }
                Ok(body) => debug!(probe, %body, "Backend answered but is not running yet"),
                Err(e) => debug!(probe, error = %e, "Wake-up probe failed"),
            }
        }

        warn!("Backend wake-up attempt failed, but it might still be starting");
        WakeOutcome::StillStarting
    }
}

// =============================================================================
// SIMULATED PROGRESS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmupStage {
    Waking,
    Connecting,
    Ready,
}

/// What the wake-up screen shows `elapsed` after it appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupProgress {
    pub stage: WarmupStage,
    /// 0..=100
    pub percent: u8,
}

const PROGRESS_STEP: Duration = Duration::from_millis(600);
const CONNECTING_AFTER: Duration = Duration::from_secs(15);
const READY_AFTER: Duration = Duration::from_secs(45);

impl WarmupProgress {
    pub fn at(elapsed: Duration) -> Self {
        let steps = elapsed.as_millis() / PROGRESS_STEP.as_millis();
        let percent = steps.saturating_mul(2).min(100) as u8;

        let stage = if percent >= 100 || elapsed >= READY_AFTER {
            WarmupStage::Ready
        } else if elapsed >= CONNECTING_AFTER {
            WarmupStage::Connecting
        } else {
            WarmupStage::Waking
        };
        Self { stage, percent }
    }
}
