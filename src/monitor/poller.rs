//! # Polling Watch
//!
//! A [`Poller`] keeps one view's copy of a resource list fresh and raises alerts when it
//! changes.
//!
//! ## Concurrency Model
//!
//! Each poller is one Tokio task that owns its [`ChangeDetector`]. Interval ticks and manual
//! refresh commands are processed *sequentially* by that task, so:
//!
//! - fetch, diff and snapshot replacement always happen in that order,
//! - two ticks never overlap (ticks missed during a slow fetch are skipped),
//! - a manual refresh runs the exact same code as a tick and leaves the interval alone.
//!
//! Pollers for different views share nothing and issue their own requests.
//!
//! ## Failure Handling
//!
//! A tick whose fetch fails after retries is *stale*: no alerts, and the previous snapshot stays
//! in place so the view keeps showing the last good data.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::framework::{Resource, ResourceClient};

use super::detector::ChangeDetector;
use super::notification::{ActiveNotifications, Notification, NotificationBoard};

/// Shortest accepted poll interval.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// How a view polls.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Label used in logs.
    pub view: &'static str,
    pub interval: Duration,
    pub detect_cancellations: bool,
}

impl PollConfig {
    /// The aggregate dashboard: frequent, growth alerts only.
    pub fn dashboard(interval: Duration) -> Self {
        Self {
            view: "dashboard",
            interval,
            detect_cancellations: false,
        }
    }

    /// The detailed orders view: slower, growth and cancellation alerts.
    pub fn orders(interval: Duration) -> Self {
        Self {
            view: "orders",
            interval,
            detect_cancellations: true,
        }
    }
}

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Records received; 0 for a stale tick.
    pub fetched: usize,
    pub stale: bool,
    pub notifications: Vec<Notification>,
}

enum PollCommand {
    Refresh { respond_to: oneshot::Sender<TickReport> },
}

/// The polling task of one view.
pub struct Poller<T: Resource> {
    client: ResourceClient<T>,
    config: PollConfig,
    detector: ChangeDetector<T>,
    board: NotificationBoard,
    snapshot: watch::Sender<Arc<Vec<T>>>,
    commands: mpsc::Receiver<PollCommand>,
}

impl<T: Resource> Poller<T> {
    /// Starts polling. The first fetch happens immediately.
    pub fn spawn(client: ResourceClient<T>, config: PollConfig) -> PollHandle<T> {
        let (command_tx, command_rx) = mpsc::channel(8);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(Vec::new()));
        let board = NotificationBoard::new();
        let notifications = board.subscribe();

        let poller = Self {
            client,
            detector: ChangeDetector::new(config.detect_cancellations),
            config,
            board,
            snapshot: snapshot_tx,
            commands: command_rx,
        };
        let task = tokio::spawn(poller.run());

        PollHandle {
            commands: command_tx,
            snapshot: snapshot_rx,
            notifications,
            task,
        }
    }

    async fn run(mut self) {
        let view = self.config.view;
        let period = self.config.interval.max(MIN_INTERVAL);
        if period != self.config.interval {
            warn!(view, requested = ?self.config.interval, "Poll interval too short, raised");
        }
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(view, kind = T::KIND, interval = ?period, "Poller started");

        // The first tick completes at once: initial load.
        interval.tick().await;
        self.tick().await;

        // Commands before ticks. After a fetch slower than the interval the tick is always
        // overdue, and a closed channel or a refresh must still be seen.
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(PollCommand::Refresh { respond_to }) => {
                        debug!(view, "Manual refresh");
                        let report = self.tick().await;
                        let _ = respond_to.send(report);
                    }
                    None => break,
                },
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }

        info!(view, size = self.detector.snapshot().len(), "Poller stopped");
    }

    async fn tick(&mut self) -> TickReport {
        let view = self.config.view;
        let listing = self.client.fetch().await;
        if listing.stale {
            debug!(view, "Refresh failed, keeping previous snapshot");
            return TickReport {
                fetched: 0,
                stale: true,
                notifications: Vec::new(),
            };
        }

        let fetched = listing.items.len();
        let changes = self.detector.observe(listing.items);
        self.snapshot
            .send_replace(Arc::new(self.detector.snapshot().to_vec()));

        let notifications = changes.into_notifications();
        for notification in &notifications {
            self.board.raise(notification.clone());
        }
        debug!(view, fetched, alerts = notifications.len(), "Tick complete");

        TickReport {
            fetched,
            stale: false,
            notifications,
        }
    }
}

/// Owner-side handle of a running [`Poller`].
pub struct PollHandle<T: Resource> {
    commands: mpsc::Sender<PollCommand>,
    snapshot: watch::Receiver<Arc<Vec<T>>>,
    notifications: watch::Receiver<ActiveNotifications>,
    task: JoinHandle<()>,
}

impl<T: Resource> PollHandle<T> {
    /// Polls now, through the same path as an interval tick.
    ///
    /// `None` when the poller has stopped.
    pub async fn refresh(&self) -> Option<TickReport> {
        let (respond_to, response) = oneshot::channel();
        self.commands
            .send(PollCommand::Refresh { respond_to })
            .await
            .ok()?;
        response.await.ok()
    }

    /// The last successfully fetched list.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe_snapshot(&self) -> watch::Receiver<Arc<Vec<T>>> {
        self.snapshot.clone()
    }

    pub fn notifications(&self) -> watch::Receiver<ActiveNotifications> {
        self.notifications.clone()
    }

    /// Tears the view down without waiting. A fetch already in flight completes in the background
    /// and its result is dropped with the poller.
    pub fn stop(self) {
        drop(self.commands);
    }

    /// Stops polling and waits for the task to finish.
    pub async fn shutdown(self) {
        drop(self.commands);
        let _ = self.task.await;
    }
}
