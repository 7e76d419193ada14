//! Ephemeral alerts raised by a watch.
//!
//! A [`NotificationBoard`] holds at most one alert per [`NotificationKind`]. Raising an alert
//! replaces the previous one of the same kind and schedules its removal after the kind's
//! lifetime. Subscribers observe the board through a `tokio::sync::watch` channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    NewRecord,
    Cancelled,
}

impl NotificationKind {
    /// How long an alert of this kind stays visible.
    pub fn lifetime(self) -> Duration {
        match self {
            NotificationKind::NewRecord => Duration::from_secs(5),
            NotificationKind::Cancelled => Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// The list grew since the previous poll. Carries the new total.
    NewRecord { total: usize },
    /// A record moved into the cancelled state.
    Cancelled { id: String, display_name: String },
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::NewRecord { .. } => NotificationKind::NewRecord,
            Notification::Cancelled { .. } => NotificationKind::Cancelled,
        }
    }

    /// Text suitable for a toast.
    pub fn message(&self) -> String {
        match self {
            Notification::NewRecord { total } => format!("New order received! Total orders: {total}"),
            Notification::Cancelled { id, display_name } => {
                format!("Order {id} was cancelled by {display_name}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    notification: Notification,
    generation: u64,
}

/// The alerts currently visible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveNotifications {
    new_record: Option<Slot>,
    cancelled: Option<Slot>,
    generation: u64,
}

impl ActiveNotifications {
    pub fn get(&self, kind: NotificationKind) -> Option<&Notification> {
        self.slot(kind).as_ref().map(|s| &s.notification)
    }

    pub fn is_empty(&self) -> bool {
        self.new_record.is_none() && self.cancelled.is_none()
    }

    fn slot(&self, kind: NotificationKind) -> &Option<Slot> {
        match kind {
            NotificationKind::NewRecord => &self.new_record,
            NotificationKind::Cancelled => &self.cancelled,
        }
    }

    fn slot_mut(&mut self, kind: NotificationKind) -> &mut Option<Slot> {
        match kind {
            NotificationKind::NewRecord => &mut self.new_record,
            NotificationKind::Cancelled => &mut self.cancelled,
        }
    }
}

/// Holds the visible alerts of one watch.
#[derive(Debug, Clone)]
pub struct NotificationBoard {
    sender: Arc<watch::Sender<ActiveNotifications>>,
}

impl Default for NotificationBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBoard {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ActiveNotifications::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ActiveNotifications> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> ActiveNotifications {
        self.sender.borrow().clone()
    }

    /// Shows `notification`, replacing any alert of the same kind, and clears it after the
    /// kind's lifetime unless it has been replaced in the meantime.
    pub fn raise(&self, notification: Notification) {
        let kind = notification.kind();
        info!(?kind, message = %notification.message(), "Notification raised");

        let mut generation = 0;
        self.sender.send_modify(|active| {
            active.generation += 1;
            generation = active.generation;
            *active.slot_mut(kind) = Some(Slot {
                notification,
                generation,
            });
        });

        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(kind.lifetime()).await;
            sender.send_if_modified(|active| {
                let slot = active.slot_mut(kind);
                if slot.as_ref().is_some_and(|s| s.generation == generation) {
                    debug!(?kind, "Notification expired");
                    *slot = None;
                    true
                } else {
                    false
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_new_record_alert_clears_after_five_seconds() {
        let board = NotificationBoard::new();
        let mut rx = board.subscribe();
        let started = Instant::now();

        board.raise(Notification::NewRecord { total: 3 });
        rx.borrow_and_update();
        assert!(board.current().get(NotificationKind::NewRecord).is_some());

        rx.changed().await.unwrap();
        assert!(board.current().is_empty());
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacement_restarts_the_lifetime() {
        let board = NotificationBoard::new();
        let mut rx = board.subscribe();
        let started = Instant::now();

        board.raise(Notification::Cancelled {
            id: "O1".into(),
            display_name: "Asha".into(),
        });
        tokio::time::sleep(Duration::from_secs(6)).await;
        board.raise(Notification::Cancelled {
            id: "O2".into(),
            display_name: "Ravi".into(),
        });
        rx.borrow_and_update();

        // The first alert's timer fires at 10 s but must not clear the replacement.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(
            board.current().get(NotificationKind::Cancelled),
            Some(&Notification::Cancelled {
                id: "O2".into(),
                display_name: "Ravi".into()
            })
        );

        rx.changed().await.unwrap();
        assert!(board.current().is_empty());
        assert_eq!(started.elapsed(), Duration::from_secs(16));
    }

    #[tokio::test(start_paused = true)]
    async fn test_kinds_do_not_replace_each_other() {
        let board = NotificationBoard::new();
        board.raise(Notification::NewRecord { total: 2 });
        board.raise(Notification::Cancelled {
            id: "O1".into(),
            display_name: "Asha".into(),
        });

        let active = board.current();
        assert!(active.get(NotificationKind::NewRecord).is_some());
        assert!(active.get(NotificationKind::Cancelled).is_some());

        tokio::time::sleep(Duration::from_secs(7)).await;
        let active = board.current();
        assert!(active.get(NotificationKind::NewRecord).is_none());
        assert!(active.get(NotificationKind::Cancelled).is_some());
    }
}
