//! Publish/subscribe fan-out of event announcements.

use super::channel::{EventCreatedNotification, NotificationChannel};
use rally_config::NotificationConfig;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Outcome of delivering to one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelOutcome {
    pub channel: String,
    #[serde(flatten)]
    pub status: DeliveryStatus,
}

/// Per-channel results of one dispatch, in subscription order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub outcomes: Vec<ChannelOutcome>,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == DeliveryStatus::Delivered)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

/// Registry of notification channels.
///
/// Built once at startup and shared behind an `Arc`. Every dispatch runs each
/// channel in its own task, so a channel that errors, panics or stalls past
/// the delivery timeout is reported without affecting the others.
pub struct NotificationDispatcher {
    channels: RwLock<Vec<Arc<dyn NotificationChannel>>>,
    delivery_timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(delivery_timeout: Duration) -> Self {
        Self {
            channels: RwLock::new(Vec::new()),
            delivery_timeout,
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(Duration::from_secs(config.delivery_timeout_seconds))
    }

    /// Register a channel. The same channel may be registered more than once
    /// and then receives one delivery per registration.
    pub async fn subscribe(&self, channel: Arc<dyn NotificationChannel>) {
        let mut channels = self.channels.write().await;
        info!(channel = channel.name(), "notification channel subscribed");
        channels.push(channel);
    }

    /// Remove the first registration of `channel`. Returns whether one was found.
    pub async fn unsubscribe(&self, channel: &Arc<dyn NotificationChannel>) -> bool {
        let mut channels = self.channels.write().await;
        match channels.iter().position(|registered| Arc::ptr_eq(registered, channel)) {
            Some(index) => {
                channels.remove(index);
                info!(channel = channel.name(), "notification channel unsubscribed");
                true
            }
            None => false,
        }
    }

    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Deliver `notification` to every channel registered at call time.
    pub async fn dispatch(&self, notification: EventCreatedNotification) -> DispatchReport {
        let channels = self.channels.read().await.clone();
        let notification = Arc::new(notification);
        let timeout = self.delivery_timeout;

        let deliveries: Vec<_> = channels
            .into_iter()
            .map(|channel| {
                let name = channel.name().to_string();
                let notification = Arc::clone(&notification);
                let handle = tokio::spawn(async move {
                    tokio::time::timeout(timeout, channel.receive(&notification)).await
                });
                (name, handle)
            })
            .collect();

        let mut report = DispatchReport::default();
        for (channel, handle) in deliveries {
            let status = match handle.await {
                Ok(Ok(Ok(()))) => DeliveryStatus::Delivered,
                Ok(Ok(Err(err))) => DeliveryStatus::Failed {
                    error: err.to_string(),
                },
                Ok(Err(_)) => DeliveryStatus::Failed {
                    error: format!("timed out after {}s", timeout.as_secs()),
                },
                Err(join_error) if join_error.is_panic() => DeliveryStatus::Failed {
                    error: "channel panicked".to_string(),
                },
                Err(_) => DeliveryStatus::Failed {
                    error: "delivery cancelled".to_string(),
                },
            };

            if let DeliveryStatus::Failed { error } = &status {
                warn!(channel = %channel, event_id = %notification.event.public_id, error = %error, "notification delivery failed");
            }
            report.outcomes.push(ChannelOutcome { channel, status });
        }

        info!(
            event_id = %notification.event.public_id,
            delivered = report.delivered(),
            failed = report.failed(),
            "event announcement dispatched"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::ChannelError;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};
    use rally_database::Event;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Succeed,
        Fail,
        Panic,
        Hang,
    }

    struct TestChannel {
        name: &'static str,
        behaviour: Behaviour,
        calls: AtomicUsize,
    }

    impl TestChannel {
        fn new(name: &'static str, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                name,
                behaviour,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationChannel for TestChannel {
        fn name(&self) -> &str {
            self.name
        }

        async fn receive(&self, _notification: &EventCreatedNotification) -> Result<(), ChannelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Succeed => Ok(()),
                Behaviour::Fail => Err(ChannelError::Rejected { status: 500 }),
                Behaviour::Panic => panic!("channel exploded"),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(())
                }
            }
        }
    }

    fn notification() -> EventCreatedNotification {
        EventCreatedNotification {
            event: Event {
                id: 1,
                public_id: "evt".into(),
                organizer_id: "org".into(),
                title: "Demo".into(),
                description: String::new(),
                speaker: None,
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                location: String::new(),
                tags: Some(vec!["AI".into()]),
                created_at: String::new(),
            },
            interested_users: Vec::new(),
        }
    }

    #[tokio::test]
    async fn failing_channel_does_not_stop_later_channels() {
        let dispatcher = NotificationDispatcher::new(Duration::from_secs(5));
        let a = TestChannel::new("a", Behaviour::Fail);
        let b = TestChannel::new("b", Behaviour::Succeed);
        dispatcher.subscribe(a.clone()).await;
        dispatcher.subscribe(b.clone()).await;

        let report = dispatcher.dispatch(notification()).await;

        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
        assert_eq!(report.outcomes[0].channel, "a");
        assert!(matches!(report.outcomes[0].status, DeliveryStatus::Failed { .. }));
        assert_eq!(report.outcomes[1].status, DeliveryStatus::Delivered);
    }

    #[tokio::test]
    async fn panicking_channel_is_reported_as_failure() {
        let dispatcher = NotificationDispatcher::new(Duration::from_secs(5));
        dispatcher.subscribe(TestChannel::new("boom", Behaviour::Panic)).await;
        let ok = TestChannel::new("ok", Behaviour::Succeed);
        dispatcher.subscribe(ok.clone()).await;

        let report = dispatcher.dispatch(notification()).await;

        assert_eq!(report.failed(), 1);
        assert_eq!(report.delivered(), 1);
        assert_eq!(ok.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_channel_times_out() {
        let dispatcher = NotificationDispatcher::new(Duration::from_secs(1));
        dispatcher.subscribe(TestChannel::new("slow", Behaviour::Hang)).await;

        let report = dispatcher.dispatch(notification()).await;

        assert_eq!(
            report.outcomes[0].status,
            DeliveryStatus::Failed {
                error: "timed out after 1s".to_string()
            }
        );
    }

    #[tokio::test]
    async fn duplicate_subscriptions_each_receive_and_unsubscribe_removes_one() {
        let dispatcher = NotificationDispatcher::new(Duration::from_secs(5));
        let channel = TestChannel::new("dup", Behaviour::Succeed);
        let handle: Arc<dyn NotificationChannel> = channel.clone();
        dispatcher.subscribe(handle.clone()).await;
        dispatcher.subscribe(handle.clone()).await;

        dispatcher.dispatch(notification()).await;
        assert_eq!(channel.calls(), 2);

        assert!(dispatcher.unsubscribe(&handle).await);
        assert_eq!(dispatcher.channel_count().await, 1);
        assert!(dispatcher.unsubscribe(&handle).await);
        assert!(!dispatcher.unsubscribe(&handle).await);
        assert_eq!(dispatcher.channel_count().await, 0);
    }

    #[tokio::test]
    async fn dispatch_without_channels_is_empty() {
        let dispatcher = NotificationDispatcher::new(Duration::from_secs(5));
        let report = dispatcher.dispatch(notification()).await;
        assert!(report.outcomes.is_empty());
    }
}
