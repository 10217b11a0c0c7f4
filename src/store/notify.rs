//! Change notification registry
//!
//! An explicit publish/subscribe table keyed by topic (record kind + bed).
//! Subscriber callbacks return a `Result`; a failing subscriber is logged and
//! skipped so the remaining subscribers are still notified.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

/// The kinds of per-bed records the store publishes changes for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Patient,
    Vitals,
    Medications,
    FluidBalance,
    Notes,
    Alerts,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Patient => "patient",
            RecordKind::Vitals => "vitals",
            RecordKind::Medications => "medications",
            RecordKind::FluidBalance => "fluid_balance",
            RecordKind::Notes => "notes",
            RecordKind::Alerts => "alerts",
        }
    }

    /// Every kind, in cache-key order
    pub fn all() -> [RecordKind; 6] {
        [
            RecordKind::Patient,
            RecordKind::Vitals,
            RecordKind::Medications,
            RecordKind::FluidBalance,
            RecordKind::Notes,
            RecordKind::Alerts,
        ]
    }
}

/// A subscription topic: one record kind on one bed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Topic {
    pub kind: RecordKind,
    pub bed_id: i64,
}

/// A published change
#[derive(Debug, Clone, Serialize)]
pub struct StoreEvent {
    pub kind: RecordKind,
    pub bed_id: i64,
    pub action: &'static str,
    pub payload: Value,
}

/// Error type subscriber callbacks may return
pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;

type Subscriber = Box<dyn Fn(&StoreEvent) -> Result<(), SubscriberError> + Send + Sync>;

/// Token handed back by [`ChangeNotifier::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionToken(u64);

/// Publish/subscribe table for store changes
pub struct ChangeNotifier {
    subscribers: Mutex<SubscriberTable>,
}

#[derive(Default)]
struct SubscriberTable {
    next_token: u64,
    by_topic: HashMap<Topic, Vec<(SubscriptionToken, Subscriber)>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(SubscriberTable::default()),
        }
    }

    /// Register a callback for a topic
    pub fn subscribe<F>(&self, topic: Topic, callback: F) -> SubscriptionToken
    where
        F: Fn(&StoreEvent) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        let mut table = self.subscribers.lock().unwrap();
        table.next_token += 1;
        let token = SubscriptionToken(table.next_token);
        table
            .by_topic
            .entry(topic)
            .or_default()
            .push((token, Box::new(callback)));
        token
    }

    /// Remove a subscription; returns whether it was present
    pub fn unsubscribe(&self, topic: Topic, token: SubscriptionToken) -> bool {
        let mut table = self.subscribers.lock().unwrap();
        if let Some(callbacks) = table.by_topic.get_mut(&topic) {
            let before = callbacks.len();
            callbacks.retain(|(t, _)| *t != token);
            return callbacks.len() < before;
        }
        false
    }

    /// Deliver an event to every subscriber on its topic.
    ///
    /// A callback error is logged and does not stop delivery to the rest.
    /// Returns the number of subscribers notified without error.
    pub fn publish(&self, event: &StoreEvent) -> usize {
        let table = self.subscribers.lock().unwrap();
        let topic = Topic {
            kind: event.kind,
            bed_id: event.bed_id,
        };

        let Some(callbacks) = table.by_topic.get(&topic) else {
            return 0;
        };

        let mut delivered = 0;
        for (token, callback) in callbacks {
            match callback(event) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        kind = event.kind.as_str(),
                        bed_id = event.bed_id,
                        token = token.0,
                        error = %e,
                        "store subscriber failed"
                    );
                }
            }
        }
        delivered
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn event(kind: RecordKind, bed_id: i64) -> StoreEvent {
        StoreEvent {
            kind,
            bed_id,
            action: "recorded",
            payload: json!({}),
        }
    }

    #[test]
    fn test_publish_reaches_topic_subscribers_only() {
        let notifier = ChangeNotifier::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        notifier.subscribe(Topic { kind: RecordKind::Vitals, bed_id: 1 }, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert_eq!(notifier.publish(&event(RecordKind::Vitals, 1)), 1);
        assert_eq!(notifier.publish(&event(RecordKind::Vitals, 2)), 0);
        assert_eq!(notifier.publish(&event(RecordKind::Patient, 1)), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_subscriber_does_not_block_others() {
        let notifier = ChangeNotifier::new();
        let topic = Topic { kind: RecordKind::Alerts, bed_id: 3 };
        let hits = Arc::new(AtomicUsize::new(0));

        notifier.subscribe(topic, |_| Err("subscriber broke".into()));
        let counter = hits.clone();
        notifier.subscribe(topic, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert_eq!(notifier.publish(&event(RecordKind::Alerts, 3)), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let notifier = ChangeNotifier::new();
        let topic = Topic { kind: RecordKind::Notes, bed_id: 2 };

        let token = notifier.subscribe(topic, |_| Ok(()));
        assert_eq!(notifier.publish(&event(RecordKind::Notes, 2)), 1);

        assert!(notifier.unsubscribe(topic, token));
        assert!(!notifier.unsubscribe(topic, token));
        assert_eq!(notifier.publish(&event(RecordKind::Notes, 2)), 0);
    }
}
