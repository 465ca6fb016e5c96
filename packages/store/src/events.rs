//! Topic-based publish/subscribe for data-change notifications.

use std::collections::BTreeMap;

use dsp_quality_models::ReportCategory;

/// Handler invoked with the topic and payload of a published event.
pub type Handler = Box<dyn Fn(&str, &serde_json::Value) + Send + Sync>;

/// Identifies a subscription for [`EventBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Topic published after a category's data was saved.
#[must_use]
pub fn data_updated_topic(category: ReportCategory) -> String {
    format!("{category}-data-updated")
}

/// Maps topics to ordered handler lists.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    handlers: BTreeMap<String, Vec<(SubscriptionId, Handler)>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.handlers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Creates a bus without subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `topic`. Handlers run in subscription order.
    pub fn subscribe(&mut self, topic: &str, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(topic.to_owned())
            .or_default()
            .push((id, handler));
        id
    }

    /// Removes a subscription. Returns `true` if it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        self.handlers.retain(|_, handlers| {
            let before = handlers.len();
            handlers.retain(|(h, _)| *h != id);
            removed |= handlers.len() != before;
            !handlers.is_empty()
        });
        removed
    }

    /// Invokes every handler of `topic` and returns how many ran.
    pub fn publish(&self, topic: &str, payload: &serde_json::Value) -> usize {
        let Some(handlers) = self.handlers.get(topic) else {
            log::debug!("No subscribers for '{topic}'");
            return 0;
        };
        for (_, handler) in handlers {
            handler(topic, payload);
        }
        log::debug!("Published '{topic}' to {} subscribers", handlers.len());
        handlers.len()
    }
}
