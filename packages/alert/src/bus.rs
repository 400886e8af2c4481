//! Alert event subscriptions.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::AlertEvent;

type Handler = Arc<dyn Fn(&AlertEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: BTreeMap<u64, Handler>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // A handler that panicked while the table was locked leaves it intact.
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out of alert events to subscribed handlers.
///
/// Cloning the bus yields another handle to the same subscriber table.
#[derive(Clone, Default)]
pub struct AlertBus {
    registry: Arc<Mutex<Registry>>,
}

impl AlertBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every subsequently published event.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// dropped or [`Subscription::unsubscribe`] is called.
    #[must_use = "dropping the subscription unsubscribes the handler"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&AlertEvent) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.insert(id, Arc::new(handler));
        log::debug!("Alert subscriber {id} registered");

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers `event` to every current subscriber, in subscription order.
    /// Returns the number of handlers called.
    ///
    /// Handlers run outside the lock, so they may subscribe or unsubscribe.
    pub fn publish(&self, event: &AlertEvent) -> usize {
        let handlers: Vec<Handler> = lock(&self.registry).handlers.values().cloned().collect();
        for handler in &handlers {
            handler(event);
        }
        log::debug!(
            "Published alert {} to {} subscriber(s)",
            event.id,
            handlers.len()
        );
        handlers.len()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).handlers.len()
    }
}

/// Handle to a registered alert handler.
#[must_use = "dropping the subscription unsubscribes the handler"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Removes the handler from the bus.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).handlers.remove(&self.id);
            log::debug!("Alert subscriber {} removed", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn event() -> AlertEvent {
        AlertEvent {
            id: "e1".to_string(),
            location: "Jajarkot, Nepal".to_string(),
            magnitude: "5.7".to_string(),
            time: "now".to_string(),
        }
    }

    fn counter(bus: &AlertBus) -> (Arc<AtomicUsize>, Subscription) {
        let seen = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&seen);
        let subscription = bus.subscribe(move |_| {
            handle.fetch_add(1, Ordering::SeqCst);
        });
        (seen, subscription)
    }

    #[test]
    fn publishes_to_all_subscribers() {
        let bus = AlertBus::new();
        let (a, _sa) = counter(&bus);
        let (b, _sb) = counter(&bus);

        assert_eq!(bus.publish(&event()), 2);
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribed_handlers_receive_nothing() {
        let bus = AlertBus::new();
        let (seen, subscription) = counter(&bus);
        subscription.unsubscribe();

        assert_eq!(bus.publish(&event()), 0);
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus = AlertBus::new();
        {
            let (_seen, _subscription) = counter(&bus);
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outliving_bus_drops_cleanly() {
        let bus = AlertBus::new();
        let (_seen, subscription) = counter(&bus);
        drop(bus);
        subscription.unsubscribe();
    }

    #[test]
    fn clones_share_subscribers() {
        let bus = AlertBus::new();
        let (seen, _subscription) = counter(&bus);
        bus.clone().publish(&event());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
