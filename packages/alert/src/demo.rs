//! Timer-driven demo alert.

use std::time::Duration;

use crate::{AlertBus, AlertEvent};

/// Delay before the demo alert fires.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

/// Publishes a single fixed alert after a delay.
#[derive(Debug, Clone)]
pub struct DemoAlertSource {
    delay: Duration,
    event: AlertEvent,
}

impl Default for DemoAlertSource {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl DemoAlertSource {
    /// Creates a source that fires the demo alert after `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            event: AlertEvent {
                id: "demo-earthquake-1".to_string(),
                location: "Dolakha, Nepal".to_string(),
                magnitude: "4.5".to_string(),
                time: "February 25, 2025, 10:30 AM".to_string(),
            },
        }
    }

    /// The alert this source publishes.
    #[must_use]
    pub const fn event(&self) -> &AlertEvent {
        &self.event
    }

    /// Waits for the delay, then publishes the alert on `bus`.
    pub async fn run(self, bus: AlertBus) {
        log::debug!("Demo alert scheduled in {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
        bus.publish(&self.event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn publishes_after_delay() {
        let bus = AlertBus::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let _subscription = bus.subscribe(move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        let source = DemoAlertSource::default();
        let expected = source.event().clone();
        let task = tokio::spawn(source.run(bus.clone()));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(received.lock().unwrap().is_empty());

        task.await.unwrap();
        assert_eq!(*received.lock().unwrap(), vec![expected]);
    }
}
