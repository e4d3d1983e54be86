//! Blocking cross-thread signals.
//!
//! Both events latch: a `notify()` that happens before `wait()` is not lost,
//! the waiter simply returns immediately.

use parking_lot::{Condvar, Mutex};

/// Event that stays triggered until [`ManualEvent::reset`] is called.
///
/// Every waiter, current or future, is released once `notify()` fires.
#[derive(Debug, Default)]
pub struct ManualEvent {
    triggered: Mutex<bool>,
    cv: Condvar,
}

impl ManualEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the event is triggered.
    pub fn wait(&self) {
        let mut triggered = self.triggered.lock();
        while !*triggered {
            self.cv.wait(&mut triggered);
        }
    }

    pub fn notify(&self) {
        let mut triggered = self.triggered.lock();
        *triggered = true;
        self.cv.notify_all();
    }

    /// Arm the event for another round.
    pub fn reset(&self) {
        *self.triggered.lock() = false;
    }

    pub fn is_set(&self) -> bool {
        *self.triggered.lock()
    }
}

/// Event whose successful `wait()` consumes the trigger.
///
/// Meant for one notifier and one waiter taking turns. With several waiters
/// only one of them gets through per `notify()`.
#[derive(Debug, Default)]
pub struct AutoEvent {
    triggered: Mutex<bool>,
    cv: Condvar,
}

impl AutoEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait(&self) {
        let mut triggered = self.triggered.lock();
        while !*triggered {
            self.cv.wait(&mut triggered);
        }
        *triggered = false;
    }

    pub fn notify(&self) {
        let mut triggered = self.triggered.lock();
        *triggered = true;
        self.cv.notify_all();
    }

    pub fn reset(&self) {
        *self.triggered.lock() = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_manual_notify_before_wait() {
        let event = ManualEvent::new();
        event.notify();
        event.wait();
        // still triggered, second wait passes too
        event.wait();
        assert!(event.is_set());
    }

    #[test]
    fn test_manual_reset() {
        let event = ManualEvent::new();
        event.notify();
        event.reset();
        assert!(!event.is_set());
    }

    #[test]
    fn test_manual_releases_all_waiters() {
        let event = Arc::new(ManualEvent::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let event = event.clone();
                thread::spawn(move || event.wait())
            })
            .collect();

        thread::sleep(Duration::from_millis(10));
        event.notify();

        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn test_auto_consumes_trigger() {
        let event = Arc::new(AutoEvent::new());
        event.notify();
        event.wait();

        let waiter = {
            let event = event.clone();
            thread::spawn(move || event.wait())
        };
        thread::sleep(Duration::from_millis(10));
        assert!(!waiter.is_finished());

        event.notify();
        waiter.join().unwrap();
    }
}
