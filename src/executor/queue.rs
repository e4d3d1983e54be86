//! Unbounded blocking FIFO shared by all workers of a pool.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

#[derive(Debug)]
struct QueueState<T> {
    items: VecDeque<T>,
    running: bool,
}

/// Thread-safe FIFO with a blocking pop and one-way shutdown.
///
/// Producers never block on capacity. After [`shutdown`](Self::shutdown) no
/// new items may be pushed, but consumers keep draining what is left.
#[derive(Debug)]
pub struct NotificationQueue<T> {
    state: Mutex<QueueState<T>>,
    cv: Condvar,
}

impl<T> Default for NotificationQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NotificationQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                running: true,
            }),
            cv: Condvar::new(),
        }
    }

    /// Append an item and wake one waiter.
    ///
    /// # Panics
    ///
    /// Panics if the queue was already shut down.
    pub fn push(&self, item: T) {
        {
            let mut state = self.state.lock();
            assert!(state.running, "push on a shut down notification queue");
            state.items.push_back(item);
        }
        self.cv.notify_one();
    }

    /// Block until an item is available and dequeue it.
    ///
    /// Returns `None` only once the queue is both empty and shut down.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        while state.items.is_empty() && state.running {
            self.cv.wait(&mut state);
        }
        state.items.pop_front()
    }

    /// Stop accepting work and wake every waiter. Idempotent.
    pub fn shutdown(&self) {
        self.state.lock().running = false;
        self.cv.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        !self.state.lock().running
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fifo_order() {
        let queue = NotificationQueue::new();
        for i in 0..5 {
            queue.push(i);
        }
        let popped: Vec<i32> = (0..5).map(|_| queue.pop().unwrap()).collect();
        assert_eq!(popped, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_drains_after_shutdown() {
        let queue = NotificationQueue::new();
        queue.push(1);
        queue.push(2);
        queue.shutdown();

        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_shutdown_wakes_blocked_pop() {
        let queue = Arc::new(NotificationQueue::<u32>::new());
        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.pop())
        };

        thread::sleep(Duration::from_millis(10));
        queue.shutdown();
        assert_eq!(consumer.join().unwrap(), None);
    }

    #[test]
    fn test_blocked_pop_gets_item() {
        let queue = Arc::new(NotificationQueue::new());
        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.pop())
        };

        thread::sleep(Duration::from_millis(10));
        queue.push("work");
        assert_eq!(consumer.join().unwrap(), Some("work"));
    }

    #[test]
    #[should_panic(expected = "shut down")]
    fn test_push_after_shutdown_panics() {
        let queue = NotificationQueue::new();
        queue.shutdown();
        queue.push(1);
    }
}
