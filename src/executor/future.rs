//! One-shot promise/future pair connecting a pool worker to a waiting caller.

use crate::error::{Error, Result};
use crossbeam_channel::{bounded, Receiver, Sender};

/// Producer half. Consumed by setting a value or an error.
#[derive(Debug)]
pub struct Promise<T> {
    tx: Sender<Result<T>>,
}

/// Consumer half. Single use: the value can be retrieved exactly once.
#[derive(Debug)]
pub struct TaskFuture<T> {
    rx: Option<Receiver<Result<T>>>,
}

/// Create a connected promise/future pair.
pub fn promise<T>() -> (Promise<T>, TaskFuture<T>) {
    let (tx, rx) = bounded(1);
    (Promise { tx }, TaskFuture { rx: Some(rx) })
}

impl<T> Promise<T> {
    pub fn set_value(self, value: T) {
        self.set(Ok(value));
    }

    pub fn set_error(self, err: Error) {
        self.set(Err(err));
    }

    pub fn set(self, outcome: Result<T>) {
        // the future may already be gone, nobody is left to tell
        let _ = self.tx.send(outcome);
    }
}

impl<T> TaskFuture<T> {
    /// Block until the producer delivers, then return its outcome.
    ///
    /// # Panics
    ///
    /// Panics if the value was already retrieved.
    pub fn get(&mut self) -> Result<T> {
        let rx = match self.rx.take() {
            Some(rx) => rx,
            None => panic!("TaskFuture::get called on an already retrieved future"),
        };
        rx.recv().unwrap_or(Err(Error::Disconnected))
    }

    /// Consuming variant of [`get`](Self::get).
    pub fn wait(mut self) -> Result<T> {
        self.get()
    }

    /// `true` until the value has been retrieved.
    pub fn valid(&self) -> bool {
        self.rx.is_some()
    }

    /// `true` once an outcome is available without blocking.
    pub fn is_ready(&self) -> bool {
        self.rx.as_ref().map_or(false, |rx| !rx.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_value_crosses_threads() {
        let (p, mut f) = promise();
        thread::spawn(move || p.set_value(7));
        assert!(f.valid());
        assert_eq!(f.get().unwrap(), 7);
        assert!(!f.valid());
    }

    #[test]
    fn test_error_surfaces_on_get() {
        let (p, f) = promise::<i32>();
        p.set_error(Error::TaskPanicked("nope".into()));
        assert!(matches!(f.wait(), Err(Error::TaskPanicked(_))));
    }

    #[test]
    fn test_dropped_promise_disconnects() {
        let (p, f) = promise::<()>();
        drop(p);
        assert!(matches!(f.wait(), Err(Error::Disconnected)));
    }

    #[test]
    #[should_panic(expected = "already retrieved")]
    fn test_second_get_panics() {
        let (p, mut f) = promise();
        p.set_value(1);
        let _ = f.get();
        let _ = f.get();
    }
}
