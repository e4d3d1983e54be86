//! Typed submission on top of the raw worker pool.

use super::future::{promise, TaskFuture};
use super::panic_handler::catch_panic;
use super::pool::WorkerPool;
use super::queue::NotificationQueue;
use super::task::WorkItem;
use crate::config::Config;
use crate::error::{Error, Result};
use std::sync::Arc;

/// A callable applied to a by-value argument tuple.
///
/// Implemented for every `FnOnce` of up to eight parameters, so a function
/// and its arguments can be captured as one owned record.
pub trait Apply<Args>: Send + 'static {
    type Output;

    fn apply(self, args: Args) -> Self::Output;
}

macro_rules! impl_apply {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> Apply<($($arg,)*)> for Func
        where
            Func: FnOnce($($arg),*) -> Out + Send + 'static,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn apply(self, ($($arg,)*): ($($arg,)*)) -> Out {
                self($($arg),*)
            }
        }
    };
}

impl_apply!();
impl_apply!(A1);
impl_apply!(A1, A2);
impl_apply!(A1, A2, A3);
impl_apply!(A1, A2, A3, A4);
impl_apply!(A1, A2, A3, A4, A5);
impl_apply!(A1, A2, A3, A4, A5, A6);
impl_apply!(A1, A2, A3, A4, A5, A6, A7);
impl_apply!(A1, A2, A3, A4, A5, A6, A7, A8);

/// Cheap, cloneable submission handle.
///
/// Graph nodes carry this around while they execute. It does not keep the
/// worker threads alive: submitting after the owning [`TaskRunner`] is dropped
/// is a contract violation and panics.
#[derive(Debug, Clone)]
pub struct RunnerHandle {
    queue: Arc<NotificationQueue<WorkItem>>,
}

impl RunnerHandle {
    /// Fire-and-forget. A panic inside `f` is handled by the worker's
    /// panic strategy, never reported back.
    pub fn run<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.push(WorkItem::new(f));
    }

    pub fn run_with<F, A>(&self, f: F, args: A)
    where
        F: Apply<A>,
        A: Send + 'static,
    {
        self.run(move || {
            f.apply(args);
        });
    }

    /// Submit `f` and get a future of its result.
    ///
    /// Returns immediately. A panic inside `f` is captured into the future
    /// and surfaces as [`Error::TaskPanicked`] on retrieval.
    pub fn run_async<F, R>(&self, f: F) -> TaskFuture<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (promise, future) = promise();
        self.run(move || promise.set(catch_panic(f).map_err(Error::from)));
        future
    }

    pub fn run_async_with<F, A>(&self, f: F, args: A) -> TaskFuture<F::Output>
    where
        F: Apply<A>,
        F::Output: Send + 'static,
        A: Send + 'static,
    {
        self.run_async(move || f.apply(args))
    }

    pub fn is_shutdown(&self) -> bool {
        self.queue.is_shutdown()
    }
}

impl AsRef<RunnerHandle> for RunnerHandle {
    fn as_ref(&self) -> &RunnerHandle {
        self
    }
}

/// Owns a [`WorkerPool`] and exposes typed submission.
#[derive(Debug)]
pub struct TaskRunner {
    handle: RunnerHandle,
    pool: WorkerPool,
}

impl TaskRunner {
    pub fn new(config: &Config) -> Result<Self> {
        let pool = WorkerPool::new(config)?;
        let handle = RunnerHandle {
            queue: pool.queue().clone(),
        };
        Ok(Self { handle, pool })
    }

    pub fn with_threads(n: usize) -> Result<Self> {
        Self::new(&Config::with_threads(n))
    }

    /// Runner sized to the detected hardware concurrency.
    pub fn with_default_threads() -> Result<Self> {
        Self::new(&Config::default())
    }

    pub fn handle(&self) -> &RunnerHandle {
        &self.handle
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn num_threads(&self) -> usize {
        self.pool.num_threads()
    }

    pub fn run<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.handle.run(f);
    }

    pub fn run_with<F, A>(&self, f: F, args: A)
    where
        F: Apply<A>,
        A: Send + 'static,
    {
        self.handle.run_with(f, args);
    }

    pub fn run_async<F, R>(&self, f: F) -> TaskFuture<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.handle.run_async(f)
    }

    pub fn run_async_with<F, A>(&self, f: F, args: A) -> TaskFuture<F::Output>
    where
        F: Apply<A>,
        F::Output: Send + 'static,
        A: Send + 'static,
    {
        self.handle.run_async_with(f, args)
    }
}

impl AsRef<RunnerHandle> for TaskRunner {
    fn as_ref(&self) -> &RunnerHandle {
        &self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{AutoEvent, ManualEvent};
    use parking_lot::Mutex;

    fn sum3(a: i32, b: i32, c: i32) -> i32 {
        a + b + c
    }

    #[test]
    fn test_run_plain_function_with_args() {
        let runner = TaskRunner::with_threads(2).unwrap();
        let result = Arc::new(Mutex::new(0));
        let event = Arc::new(AutoEvent::new());

        let (sink, done) = (result.clone(), event.clone());
        runner.run_with(
            move |a: i32, b: i32, c: i32| {
                *sink.lock() = sum3(a, b, c);
                done.notify();
            },
            (1, 2, 3),
        );
        event.wait();

        assert_eq!(*result.lock(), 6);
    }

    #[test]
    fn test_args_are_moved_in() {
        let runner = TaskRunner::with_threads(1).unwrap();
        let v = vec![10; 5];
        let len = runner
            .run_async_with(|v: Vec<i32>| v.len(), (v,))
            .wait()
            .unwrap();
        assert_eq!(len, 5);
    }

    #[test]
    fn test_shared_state_through_arc() {
        let runner = TaskRunner::with_threads(2).unwrap();
        let v = Arc::new(Mutex::new(vec![10; 5]));
        let event = Arc::new(ManualEvent::new());

        runner.run_with(
            |v: Arc<Mutex<Vec<i32>>>, e: Arc<ManualEvent>| {
                v.lock().push(10);
                e.notify();
            },
            (v.clone(), event.clone()),
        );
        event.wait();

        assert_eq!(v.lock().len(), 6);
    }

    #[test]
    fn test_run_async_value() {
        let runner = TaskRunner::with_threads(2).unwrap();
        let mut future = runner.run_async_with(sum3, (3, 4, 5));
        assert!(future.valid());
        assert_eq!(future.get().unwrap(), 12);
        assert!(!future.valid());
    }

    #[test]
    fn test_run_async_unit() {
        let runner = TaskRunner::with_threads(1).unwrap();
        let future = runner.run_async(|| {});
        assert!(future.wait().is_ok());
    }

    #[test]
    fn test_run_async_captures_panic() {
        let runner = TaskRunner::with_threads(1).unwrap();
        let future = runner.run_async(|| -> i32 { panic!("division by zero") });

        match future.wait() {
            Err(Error::TaskPanicked(msg)) => assert_eq!(msg, "division by zero"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        // captured panics never reach the worker's handler
        assert_eq!(runner.pool().panic_count(), 0);
    }

    #[test]
    #[should_panic(expected = "shut down")]
    fn test_handle_after_teardown_panics() {
        let runner = TaskRunner::with_threads(1).unwrap();
        let handle = runner.handle().clone();
        drop(runner);
        assert!(handle.is_shutdown());
        handle.run(|| {});
    }
}
