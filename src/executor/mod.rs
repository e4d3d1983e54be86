//! Task execution infrastructure.
//!
//! This module provides the worker pool, its blocking work queue, the typed
//! task runner built on top of it, and the one-shot futures the runner hands
//! back to callers.

pub mod future;
pub mod panic_handler;
pub mod pool;
pub mod queue;
pub mod runner;
pub mod task;
pub mod worker;

pub use future::{promise, Promise, TaskFuture};
pub use panic_handler::{PanicHandler, PanicInfo, PanicStrategy};
pub use pool::{PoolStats, WorkerPool};
pub use queue::NotificationQueue;
pub use runner::{Apply, RunnerHandle, TaskRunner};
pub use task::{WorkItem, WorkItemId};
