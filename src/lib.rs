//! taskweave - a fixed-size worker pool with composable task graphs
//!
//! The crate has two layers. The executor layer is a plain thread pool: N
//! workers draining one blocking FIFO, with a [`TaskRunner`] on top for
//! fire-and-forget and future-returning submission. The graph layer
//! describes computations as nodes (leaf, sequence, parallel fan-out) and
//! drives them on that runner, threading each node's results into the next.
//!
//! # Quick Start
//!
//! ```
//! use taskweave::prelude::*;
//! use parking_lot::Mutex;
//! use std::sync::Arc;
//!
//! let runner = TaskRunner::with_threads(4).unwrap();
//!
//! let graph = when_all!(|| 1, || 2, || 3, || 4, || 5)
//!     .and_then(|all| all.then(|a: i32, b: i32, c: i32, d: i32, e: i32| a + b + c + d + e))
//!     .unwrap();
//!
//! let sink = Arc::new(Mutex::new(0));
//! let out = sink.clone();
//! sync_execute(&runner, &graph, move |sum: i32| *out.lock() = sum, ()).unwrap();
//!
//! assert_eq!(*sink.lock(), 15);
//! ```
//!
//! # Failures
//!
//! A panic inside a leaf is caught and travels down the graph as
//! [`Error::TaskPanicked`]. Sequences skip their second half, parallel nodes
//! wait for every branch and report the first failure in declaration order,
//! and both drivers hand the error back to the caller instead of hanging.

#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod graph;
pub mod prelude;
pub mod util;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use executor::{PanicStrategy, RunnerHandle, TaskFuture, TaskRunner, WorkerPool};
pub use graph::{async_execute, leaf, sync_execute, when_all, Node};
pub use util::{AutoEvent, ManualEvent};
