pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{PanicStrategy, RunnerHandle, TaskFuture, TaskRunner, WorkerPool};

pub use crate::graph::{
    async_execute, leaf, sync_execute, FromValues, IntoNode, IntoValues, Node, Values,
};
pub use crate::util::{AutoEvent, ManualEvent};

// brings in both the `when_all` function and the `when_all!` macro
pub use crate::when_all;
