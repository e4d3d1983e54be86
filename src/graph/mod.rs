//! Composable task graphs.
//!
//! A graph is built from three node shapes:
//!
//! - [`Leaf`]: one callable, run inline on whatever thread executes it.
//! - [`Sequence`]: two nodes, the second fed with the first's results.
//! - [`ParallelAll`]: sibling nodes run concurrently on the same input, their
//!   results concatenated in declaration order.
//!
//! Every node declares the [`Schema`] of values it consumes and produces.
//! Composition checks schemas up front, so a graph that builds is a graph
//! whose values line up.

pub mod callable;
pub mod driver;
pub mod leaf;
pub mod node;
pub mod parallel;
pub mod sequence;
pub mod value;

pub use callable::Callable;
pub use driver::{async_execute, sync_execute};
pub use leaf::Leaf;
pub use node::{leaf, when_all, Continuation, GraphNode, IntoNode, Node, Outcome};
pub use parallel::ParallelAll;
pub use sequence::Sequence;
pub use value::{FromValues, IntoValues, Kind, Payload, Schema, Value, Values};
