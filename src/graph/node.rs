//! The node capability shared by every graph shape, and composition.

use super::callable::Callable;
use super::leaf::Leaf;
use super::parallel::ParallelAll;
use super::sequence::Sequence;
use super::value::{Schema, Values};
use crate::error::Result;
use crate::executor::RunnerHandle;
use std::fmt;
use std::sync::Arc;

/// What one node execution delivers: its ordered values, or the failure
/// that stopped it.
pub type Outcome = Result<Values>;

/// "What to do next", invoked exactly once per node execution.
pub type Continuation = Box<dyn FnOnce(Outcome) + Send + 'static>;

/// One executable graph shape.
///
/// Implementations are immutable after construction and may be executed any
/// number of times, concurrently.
pub trait GraphNode: Send + Sync + 'static {
    /// Kinds this node expects as arguments.
    fn input_schema(&self) -> &Schema;

    /// Kinds this node hands to its continuation on success.
    fn output_schema(&self) -> &Schema;

    /// Run with `args`, then call `then` once with the outcome.
    ///
    /// Work may be handed to `runner`; the call itself never blocks.
    fn execute(&self, runner: &RunnerHandle, then: Continuation, args: Values);

    /// Short label used in `Debug` output.
    fn label(&self) -> &'static str;
}

/// Shared handle to an immutable graph node.
///
/// Cloning is cheap. Composing never changes an existing node, it builds a
/// new one that shares its children.
#[derive(Clone)]
pub struct Node {
    inner: Arc<dyn GraphNode>,
}

impl Node {
    pub fn new<N: GraphNode>(node: N) -> Self {
        Self {
            inner: Arc::new(node),
        }
    }

    pub fn input_schema(&self) -> &Schema {
        self.inner.input_schema()
    }

    pub fn output_schema(&self) -> &Schema {
        self.inner.output_schema()
    }

    pub fn execute(&self, runner: &RunnerHandle, then: Continuation, args: Values) {
        self.inner.execute(runner, then, args);
    }

    /// `self`, then `next` with `self`'s results.
    pub fn then<T, M>(&self, next: T) -> Result<Node>
    where
        T: IntoNode<M>,
    {
        Ok(Node::new(Sequence::new(self.clone(), next.into_node())?))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.inner.label())
            .field("input", &self.input_schema())
            .field("output", &self.output_schema())
            .finish()
    }
}

/// Either a node or a bare callable that becomes a [`Leaf`].
pub trait IntoNode<Marker> {
    fn into_node(self) -> Node;
}

#[doc(hidden)]
#[derive(Debug)]
pub struct NodeMarker;

#[doc(hidden)]
#[derive(Debug)]
pub struct GraphNodeMarker;

#[doc(hidden)]
#[derive(Debug)]
pub struct CallableMarker<M>(std::marker::PhantomData<M>);

impl IntoNode<NodeMarker> for Node {
    fn into_node(self) -> Node {
        self
    }
}

impl IntoNode<NodeMarker> for &Node {
    fn into_node(self) -> Node {
        self.clone()
    }
}

impl<N: GraphNode> IntoNode<GraphNodeMarker> for N {
    fn into_node(self) -> Node {
        Node::new(self)
    }
}

impl<F, M> IntoNode<CallableMarker<M>> for F
where
    F: Callable<M>,
    M: 'static,
{
    fn into_node(self) -> Node {
        Node::new(Leaf::new(self))
    }
}

/// Wrap a callable as a leaf node.
pub fn leaf<F, M>(f: F) -> Node
where
    F: Callable<M>,
    M: 'static,
{
    Node::new(Leaf::new(f))
}

/// Run every node on the same input in parallel and concatenate their
/// results in the given order.
pub fn when_all<I>(nodes: I) -> Result<Node>
where
    I: IntoIterator<Item = Node>,
{
    Ok(Node::new(ParallelAll::new(nodes.into_iter().collect())?))
}

/// [`when_all`] over a mix of nodes and bare callables.
///
/// ```
/// use taskweave::{leaf, when_all};
///
/// let sum = when_all!(|| 1, || 2, leaf(|| 3))
///     .and_then(|all| all.then(|a: i32, b: i32, c: i32| a + b + c))
///     .unwrap();
/// assert_eq!(sum.output_schema().len(), 1);
/// ```
#[macro_export]
macro_rules! when_all {
    ($($node:expr),+ $(,)?) => {
        $crate::graph::when_all(::std::vec![$($crate::graph::IntoNode::into_node($node)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_then_checks_schema() {
        let produce = leaf(|| 5i32);
        assert!(produce.then(|x: i32| x * 2).is_ok());

        let err = produce.then(|s: String| s.len()).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }

    #[test]
    fn test_composition_does_not_mutate() {
        let base = leaf(|x: i32| x + 1);
        let chained = base.then(|x: i32| x.to_string()).unwrap();

        assert_eq!(base.output_schema().len(), 1);
        assert_eq!(base.output_schema().kinds()[0], crate::graph::Kind::of::<i32>());
        assert_eq!(chained.output_schema().kinds()[0], crate::graph::Kind::of::<String>());
        assert_eq!(chained.input_schema(), base.input_schema());
    }

    #[test]
    fn test_macro_mixes_nodes_and_closures() {
        let node = when_all!(|| 1, || {}, leaf(|| "x")).unwrap();
        assert_eq!(node.output_schema().len(), 2);
        assert!(node.input_schema().is_empty());
    }

    #[test]
    fn test_debug_names_shape() {
        let node = leaf(|| 1).then(|_: i32| {}).unwrap();
        assert!(format!("{:?}", node).contains("sequence"));
    }
}
