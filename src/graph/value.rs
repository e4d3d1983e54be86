//! Values flowing between graph nodes and the schemas describing them.
//!
//! A node's output is an ordered list of zero or more values. Its shape is
//! fixed when the node is built: a [`Schema`] lists the [`Kind`] of every
//! value, and composition checks schemas before anything runs.

use crate::error::{Error, Result};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Anything that can travel through a graph.
///
/// Values are cloned when a fan-out hands the same input to several
/// branches, hence the `Clone + Sync` requirement.
pub trait Payload: Any + Clone + Send + Sync {}

impl<T: Any + Clone + Send + Sync> Payload for T {}

/// Runtime type tag of one value.
#[derive(Clone, Copy)]
pub struct Kind {
    id: TypeId,
    name: &'static str,
}

impl Kind {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_unit(&self) -> bool {
        self.id == TypeId::of::<()>()
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Kind {}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Ordered list of value kinds a node consumes or produces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema(Vec<Kind>);

impl Schema {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn new(kinds: Vec<Kind>) -> Self {
        Self(kinds)
    }

    /// Schema of a callable's return: `()` contributes nothing.
    pub fn of_return<R: Any>() -> Self {
        let kind = Kind::of::<R>();
        if kind.is_unit() {
            Self::empty()
        } else {
            Self(vec![kind])
        }
    }

    /// Append `other` after `self`.
    pub fn concat(&self, other: &Schema) -> Schema {
        let mut kinds = self.0.clone();
        kinds.extend_from_slice(&other.0);
        Schema(kinds)
    }

    pub fn kinds(&self) -> &[Kind] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn expect(&self, found: &Schema) -> Result<()> {
        if self == found {
            Ok(())
        } else {
            Err(Error::schema_mismatch(self, found))
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", kind)?;
        }
        f.write_str(")")
    }
}

/// One type-erased value.
#[derive(Clone)]
pub struct Value {
    kind: Kind,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Value {
    pub fn new<T: Payload>(value: T) -> Self {
        Self {
            kind: Kind::of::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn downcast_ref<T: Payload>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the value out, cloning only if another branch still shares it.
    pub fn downcast<T: Payload>(self) -> Result<T> {
        let kind = self.kind;
        match self.inner.downcast::<T>() {
            Ok(arc) => Ok(Arc::try_unwrap(arc).unwrap_or_else(|shared| (*shared).clone())),
            Err(_) => Err(Error::schema_mismatch(
                &Schema(vec![Kind::of::<T>()]),
                &Schema(vec![kind]),
            )),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").field("kind", &self.kind).finish()
    }
}

/// The ordered values one node hands to its continuation.
#[derive(Clone, Debug, Default)]
pub struct Values(Vec<Value>);

impl Values {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    /// Wrap a callable's return, dropping `()`.
    pub fn from_return<R: Payload>(ret: R) -> Self {
        if Kind::of::<R>().is_unit() {
            Self::new()
        } else {
            Self(vec![Value::new(ret)])
        }
    }

    pub fn push(&mut self, value: Value) {
        self.0.push(value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn schema(&self) -> Schema {
        Schema(self.0.iter().map(Value::kind).collect())
    }

    pub fn get<T: Payload>(&self, index: usize) -> Option<&T> {
        self.0.get(index).and_then(Value::downcast_ref)
    }

    /// Convert into a typed tuple such as `(i32, String)`.
    pub fn into_tuple<T: FromValues>(self) -> Result<T> {
        T::from_values(self)
    }

    /// Convert a single-value list into its value.
    pub fn into_single<T: Payload>(self) -> Result<T> {
        let (value,) = self.into_tuple::<(T,)>()?;
        Ok(value)
    }
}

impl IntoIterator for Values {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Value> for Values {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Typed tuple built from a [`Values`] list.
pub trait FromValues: Sized {
    fn schema() -> Schema;

    fn from_values(values: Values) -> Result<Self>;
}

/// Typed tuple turned into a [`Values`] list, used for graph arguments.
pub trait IntoValues {
    fn schema() -> Schema;

    fn into_values(self) -> Values;
}

fn next_value<T: Payload>(iter: &mut std::vec::IntoIter<Value>) -> Result<T> {
    match iter.next() {
        Some(value) => value.downcast(),
        None => Err(Error::schema_mismatch(
            &Schema(vec![Kind::of::<T>()]),
            &Schema::empty(),
        )),
    }
}

macro_rules! impl_value_tuple {
    ($($T:ident),*) => {
        impl<$($T: Payload,)*> FromValues for ($($T,)*) {
            fn schema() -> Schema {
                Schema(vec![$(Kind::of::<$T>(),)*])
            }

            #[allow(unused_mut, unused_variables)]
            fn from_values(values: Values) -> Result<Self> {
                <Self as FromValues>::schema().expect(&values.schema())?;
                let mut iter = values.0.into_iter();
                Ok(($(next_value::<$T>(&mut iter)?,)*))
            }
        }

        impl<$($T: Payload,)*> IntoValues for ($($T,)*) {
            fn schema() -> Schema {
                Schema(vec![$(Kind::of::<$T>(),)*])
            }

            #[allow(non_snake_case)]
            fn into_values(self) -> Values {
                let ($($T,)*) = self;
                Values(vec![$(Value::new($T),)*])
            }
        }
    };
}

impl_value_tuple!();
impl_value_tuple!(A1);
impl_value_tuple!(A1, A2);
impl_value_tuple!(A1, A2, A3);
impl_value_tuple!(A1, A2, A3, A4);
impl_value_tuple!(A1, A2, A3, A4, A5);
impl_value_tuple!(A1, A2, A3, A4, A5, A6);
impl_value_tuple!(A1, A2, A3, A4, A5, A6, A7);
impl_value_tuple!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_value_tuple!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_value_tuple!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_value_tuple!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_value_tuple!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);
