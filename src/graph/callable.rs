//! Adapter turning plain closures into graph leaf bodies.

use super::value::{FromValues, Payload, Schema, Values};
use crate::error::Result;

/// A reusable callable whose parameters and return are known [`Payload`]s.
///
/// Implemented for every `Fn` of up to twelve parameters. The `Marker`
/// parameter only disambiguates arities and is inferred.
pub trait Callable<Marker>: Send + Sync + 'static {
    fn input_schema(&self) -> Schema;

    fn output_schema(&self) -> Schema;

    /// Invoke with a value list matching `input_schema`.
    fn call(&self, args: Values) -> Result<Values>;
}

macro_rules! impl_callable {
    ($($T:ident),*) => {
        impl<Func, Ret, $($T,)*> Callable<fn($($T),*) -> Ret> for Func
        where
            Func: Fn($($T),*) -> Ret + Send + Sync + 'static,
            Ret: Payload,
            $($T: Payload,)*
        {
            fn input_schema(&self) -> Schema {
                <($($T,)*) as FromValues>::schema()
            }

            fn output_schema(&self) -> Schema {
                Schema::of_return::<Ret>()
            }

            #[allow(non_snake_case)]
            fn call(&self, args: Values) -> Result<Values> {
                let ($($T,)*) = <($($T,)*) as FromValues>::from_values(args)?;
                Ok(Values::from_return((self)($($T),*)))
            }
        }
    };
}

impl_callable!();
impl_callable!(A1);
impl_callable!(A1, A2);
impl_callable!(A1, A2, A3);
impl_callable!(A1, A2, A3, A4);
impl_callable!(A1, A2, A3, A4, A5);
impl_callable!(A1, A2, A3, A4, A5, A6);
impl_callable!(A1, A2, A3, A4, A5, A6, A7);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::value::IntoValues;

    fn schemas<M, F: Callable<M>>(f: &F) -> (usize, usize) {
        (f.input_schema().len(), f.output_schema().len())
    }

    #[test]
    fn test_schema_from_signature() {
        assert_eq!(schemas(&|| {}), (0, 0));
        assert_eq!(schemas(&|| 1), (0, 1));
        assert_eq!(schemas(&|a: i32, b: i32| a + b), (2, 1));
        assert_eq!(schemas(&|_: String| {}), (1, 0));
    }

    #[test]
    fn test_call_with_values() {
        let f = |a: i32, b: i32, c: i32| a * b + c;
        let out = f.call((2, 3, 4).into_values()).unwrap();
        assert_eq!(out.into_single::<i32>().unwrap(), 10);
    }

    #[test]
    fn test_call_rejects_wrong_arity() {
        let f = |a: i32| a;
        assert!(f.call((1, 2).into_values()).is_err());
    }
}
