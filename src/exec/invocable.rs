//! Arity-polymorphic handler dispatch.
//!
//! Grounded on `jar::concurrency::invocable`/`invocable_impl`
//! (`lib_shared/inc/jar/concurrency/type_traits.hpp`), which uses template
//! introspection on a callable's `operator()` to let `make_callback_receiver`
//! accept a completion handler taking either zero or one argument. Rust has
//! no equivalent of inspecting a closure's arity through its type, so this
//! port uses the marker-tuple blanket-impl trick instead (the same technique
//! axum uses for handler extraction): two non-overlapping impls distinguished
//! by a phantom `Marker` type parameter, one for `FnOnce()` and one for
//! `FnOnce(V)`, so callers can pass either shape and the right one resolves
//! at the call site.
use crate::error::Error;

/// Converts a zero- or one-argument completion closure into a uniform
/// `FnOnce(V)`. `Marker` carries no data; it exists only so the two impls
/// below don't collide under coherence.
pub trait IntoCompleteHandler<V, Marker> {
    fn into_complete_handler(self) -> Box<dyn FnOnce(V) + Send>;
}

impl<V, F> IntoCompleteHandler<V, ((),)> for F
where
    V: Send + 'static,
    F: FnOnce() + Send + 'static,
{
    fn into_complete_handler(self) -> Box<dyn FnOnce(V) + Send> {
        Box::new(move |_value: V| (self)())
    }
}

impl<V, F> IntoCompleteHandler<V, (V,)> for F
where
    V: Send + 'static,
    F: FnOnce(V) + Send + 'static,
{
    fn into_complete_handler(self) -> Box<dyn FnOnce(V) + Send> {
        Box::new(self)
    }
}

/// An error handler: must accept the crate's [`Error`] type.
pub trait IntoErrorHandler {
    fn into_error_handler(self) -> Box<dyn FnOnce(Error) + Send>;
}

impl<F> IntoErrorHandler for F
where
    F: FnOnce(Error) + Send + 'static,
{
    fn into_error_handler(self) -> Box<dyn FnOnce(Error) + Send> {
        Box::new(self)
    }
}

/// A cancellation handler: takes no arguments.
pub trait IntoCancelHandler {
    fn into_cancel_handler(self) -> Box<dyn FnOnce() + Send>;
}

impl<F> IntoCancelHandler for F
where
    F: FnOnce() + Send + 'static,
{
    fn into_cancel_handler(self) -> Box<dyn FnOnce() + Send> {
        Box::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_arg_complete_handler_ignores_value() {
        let mut seen = false;
        let handler: Box<dyn FnOnce(i32) + Send> = (|| {
            seen = true;
        })
        .into_complete_handler();
        handler(42);
        assert!(seen);
    }

    #[test]
    fn one_arg_complete_handler_receives_value() {
        let handler: Box<dyn FnOnce(i32) + Send> = (|v: i32| {
            assert_eq!(v, 7);
        })
        .into_complete_handler();
        handler(7);
    }
}
