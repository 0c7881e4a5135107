//! Error taxonomy shared across the crate.
//!
//! Distinguishes a failed system call, a caller precondition violation, an
//! operation attempted in the wrong state, and a dropped promise. Each kind
//! maps to one variant; none of them represent cancellation, which is a
//! return value (see [`crate::future::FutureResult`]), never an error.
use thiserror::Error;

/// The crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A system call returned its invalid-value sentinel; carries the `errno`
    /// translated into [`std::io::Error`].
    #[error("system call failed: {0}")]
    System(#[from] std::io::Error),

    /// A caller-supplied precondition was violated (null pointer, zero
    /// length, out-of-range value, oversize address, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A structurally valid operation attempted in a state that forbids it
    /// (e.g. `open()` on an already-open socket).
    #[error("domain error: {0}")]
    Domain(&'static str),

    /// The promise producing a future was dropped before it set a value,
    /// exception, or cancellation.
    #[error("broken promise")]
    BrokenPromise,
}

pub type Result<T> = std::result::Result<T, Error>;
