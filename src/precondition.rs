//! Centralized argument and system-error checks.
//!
//! Grounded on `jar::contract` (`lib_header/inc/jar/core/contract.hpp`): the
//! free-function revision, not the `jar::util::contract<N, I>` class-based
//! one — free functions returning `Result` are the idiomatic Rust shape and
//! need no zero-sized dispatch type.
use tracing::debug;

use crate::error::{Error, Result};

/// Converts a system call's invalid-value sentinel (`-1`) into
/// [`Error::System`], reading the OS error from `errno`-equivalent state.
///
/// `return_value` is the raw `isize`/`i32`-shaped return from a `libc` call;
/// callers cast to `isize` at the boundary.
pub fn no_system_error(return_value: isize) -> Result<usize> {
    if return_value == -1 {
        let err = std::io::Error::last_os_error();
        debug!(error = %err, "system call failed");
        Err(Error::System(err))
    } else {
        Ok(return_value as usize)
    }
}

/// As [`no_system_error`], but a failure whose OS error code is in `ignored`
/// is treated as "no result" rather than an error.
///
/// Grounding: `jar::contract::no_system_error_other_than`.
pub fn no_system_error_except(return_value: isize, ignored: &[i32]) -> Result<Option<usize>> {
    if return_value == -1 {
        let err = std::io::Error::last_os_error();
        if let Some(code) = err.raw_os_error() {
            if ignored.contains(&code) {
                return Ok(None);
            }
        }
        Err(Error::System(err))
    } else {
        Ok(Some(return_value as usize))
    }
}

/// Rejects a `None`/null-equivalent optional value.
pub fn not_null<T>(value: Option<T>, message: &'static str) -> Result<T> {
    value.ok_or(Error::InvalidArgument(message))
}

/// Rejects a zero value.
pub fn not_zero<T>(value: T, message: &'static str) -> Result<T>
where
    T: PartialEq + Default,
{
    if value == T::default() {
        Err(Error::InvalidArgument(message))
    } else {
        Ok(value)
    }
}

/// Rejects a value below `min`.
pub fn not_less<T>(value: T, min: T, message: &'static str) -> Result<T>
where
    T: PartialOrd,
{
    if value < min {
        Err(Error::InvalidArgument(message))
    } else {
        Ok(value)
    }
}

/// Rejects a value above `max`.
pub fn not_greater<T>(value: T, max: T, message: &'static str) -> Result<T>
where
    T: PartialOrd,
{
    if value > max {
        Err(Error::InvalidArgument(message))
    } else {
        Ok(value)
    }
}
