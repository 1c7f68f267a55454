//! Logging shims shared by the livecell crates.
//!
//! With the `tracing` feature enabled these are the `tracing` macros. Without
//! it they expand to nothing, so call sites never need their own `cfg`.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, trace, warn};

#[cfg(not(feature = "tracing"))]
pub use crate::{
    __livecell_noop as trace, __livecell_noop as debug, __livecell_noop as warn,
    __livecell_noop as error,
};

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __livecell_noop {
    ($($arg:tt)*) => {};
}
