#![forbid(unsafe_code)]

//! Sum types describing the outcome and progress of an operation.
//!
//! - [`OperationResult`]: `Success(data)` or `Error(error)`.
//! - [`OperationState`]: `Idle`, `InProgress`, `Success(data)` or
//!   `Error(error)`.
//!
//! Both are passive values. `OperationState` does not police transitions;
//! callers produce a sensible sequence such as `Idle -> InProgress ->
//! Success`.
//!
//! The `Error` variants carry business-level outcomes supplied by the
//! caller, not failures of this crate.
//!
//! With the `envelope` feature (on by default), both types can be encoded
//! into a versioned JSON envelope for persistence or IPC; see [`envelope`].

#[cfg(feature = "envelope")]
pub mod envelope;
#[cfg(feature = "envelope")]
pub mod error;
pub mod result;
pub mod state;

#[cfg(feature = "envelope")]
pub use envelope::{ENVELOPE_FORMAT, decode, decode_base64, encode, encode_base64};
#[cfg(feature = "envelope")]
pub use error::{EnvelopeError, Result};
pub use result::{IntoOperation, OperationResult};
pub use state::OperationState;
