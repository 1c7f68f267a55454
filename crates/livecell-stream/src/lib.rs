#![forbid(unsafe_code)]

//! Push-based streams and adapters that write their values into cells.
//!
//! - [`Subject`]: a hot, multi-value stream driven by `next`/`error`/`complete`.
//! - [`SingleSubject`]: resolves at most once, with a value or an error.
//! - [`ChannelStream`]: accepts signals from any thread through a
//!   [`StreamSender`] and delivers them on the owning thread in
//!   [`pump`](ChannelStream::pump).
//! - [`bind`]: writes every emitted value into an observable cell and returns
//!   a [`Disposable`] that stops further writes.
//!
//! # Contract
//!
//! A stream bound to a cell must never signal an error. Cells have no error
//! channel, so an error reaching [`bind`] is a caller bug: it is logged and
//! trips a debug assertion.

pub mod bind;
pub mod channel;
pub mod disposable;
pub mod error;
pub mod single;
pub mod subject;

pub use bind::{BindExt, bind};
pub use channel::{ChannelStream, StreamSender, channel};
pub use disposable::Disposable;
pub use error::{Result, StreamError};
pub use single::SingleSubject;
pub use subject::Subject;

/// A push-based source of values that may terminate with an error.
pub trait EventStream<T> {
    /// Register `on_next` for values and `on_error` for a terminal error.
    ///
    /// The returned [`Disposable`] stops delivery to these callbacks.
    fn subscribe_with(
        &self,
        on_next: impl Fn(T) + 'static,
        on_error: impl Fn(StreamError) + 'static,
    ) -> Disposable;
}
