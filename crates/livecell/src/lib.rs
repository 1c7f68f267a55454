#![forbid(unsafe_code)]

//! livecell public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.

pub use livecell_core as core;
#[cfg(feature = "outcome")]
pub use livecell_outcome as outcome;
#[cfg(feature = "stream")]
pub use livecell_stream as stream;

pub mod prelude {
    pub use livecell_core::{
        Mediator, MutableCell, Observable, Subscription, any_true, combine_latest2,
        combine_latest3, map_not_null, map_nullable, merge, mutable_cell, nullable_cell,
    };
    #[cfg(feature = "outcome")]
    pub use livecell_outcome::{IntoOperation, OperationResult, OperationState};
    #[cfg(feature = "stream")]
    pub use livecell_stream::{
        BindExt, ChannelStream, Disposable, EventStream, SingleSubject, StreamSender, Subject,
        bind, channel,
    };
}
