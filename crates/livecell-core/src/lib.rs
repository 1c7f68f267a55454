#![forbid(unsafe_code)]

//! Core: observable cells, mediator cells and the combinators built on them.
//!
//! - [`Observable`]: a shared, version-tracked cell holding zero-or-one value,
//!   with change notification via subscriber callbacks.
//! - [`MutableCell`]: the non-null flavour of a cell. Reading it before the
//!   first write is a contract violation.
//! - [`Mediator`]: a cell whose value is driven by subscriptions to other cells.
//! - [`combinators`]: `map_not_null`, `map_nullable`, `merge`,
//!   `combine_latest2`/`combine_latest3` and `any_true`.
//!
//! # Architecture
//!
//! Every handle is `Rc<RefCell<..>>` underneath, so cells are `!Send` and
//! confined to the thread that created them. Subscribers are stored as `Weak`
//! callbacks and cleaned up lazily during notification; the [`Subscription`]
//! guard keeps the callback alive.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per write. Version `0` means the cell
//!    has never been written.
//! 2. Subscribers are notified in registration order.
//! 3. No internal borrow is held while subscribers run, so a subscriber may
//!    read or write any cell, including the one notifying it.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 5. A mediator owns its upstream subscriptions. Dropping the last handle to
//!    it releases them.

pub mod combinators;
pub mod logging;
pub mod mediator;
pub mod non_null;
pub mod observable;

pub use combinators::{any_true, combine_latest2, combine_latest3, map_not_null, map_nullable, merge};
pub use mediator::{Mediator, mediator_updates_total};
pub use non_null::{MutableCell, mutable_cell};
pub use observable::{
    Observable, Subscription, WeakObservable, notifications_total, nullable_cell,
};
