#![forbid(unsafe_code)]

//! Cells driven by other cells.
//!
//! A [`Mediator<T>`] is an [`Observable<T>`] that also owns subscriptions to
//! any number of source cells. Each source gets its own change callback,
//! which typically recomputes and writes the mediator's value.
//!
//! # Invariants
//!
//! 1. Sources are subscribed in the order [`add_source`](Mediator::add_source)
//!    is called; a single source write runs its callbacks in that order.
//! 2. A source that has already been written is replayed into its callback
//!    at registration time, so the mediator starts from the sources' current
//!    state rather than waiting for their next write.
//! 3. The mediator holds its source subscriptions inside the cell itself.
//!    Callbacks reach the mediator through a weak handle, so a mediator that
//!    is no longer referenced is dropped and its callbacks go inert.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::trace;
use crate::observable::{Observable, Subscription};

/// Total number of source callbacks that reached a live mediator.
static MEDIATOR_UPDATES_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Read the total mediator update count (for diagnostics/telemetry).
#[must_use]
pub fn mediator_updates_total() -> u64 {
    MEDIATOR_UPDATES_TOTAL.load(Ordering::Relaxed)
}

/// An observable cell whose value is derived from source cells.
///
/// Cloning a `Mediator` creates a new handle to the **same** cell.
pub struct Mediator<T> {
    cell: Observable<T>,
}

impl<T> Clone for Mediator<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> AsRef<Observable<T>> for Mediator<T> {
    fn as_ref(&self) -> &Observable<T> {
        &self.cell
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Mediator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mediator")
            .field("cell", &self.cell)
            .field("sources", &self.cell.source_count())
            .finish()
    }
}

impl<T> Default for Mediator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mediator<T> {
    /// Create a mediator with no value and no sources.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: Observable::empty(),
        }
    }

    /// Create a mediator that starts out holding `value`.
    #[must_use]
    pub fn with_value(value: T) -> Self {
        Self {
            cell: Observable::new(value),
        }
    }

    /// Number of source subscriptions this mediator owns.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.cell.source_count()
    }

    /// Give up the mediator API and keep the derived cell.
    ///
    /// The source subscriptions stay attached to the cell.
    #[must_use]
    pub fn into_observable(self) -> Observable<T> {
        self.cell
    }
}

impl<T: Clone + 'static> Mediator<T> {
    /// Subscribe to `source`, running `on_change` on each of its writes.
    ///
    /// `on_change` receives this mediator and the source's new value. If the
    /// source has already been written, `on_change` runs once before this
    /// call returns. Adding the same source twice registers two callbacks.
    pub fn add_source<S, F>(&self, source: &impl AsRef<Observable<S>>, on_change: F)
    where
        S: Clone + 'static,
        F: Fn(&Mediator<T>, Option<&S>) + 'static,
    {
        let source = source.as_ref();
        let weak = self.cell.downgrade();
        trace!(
            source_version = source.version(),
            sources = self.cell.source_count() + 1,
            "mediator source added"
        );
        let subscription: Subscription = source.observe(move |value| {
            if let Some(cell) = weak.upgrade() {
                MEDIATOR_UPDATES_TOTAL.fetch_add(1, Ordering::Relaxed);
                on_change(&Mediator { cell }, value);
            }
        });
        self.cell.attach_source(subscription);
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.cell.get()
    }

    /// Store `value` and notify subscribers.
    pub fn set(&self, value: T) {
        self.cell.set(value);
    }

    /// Store `value` (present or absent) and notify subscribers.
    pub fn set_value(&self, value: Option<T>) {
        self.cell.set_value(value);
    }

    /// Register a callback invoked on every subsequent write.
    pub fn subscribe(&self, callback: impl Fn(Option<&T>) + 'static) -> Subscription {
        self.cell.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn source_write_drives_mediator() {
        let source = Observable::<i32>::empty();
        let mediator = Mediator::new();
        mediator.add_source(&source, |m, v| m.set_value(v.map(|v| v * 10)));

        assert_eq!(mediator.get(), None);
        source.set(4);
        assert_eq!(mediator.get(), Some(40));
        assert_eq!(mediator.source_count(), 1);
    }

    #[test]
    fn written_source_replays_on_add() {
        let source = Observable::new("abc".to_string());
        let mediator = Mediator::new();
        mediator.add_source(&source, |m, v| m.set_value(v.map(String::len)));
        assert_eq!(mediator.get(), Some(3));
    }

    #[test]
    fn callbacks_run_in_registration_order() {
        let source = Observable::<u8>::empty();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mediator: Mediator<u8> = Mediator::new();

        let l1 = Rc::clone(&log);
        mediator.add_source(&source, move |_, _| l1.borrow_mut().push(1));
        let l2 = Rc::clone(&log);
        mediator.add_source(&source, move |_, _| l2.borrow_mut().push(2));

        source.set(0);
        assert_eq!(*log.borrow(), vec![1, 2]);
        assert_eq!(mediator.source_count(), 2);
    }

    #[test]
    fn dropped_mediator_stops_updating_and_releases_source_slot() {
        let source = Observable::new(1);
        let hits = Rc::new(Cell::new(0u32));
        {
            let mediator: Mediator<i32> = Mediator::new();
            let h = Rc::clone(&hits);
            mediator.add_source(&source, move |_, _| h.set(h.get() + 1));
            assert_eq!(source.observer_count(), 1);
        }
        // Replay at registration counted once.
        assert_eq!(hits.get(), 1);

        source.set(2);
        assert_eq!(hits.get(), 1);
        assert_eq!(source.observer_count(), 0);
    }

    #[test]
    fn into_observable_keeps_sources_attached() {
        let source = Observable::<i32>::empty();
        let mediator = Mediator::new();
        mediator.add_source(&source, |m, v| m.set_value(v.copied()));
        let derived = mediator.into_observable();

        source.set(8);
        assert_eq!(derived.get(), Some(8));
    }

    #[test]
    fn mediator_can_be_a_source() {
        let root = Observable::<i32>::empty();
        let doubled = Mediator::new();
        doubled.add_source(&root, |m, v| m.set_value(v.map(|v| v * 2)));
        let plus_one = Mediator::new();
        plus_one.add_source(&doubled, |m, v| m.set_value(v.map(|v| v + 1)));

        root.set(5);
        assert_eq!(plus_one.get(), Some(11));
    }

    #[test]
    fn update_counter_advances() {
        let before = mediator_updates_total();
        let source = Observable::new(0);
        let mediator: Mediator<i32> = Mediator::new();
        mediator.add_source(&source, |m, v| m.set_value(v.copied()));
        source.set(1);
        assert!(mediator_updates_total() >= before + 2);
    }
}
