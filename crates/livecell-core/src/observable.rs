#![forbid(unsafe_code)]

//! Shared, version-tracked cells with change notification.
//!
//! # Design
//!
//! [`Observable<T>`] wraps an `Option<T>` in shared, reference-counted
//! storage. A cell that has never been written reports version `0`; every
//! write, including a write of absence, bumps the version and notifies all
//! live subscribers in registration order.
//!
//! # Failure Modes
//!
//! - **Subscriber writes the notifying cell**: the nested write delivers the
//!   newer value to every subscriber, and the outer cycle stops early so no
//!   subscriber sees the stale value after the fresh one.
//! - **Subscriber panics**: the panic propagates to the writer. The value has
//!   already been stored.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::combinators;

// ─── Metrics counters ────────────────────────────────────────────────────────

/// Total number of subscriber callbacks invoked by any cell.
static NOTIFICATIONS_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Read the total notification count (for diagnostics/telemetry).
#[must_use]
pub fn notifications_total() -> u64 {
    NOTIFICATIONS_TOTAL.load(Ordering::Relaxed)
}

// ─── Subscription ────────────────────────────────────────────────────────────

/// A boxed subscriber callback. Cells only hold `Weak` references to these.
struct Observer<T> {
    callback: Box<dyn Fn(Option<&T>)>,
}

/// RAII guard for a subscriber callback.
///
/// The cell keeps only a weak reference to the callback, so dropping the
/// guard unsubscribes. The guard is type-erased so guards from cells of
/// different value types can live in the same collection.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _observer: Rc<dyn Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ─── Observable ──────────────────────────────────────────────────────────────

struct ObservableInner<T> {
    /// Current value (None when absent or never written).
    value: Option<T>,
    /// Number of writes so far. Zero means never written.
    version: u64,
    /// Subscriber callbacks in registration order.
    subscribers: Vec<Weak<Observer<T>>>,
    /// Guards for upstream subscriptions when this cell is driven by others.
    sources: Vec<Subscription>,
}

/// A shared cell holding zero-or-one value of `T`.
///
/// Cloning an `Observable` creates a new handle to the **same** cell.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

/// A non-owning handle to an [`Observable`].
pub struct WeakObservable<T> {
    inner: Weak<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Clone for WeakObservable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> AsRef<Observable<T>> for Observable<T> {
    fn as_ref(&self) -> &Observable<T> {
        self
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self::from_parts(None, 0)
    }
}

/// Create a cell that may hold no value.
///
/// With `Some(initial)` the cell starts written (version 1). With `None` it
/// starts absent and unwritten (version 0).
pub fn nullable_cell<T>(initial: Option<T>) -> Observable<T> {
    match initial {
        Some(value) => Observable::new(value),
        None => Observable::empty(),
    }
}

impl<T> Observable<T> {
    fn from_parts(value: Option<T>, version: u64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version,
                subscribers: Vec::new(),
                sources: Vec::new(),
            })),
        }
    }

    /// Create a cell holding `value`. Construction counts as the first write.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::from_parts(Some(value), 1)
    }

    /// Create an absent, never-written cell.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Access the current value by reference without cloning.
    ///
    /// # Panics
    ///
    /// Panics if the closure writes this same cell (re-entrant borrow).
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        let inner = self.inner.borrow();
        f(inner.value.as_ref())
    }

    /// Whether the cell currently holds a value.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.inner.borrow().value.is_some()
    }

    /// Number of writes so far. Zero until the first write.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscribers. Dropped subscriptions are not counted.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Create a non-owning handle to this cell.
    #[must_use]
    pub fn downgrade(&self) -> WeakObservable<T> {
        WeakObservable {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether two handles refer to the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of stored observer slots, live or not.
    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Keep an upstream subscription alive for as long as this cell lives.
    pub(crate) fn attach_source(&self, subscription: Subscription) {
        self.inner.borrow_mut().sources.push(subscription);
    }

    /// Number of upstream subscriptions attached to this cell.
    pub(crate) fn source_count(&self) -> usize {
        self.inner.borrow().sources.len()
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.inner.borrow().value.clone()
    }

    /// Store `value` and notify every subscriber.
    pub fn set(&self, value: T) {
        self.set_value(Some(value));
    }

    /// Store absence and notify every subscriber.
    pub fn clear(&self) {
        self.set_value(None);
    }

    /// Store `value` (present or absent) and notify every subscriber.
    ///
    /// Every write notifies, including a write equal to the current value.
    /// Use [`set_if_changed`](Self::set_if_changed) to skip equal writes.
    pub fn set_value(&self, value: Option<T>) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Register a callback invoked on every subsequent write.
    ///
    /// The current value is not delivered; see [`observe`](Self::observe).
    pub fn subscribe(&self, callback: impl Fn(Option<&T>) + 'static) -> Subscription {
        Subscription {
            _observer: self.register(Box::new(callback)),
        }
    }

    /// Register a callback and, if the cell has been written, deliver the
    /// current value to it immediately.
    pub fn observe(&self, callback: impl Fn(Option<&T>) + 'static) -> Subscription {
        let observer = self.register(Box::new(callback));
        let (written, snapshot) = {
            let inner = self.inner.borrow();
            (inner.version > 0, inner.value.clone())
        };
        if written {
            NOTIFICATIONS_TOTAL.fetch_add(1, Ordering::Relaxed);
            (observer.callback)(snapshot.as_ref());
        }
        Subscription {
            _observer: observer,
        }
    }

    fn register(&self, callback: Box<dyn Fn(Option<&T>)>) -> Rc<Observer<T>> {
        let observer = Rc::new(Observer { callback });
        let mut inner = self.inner.borrow_mut();
        // Slots of dropped subscriptions are otherwise only reclaimed on write.
        inner.subscribers.retain(|w| w.strong_count() > 0);
        inner.subscribers.push(Rc::downgrade(&observer));
        observer
    }

    /// Derive a cell that tracks successful mappings of this cell's value.
    ///
    /// See [`combinators::map_not_null`].
    #[must_use]
    pub fn map_not_null<O: Clone + 'static>(
        &self,
        mapper: impl Fn(&T) -> Option<O> + 'static,
    ) -> Observable<O> {
        combinators::map_not_null(self, mapper)
    }

    /// Derive a cell holding `mapper` of this cell's value on every write.
    ///
    /// See [`combinators::map_nullable`].
    #[must_use]
    pub fn map_nullable<O: Clone + 'static>(
        &self,
        mapper: impl Fn(Option<&T>) -> O + 'static,
    ) -> Observable<O> {
        combinators::map_nullable(self, mapper)
    }

    fn notify(&self) {
        let (version, snapshot, observers) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let observers: Vec<Rc<Observer<T>>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.version, inner.value.clone(), observers)
        };

        for observer in &observers {
            NOTIFICATIONS_TOTAL.fetch_add(1, Ordering::Relaxed);
            (observer.callback)(snapshot.as_ref());
            // A subscriber wrote this cell; the nested cycle already
            // delivered the newer value to everyone.
            if self.inner.borrow().version != version {
                break;
            }
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Store `value` only if it differs from the current value.
    ///
    /// Returns whether a write (and therefore a notification) happened.
    pub fn set_if_changed(&self, value: T) -> bool {
        if self.inner.borrow().value.as_ref() == Some(&value) {
            return false;
        }
        self.set(value);
        true
    }
}

impl<T> WeakObservable<T> {
    /// Upgrade to a strong handle if the cell is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Observable<T>> {
        self.inner.upgrade().map(|inner| Observable { inner })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
