#![forbid(unsafe_code)]

//! Cells that never hand out absence.
//!
//! A [`MutableCell`] can only be written with a present value. Reading it
//! before its first write is a caller bug and panics, so every successful
//! read yields a `T` rather than an `Option<T>`.

use crate::observable::{Observable, Subscription};

/// A cell whose reads never yield absence.
///
/// Cloning a `MutableCell` creates a new handle to the **same** cell.
pub struct MutableCell<T> {
    cell: Observable<T>,
}

impl<T> Clone for MutableCell<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> AsRef<Observable<T>> for MutableCell<T> {
    fn as_ref(&self) -> &Observable<T> {
        &self.cell
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for MutableCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.cell.with(|value| {
            f.debug_struct("MutableCell")
                .field("value", &value)
                .field("version", &self.cell.version())
                .finish()
        })
    }
}

/// Create a non-null cell, optionally written with `initial`.
///
/// Without an initial value the first read before any write panics.
pub fn mutable_cell<T>(initial: Option<T>) -> MutableCell<T> {
    MutableCell {
        cell: match initial {
            Some(value) => Observable::new(value),
            None => Observable::empty(),
        },
    }
}

impl<T> MutableCell<T> {
    /// Create a cell holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        mutable_cell(Some(value))
    }

    /// Create a cell that must be written before it is read.
    #[must_use]
    pub fn unset() -> Self {
        mutable_cell(None)
    }

    /// Whether the cell has been written.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.cell.has_value()
    }

    /// Number of writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.cell.version()
    }

    /// Borrow the underlying observable, e.g. to feed a combinator.
    ///
    /// Clearing the cell through this view breaks the non-null contract:
    /// later reads panic as if the cell had never been written.
    #[must_use]
    pub fn as_observable(&self) -> &Observable<T> {
        &self.cell
    }

    /// Access the current value by reference.
    ///
    /// # Panics
    ///
    /// Panics if the cell has never been written.
    #[track_caller]
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell.with(|value| match value {
            Some(value) => f(value),
            None => read_before_write(),
        })
    }
}

impl<T: Clone + 'static> MutableCell<T> {
    /// Get a clone of the current value.
    ///
    /// # Panics
    ///
    /// Panics if the cell has never been written.
    #[must_use]
    #[track_caller]
    pub fn get(&self) -> T {
        match self.cell.get() {
            Some(value) => value,
            None => read_before_write(),
        }
    }

    /// Get the current value, or `None` if the cell has never been written.
    #[must_use]
    pub fn try_get(&self) -> Option<T> {
        self.cell.get()
    }

    /// Store `value` and notify every subscriber.
    pub fn set(&self, value: T) {
        self.cell.set(value);
    }

    /// Register a callback that receives every subsequent value.
    ///
    /// If the cell has already been written, the current value is delivered
    /// immediately.
    pub fn subscribe_non_null(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.cell.observe(move |value| {
            if let Some(value) = value {
                callback(value);
            }
        })
    }
}

impl<T: Clone + PartialEq + 'static> MutableCell<T> {
    /// Store `value` only if it differs from the current value.
    pub fn set_if_changed(&self, value: T) -> bool {
        self.cell.set_if_changed(value)
    }
}

#[track_caller]
fn read_before_write() -> ! {
    panic!("MutableCell read before first write: value is null")
}
