#![forbid(unsafe_code)]

//! Streams that resolve at most once.
//!
//! A [`SingleSubject`] starts pending and is resolved by exactly one call to
//! [`succeed`](SingleSubject::succeed) or [`fail`](SingleSubject::fail).
//! Listeners are released on resolution. A listener that subscribes after
//! resolution receives the outcome immediately.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use livecell_core::logging::trace;

use crate::EventStream;
use crate::disposable::Disposable;
use crate::error::{Result, StreamError};

struct Listener<T> {
    id: u64,
    disposed: Rc<Cell<bool>>,
    on_success: Box<dyn Fn(T)>,
    on_error: Box<dyn Fn(StreamError)>,
}

enum Resolution<T> {
    Pending,
    Succeeded(T),
    Failed(StreamError),
}

struct SingleInner<T> {
    resolution: Resolution<T>,
    listeners: Vec<Rc<Listener<T>>>,
    next_id: u64,
}

/// A stream that emits one value or one error.
///
/// Cloning a `SingleSubject` creates a new handle to the **same** single.
pub struct SingleSubject<T> {
    inner: Rc<RefCell<SingleInner<T>>>,
}

impl<T> Clone for SingleSubject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for SingleSubject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SingleSubject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        let mut dbg = f.debug_struct("SingleSubject");
        match &inner.resolution {
            Resolution::Pending => dbg.field("resolution", &"pending"),
            Resolution::Succeeded(value) => dbg.field("success", value),
            Resolution::Failed(err) => dbg.field("error", err),
        };
        dbg.field("listeners", &inner.listeners.len()).finish()
    }
}

impl<T> SingleSubject<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SingleInner {
                resolution: Resolution::Pending,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Whether the single has succeeded or failed.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self.inner.borrow().resolution, Resolution::Pending)
    }

    /// Resolve with `err`, delivering it to every pending listener.
    ///
    /// Fails with [`StreamError::Terminated`] if already resolved.
    pub fn fail(&self, err: StreamError) -> Result<()> {
        let listeners = {
            let mut inner = self.inner.borrow_mut();
            if !matches!(inner.resolution, Resolution::Pending) {
                return Err(StreamError::Terminated);
            }
            inner.resolution = Resolution::Failed(err.clone());
            std::mem::take(&mut inner.listeners)
        };
        for listener in listeners {
            if !listener.disposed.get() {
                (listener.on_error)(err.clone());
            }
        }
        Ok(())
    }

    fn remove(inner: &Weak<RefCell<SingleInner<T>>>, id: u64) {
        if let Some(inner) = inner.upgrade() {
            inner.borrow_mut().listeners.retain(|l| l.id != id);
        }
    }
}

impl<T: Clone + 'static> SingleSubject<T> {
    /// Resolve with `value`, delivering it to every pending listener.
    ///
    /// Fails with [`StreamError::Terminated`] if already resolved.
    pub fn succeed(&self, value: T) -> Result<()> {
        let listeners = {
            let mut inner = self.inner.borrow_mut();
            if !matches!(inner.resolution, Resolution::Pending) {
                return Err(StreamError::Terminated);
            }
            inner.resolution = Resolution::Succeeded(value.clone());
            std::mem::take(&mut inner.listeners)
        };
        trace!(listeners = listeners.len(), "single resolved");
        for listener in listeners {
            if !listener.disposed.get() {
                (listener.on_success)(value.clone());
            }
        }
        Ok(())
    }
}

impl<T: Clone + 'static> EventStream<T> for SingleSubject<T> {
    fn subscribe_with(
        &self,
        on_next: impl Fn(T) + 'static,
        on_error: impl Fn(StreamError) + 'static,
    ) -> Disposable {
        let settled = match &self.inner.borrow().resolution {
            Resolution::Pending => None,
            Resolution::Succeeded(value) => Some(Ok(value.clone())),
            Resolution::Failed(err) => Some(Err(err.clone())),
        };
        match settled {
            Some(Ok(value)) => {
                on_next(value);
                return Disposable::disposed();
            }
            Some(Err(err)) => {
                on_error(err);
                return Disposable::disposed();
            }
            None => {}
        }

        let id = {
            let mut inner = self.inner.borrow_mut();
            inner.next_id += 1;
            inner.next_id
        };
        let weak = Rc::downgrade(&self.inner);
        let handle = Disposable::new(move || Self::remove(&weak, id));
        self.inner.borrow_mut().listeners.push(Rc::new(Listener {
            id,
            disposed: handle.flag(),
            on_success: Box::new(on_next),
            on_error: Box::new(on_error),
        }));
        handle
    }
}
