#![forbid(unsafe_code)]

//! Hot multi-value streams.
//!
//! # Invariants
//!
//! 1. Listeners receive values in the order `next` is called, and within one
//!    emission in subscription order.
//! 2. After `error` or `complete` the subject is terminated: later `next`
//!    calls are dropped and every listener is released.
//! 3. A listener subscribing after an error receives that error immediately.
//! 4. A disposed listener receives nothing further, even mid-emission.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use livecell_core::logging::{trace, warn};

use crate::EventStream;
use crate::disposable::Disposable;
use crate::error::StreamError;

struct Listener<T> {
    id: u64,
    disposed: Rc<Cell<bool>>,
    on_next: Box<dyn Fn(T)>,
    on_error: Box<dyn Fn(StreamError)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Terminal {
    Completed,
    Failed(StreamError),
}

struct SubjectInner<T> {
    listeners: Vec<Rc<Listener<T>>>,
    next_id: u64,
    terminal: Option<Terminal>,
}

/// A hot stream that forwards pushed values to current listeners.
///
/// Cloning a `Subject` creates a new handle to the **same** stream.
pub struct Subject<T> {
    inner: Rc<RefCell<SubjectInner<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Subject")
            .field("listeners", &inner.listeners.len())
            .field("terminal", &inner.terminal)
            .finish()
    }
}

impl<T> Subject<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SubjectInner {
                listeners: Vec::new(),
                next_id: 0,
                terminal: None,
            })),
        }
    }

    /// Number of listeners that will receive the next value.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| !l.disposed.get())
            .count()
    }

    /// Whether `error` or `complete` has been called.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.inner.borrow().terminal.is_some()
    }

    /// Terminate without error and release all listeners.
    pub fn complete(&self) {
        let _released = {
            let mut inner = self.inner.borrow_mut();
            if inner.terminal.is_some() {
                return;
            }
            inner.terminal = Some(Terminal::Completed);
            std::mem::take(&mut inner.listeners)
        };
        trace!("subject completed");
    }

    /// Terminate with `err`, delivering it to every listener.
    pub fn error(&self, err: StreamError) {
        let listeners = {
            let mut inner = self.inner.borrow_mut();
            if inner.terminal.is_some() {
                warn!(error = %err, "error on terminated subject dropped");
                return;
            }
            inner.terminal = Some(Terminal::Failed(err.clone()));
            std::mem::take(&mut inner.listeners)
        };
        for listener in listeners {
            if !listener.disposed.get() {
                (listener.on_error)(err.clone());
            }
        }
    }

    fn remove(inner: &Weak<RefCell<SubjectInner<T>>>, id: u64) {
        if let Some(inner) = inner.upgrade() {
            inner.borrow_mut().listeners.retain(|l| l.id != id);
        }
    }
}

impl<T: Clone + 'static> Subject<T> {
    /// Deliver `value` to every listener. Dropped if the subject terminated.
    pub fn next(&self, value: T) {
        let listeners: Vec<Rc<Listener<T>>> = {
            let inner = self.inner.borrow();
            if inner.terminal.is_some() {
                trace!("value on terminated subject dropped");
                return;
            }
            inner.listeners.clone()
        };
        for listener in listeners {
            if !listener.disposed.get() {
                (listener.on_next)(value.clone());
            }
        }
    }
}

impl<T: 'static> EventStream<T> for Subject<T> {
    fn subscribe_with(
        &self,
        on_next: impl Fn(T) + 'static,
        on_error: impl Fn(StreamError) + 'static,
    ) -> Disposable {
        let terminal = self.inner.borrow().terminal.clone();
        match terminal {
            Some(Terminal::Failed(err)) => {
                on_error(err);
                return Disposable::disposed();
            }
            Some(Terminal::Completed) => return Disposable::disposed(),
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
            on_next: Box::new(on_next),
            on_error: Box::new(on_error),
        }));
        trace!(listener = id, "subject listener added");
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log<T> = Rc<RefCell<Vec<T>>>;

    fn collect(subject: &Subject<i32>) -> (Log<i32>, Log<StreamError>, Disposable) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let errors = Rc::new(RefCell::new(Vec::new()));
        let v = Rc::clone(&values);
        let e = Rc::clone(&errors);
        let handle = subject.subscribe_with(
            move |x| v.borrow_mut().push(x),
            move |err| e.borrow_mut().push(err),
        );
        (values, errors, handle)
    }

    #[test]
    fn values_reach_listeners_in_order() {
        let subject = Subject::new();
        let (values, errors, _h) = collect(&subject);
        subject.next(1);
        subject.next(2);
        assert_eq!(*values.borrow(), vec![1, 2]);
        assert!(errors.borrow().is_empty());
    }

    #[test]
    fn dispose_stops_delivery_and_removes_listener() {
        let subject = Subject::new();
        let (values, _errors, handle) = collect(&subject);
        subject.next(1);
        handle.dispose();
        subject.next(2);
        assert_eq!(*values.borrow(), vec![1]);
        assert_eq!(subject.listener_count(), 0);
    }

    #[test]
    fn dispose_during_emission_skips_later_listener() {
        let subject: Subject<i32> = Subject::new();
        let second: Rc<RefCell<Option<Disposable>>> = Rc::new(RefCell::new(None));
        let s = Rc::clone(&second);
        let _first = subject.subscribe_with(
            move |_| {
                if let Some(h) = s.borrow().as_ref() {
                    h.dispose();
                }
            },
            |_| {},
        );
        let (values, _errors, handle) = collect(&subject);
        *second.borrow_mut() = Some(handle);

        subject.next(1);
        assert!(values.borrow().is_empty());
    }

    #[test]
    fn error_terminates_and_reaches_late_subscribers() {
        let subject = Subject::new();
        let (values, errors, _h) = collect(&subject);
        subject.error(StreamError::failed("boom"));
        subject.next(1);

        assert!(subject.is_terminated());
        assert!(values.borrow().is_empty());
        assert_eq!(*errors.borrow(), vec![StreamError::failed("boom")]);

        let (_late_values, late_errors, late) = collect(&subject);
        assert!(late.is_disposed());
        assert_eq!(late_errors.borrow().len(), 1);
    }

    #[test]
    fn complete_releases_listeners() {
        let subject = Subject::new();
        let (values, errors, _h) = collect(&subject);
        subject.complete();
        subject.next(5);
        subject.error(StreamError::failed("late"));

        assert_eq!(subject.listener_count(), 0);
        assert!(values.borrow().is_empty());
        assert!(errors.borrow().is_empty());
    }
}
