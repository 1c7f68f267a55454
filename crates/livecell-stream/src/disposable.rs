#![forbid(unsafe_code)]

//! Cancellation handles for stream subscriptions.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use livecell_core::logging::debug;

/// Handle that stops a stream subscription.
///
/// Unlike [`livecell_core::Subscription`], dropping a `Disposable` does not
/// cancel anything: the subscription runs until [`dispose`](Self::dispose) is
/// called or the stream terminates. Clones share the same state.
#[must_use = "a Disposable is the only way to stop the subscription"]
#[derive(Clone)]
pub struct Disposable {
    disposed: Rc<Cell<bool>>,
    teardown: Rc<RefCell<Option<Box<dyn FnOnce()>>>>,
}

impl std::fmt::Debug for Disposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

impl Disposable {
    /// Create a handle that runs `teardown` on the first `dispose()`.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            disposed: Rc::new(Cell::new(false)),
            teardown: Rc::new(RefCell::new(Some(Box::new(teardown)))),
        }
    }

    /// Create a handle that is already disposed.
    pub fn disposed() -> Self {
        Self {
            disposed: Rc::new(Cell::new(true)),
            teardown: Rc::new(RefCell::new(None)),
        }
    }

    /// Stop the subscription. Calling this more than once is a no-op.
    ///
    /// Emissions already being delivered when this is called are not
    /// revoked; no later emission reaches the subscriber.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let teardown = self.teardown.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
        debug!("stream subscription disposed");
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Shared flag the stream checks before each delivery.
    pub(crate) fn flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.disposed)
    }
}
