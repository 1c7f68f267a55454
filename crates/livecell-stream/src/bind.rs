#![forbid(unsafe_code)]

//! Adapters that write stream emissions into cells.

use livecell_core::Observable;
use livecell_core::logging::error;

use crate::EventStream;
use crate::disposable::Disposable;
use crate::error::StreamError;

/// Write every value `stream` emits into `cell`.
///
/// The stream must never signal an error: cells have no error channel. An
/// error reaching this adapter is logged and trips a debug assertion; release
/// builds drop it. The returned [`Disposable`] stops further writes.
///
/// Works for any cell flavour, including [`livecell_core::MutableCell`].
pub fn bind<T, S>(stream: &S, cell: &impl AsRef<Observable<T>>) -> Disposable
where
    T: Clone + 'static,
    S: EventStream<T> + ?Sized,
{
    let cell = cell.as_ref().clone();
    stream.subscribe_with(move |value| cell.set(value), error_contract_violated)
}

fn error_contract_violated(err: StreamError) {
    error!(error = %err, "stream bound to a cell signalled an error");
    debug_assert!(false, "stream bound to a cell must not signal errors: {err}");
}

/// Method form of [`bind`] for any [`EventStream`].
pub trait BindExt<T>: EventStream<T> {
    /// Write every emitted value into `cell`. See [`bind`].
    fn bind_to(&self, cell: &impl AsRef<Observable<T>>) -> Disposable
    where
        T: Clone + 'static,
    {
        bind(self, cell)
    }
}

impl<T, S: EventStream<T> + ?Sized> BindExt<T> for S {}
