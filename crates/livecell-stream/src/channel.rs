#![forbid(unsafe_code)]

//! Cross-thread entry point into the single-threaded cell world.
//!
//! Producers on any thread push signals through a [`StreamSender`]. Nothing
//! is delivered until the owning thread calls [`ChannelStream::pump`], so
//! every listener, and every cell a listener writes, runs on that thread.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use livecell_core::logging::{debug, trace};

use crate::EventStream;
use crate::disposable::Disposable;
use crate::error::{Result, StreamError};
use crate::subject::Subject;

enum Signal<T> {
    Next(T),
    Error(StreamError),
    Complete,
}

/// Create a connected sender/stream pair.
pub fn channel<T>() -> (StreamSender<T>, ChannelStream<T>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (
        StreamSender { tx },
        ChannelStream {
            rx,
            subject: Subject::new(),
        },
    )
}

/// Producer half of a [`ChannelStream`]. `Send` when `T: Send`.
pub struct StreamSender<T> {
    tx: Sender<Signal<T>>,
}

impl<T> Clone for StreamSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> std::fmt::Debug for StreamSender<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSender")
            .field("queued", &self.tx.len())
            .finish()
    }
}

impl<T> StreamSender<T> {
    /// Queue a value for the next pump.
    pub fn send(&self, value: T) -> Result<()> {
        self.push(Signal::Next(value))
    }

    /// Queue a terminal error.
    pub fn fail(&self, err: StreamError) -> Result<()> {
        self.push(Signal::Error(err))
    }

    /// Queue completion.
    pub fn complete(&self) -> Result<()> {
        self.push(Signal::Complete)
    }

    fn push(&self, signal: Signal<T>) -> Result<()> {
        self.tx.send(signal).map_err(|_| StreamError::Disconnected)
    }
}

/// Consumer half: a stream whose emissions are delivered by [`pump`](Self::pump).
pub struct ChannelStream<T> {
    rx: Receiver<Signal<T>>,
    subject: Subject<T>,
}

impl<T> std::fmt::Debug for ChannelStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelStream")
            .field("queued", &self.rx.len())
            .field("subject", &self.subject)
            .finish()
    }
}

impl<T: Clone + 'static> ChannelStream<T> {
    /// Deliver every queued signal to listeners, in send order.
    ///
    /// Returns the number of signals forwarded. Signals queued behind an
    /// error or completion are discarded and not counted.
    pub fn pump(&self) -> usize {
        self.pump_at_most(usize::MAX)
    }

    /// Forward up to `limit` queued signals. Returns the number forwarded.
    pub fn pump_at_most(&self, limit: usize) -> usize {
        let mut delivered = 0;
        while delivered < limit {
            let signal = match self.rx.try_recv() {
                Ok(signal) => signal,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("all stream senders dropped");
                    break;
                }
            };
            if self.subject.is_terminated() {
                trace!("signal after termination discarded");
                continue;
            }
            match signal {
                Signal::Next(value) => self.subject.next(value),
                Signal::Error(err) => self.subject.error(err),
                Signal::Complete => self.subject.complete(),
            }
            delivered += 1;
        }
        if delivered > 0 {
            trace!(delivered, "channel stream pumped");
        }
        delivered
    }

    /// Number of signals waiting for the next pump.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Whether an error or completion has been delivered.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.subject.is_terminated()
    }
}

impl<T: Clone + 'static> EventStream<T> for ChannelStream<T> {
    fn subscribe_with(
        &self,
        on_next: impl Fn(T) + 'static,
        on_error: impl Fn(StreamError) + 'static,
    ) -> Disposable {
        self.subject.subscribe_with(on_next, on_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn nothing_is_delivered_before_pump() {
        let (tx, stream) = channel();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _h = stream.subscribe_with(move |v| s.borrow_mut().push(v), |_| {});

        tx.send(1).unwrap();
        tx.send(2).unwrap();
        assert!(seen.borrow().is_empty());
        assert_eq!(stream.pending(), 2);

        assert_eq!(stream.pump(), 2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn sender_works_from_another_thread() {
        let (tx, stream) = channel();
        let producer = std::thread::spawn(move || {
            for i in 0..10 {
                tx.send(i).unwrap();
            }
            tx.complete().unwrap();
        });
        producer.join().unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _h = stream.subscribe_with(move |v| s.borrow_mut().push(v), |_| {});
        assert_eq!(stream.pump(), 11);
        assert_eq!(*seen.borrow(), (0..10).collect::<Vec<_>>());
        assert!(stream.is_terminated());
    }

    #[test]
    fn pump_at_most_respects_limit() {
        let (tx, stream) = channel();
        for i in 0..5 {
            tx.send(i).unwrap();
        }
        assert_eq!(stream.pump_at_most(3), 3);
        assert_eq!(stream.pending(), 2);
    }

    #[test]
    fn signals_after_termination_are_not_counted() {
        let (tx, stream) = channel();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _h = stream.subscribe_with(move |v| s.borrow_mut().push(v), |_| {});

        tx.send(1).unwrap();
        tx.complete().unwrap();
        tx.send(2).unwrap();
        tx.fail(StreamError::failed("late")).unwrap();

        assert_eq!(stream.pump(), 2);
        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(stream.pending(), 0);
        assert!(stream.is_terminated());
    }

    #[test]
    fn send_after_stream_dropped_is_disconnected() {
        let (tx, stream) = channel::<u8>();
        drop(stream);
        assert_eq!(tx.send(1), Err(StreamError::Disconnected));
    }

    #[test]
    fn error_is_forwarded_on_pump() {
        let (tx, stream) = channel::<u8>();
        let errors = Rc::new(RefCell::new(Vec::new()));
        let e = Rc::clone(&errors);
        let _h = stream.subscribe_with(|_| {}, move |err| e.borrow_mut().push(err));
        tx.fail(StreamError::failed("remote")).unwrap();
        stream.pump();
        assert_eq!(*errors.borrow(), vec![StreamError::failed("remote")]);
    }
}
