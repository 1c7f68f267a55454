#![forbid(unsafe_code)]

//! Derived cells built from [`Mediator`].
//!
//! Every combinator returns a plain [`Observable`] whose upstream
//! subscriptions live inside the returned cell. Sources are registered in
//! argument order, and sources that already hold a value are replayed in that
//! order while the combinator is being built.

use std::rc::Rc;

use crate::mediator::Mediator;
use crate::observable::Observable;

/// Derive a cell holding `mapper(value)` for each source write that maps.
///
/// A write of absence, or a value the mapper turns into `None`, leaves the
/// output untouched and fires no notification.
pub fn map_not_null<I, O, F>(source: &impl AsRef<Observable<I>>, mapper: F) -> Observable<O>
where
    I: Clone + 'static,
    O: Clone + 'static,
    F: Fn(&I) -> Option<O> + 'static,
{
    let mediator: Mediator<O> = Mediator::new();
    mediator.add_source(source, move |m, input| {
        if let Some(output) = input.and_then(&mapper) {
            m.set(output);
        }
    });
    mediator.into_observable()
}

/// Derive a cell holding `mapper(value)` after every source write.
///
/// The mapper also sees absence, so every source write produces an output
/// write. Until the source is first written the output stays unwritten
/// (absent, version 0); the mapper is not called for the initial absence.
pub fn map_nullable<I, O, F>(source: &impl AsRef<Observable<I>>, mapper: F) -> Observable<O>
where
    I: Clone + 'static,
    O: Clone + 'static,
    F: Fn(Option<&I>) -> O + 'static,
{
    let mediator: Mediator<O> = Mediator::new();
    mediator.add_source(source, move |m, input| m.set(mapper(input)));
    mediator.into_observable()
}

/// Derive a cell that takes the value of whichever source was written last.
///
/// Each source write is forwarded as its own output write.
pub fn merge<T, S>(sources: impl IntoIterator<Item = S>) -> Observable<T>
where
    T: Clone + 'static,
    S: AsRef<Observable<T>>,
{
    let mediator: Mediator<T> = Mediator::new();
    for source in sources {
        mediator.add_source(&source, |m, value: Option<&T>| m.set_value(value.cloned()));
    }
    mediator.into_observable()
}

/// Derive a cell holding `combiner` over the latest value of both sources.
///
/// Recomputed whenever either source is written. A source that has no value
/// yet is passed as `None`.
pub fn combine_latest2<A, B, R, F>(
    source1: &impl AsRef<Observable<A>>,
    source2: &impl AsRef<Observable<B>>,
    combiner: F,
) -> Observable<R>
where
    A: Clone + 'static,
    B: Clone + 'static,
    R: Clone + 'static,
    F: Fn(Option<&A>, Option<&B>) -> R + 'static,
{
    let s1 = source1.as_ref().clone();
    let s2 = source2.as_ref().clone();
    let recompute = Rc::new(move |m: &Mediator<R>| {
        let output = s1.with(|a| s2.with(|b| combiner(a, b)));
        m.set(output);
    });

    let mediator: Mediator<R> = Mediator::new();
    let r1 = Rc::clone(&recompute);
    mediator.add_source(source1, move |m, _| r1(m));
    let r2 = recompute;
    mediator.add_source(source2, move |m, _| r2(m));
    mediator.into_observable()
}

/// Three-source form of [`combine_latest2`].
pub fn combine_latest3<A, B, C, R, F>(
    source1: &impl AsRef<Observable<A>>,
    source2: &impl AsRef<Observable<B>>,
    source3: &impl AsRef<Observable<C>>,
    combiner: F,
) -> Observable<R>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    R: Clone + 'static,
    F: Fn(Option<&A>, Option<&B>, Option<&C>) -> R + 'static,
{
    let s1 = source1.as_ref().clone();
    let s2 = source2.as_ref().clone();
    let s3 = source3.as_ref().clone();
    let recompute = Rc::new(move |m: &Mediator<R>| {
        let output = s1.with(|a| s2.with(|b| s3.with(|c| combiner(a, b, c))));
        m.set(output);
    });

    let mediator: Mediator<R> = Mediator::new();
    let r1 = Rc::clone(&recompute);
    mediator.add_source(source1, move |m, _| r1(m));
    let r2 = Rc::clone(&recompute);
    mediator.add_source(source2, move |m, _| r2(m));
    let r3 = recompute;
    mediator.add_source(source3, move |m, _| r3(m));
    mediator.into_observable()
}

/// Derive a cell holding the logical OR of every source.
///
/// Absent sources count as `false`. The output starts at the OR of the
/// sources' current values (so `false` when none has a value) and is
/// recomputed on every write of any source.
pub fn any_true<S>(sources: impl IntoIterator<Item = S>) -> Observable<bool>
where
    S: AsRef<Observable<bool>>,
{
    let sources: Rc<Vec<Observable<bool>>> = Rc::new(
        sources
            .into_iter()
            .map(|source| source.as_ref().clone())
            .collect(),
    );
    let any = {
        let sources = Rc::clone(&sources);
        move || {
            sources
                .iter()
                .any(|source| source.with(|value| value.copied().unwrap_or(false)))
        }
    };

    let mediator = Mediator::with_value(any());
    let any = Rc::new(any);
    for source in sources.iter() {
        let any = Rc::clone(&any);
        mediator.add_source(source, move |m, _| m.set(any()));
    }
    mediator.into_observable()
}
