//! Flux: a lazy, finite, restartable sequence (Reactor-like)

use futures::future;
use futures::stream::{self, BoxStream};
use futures::{FutureExt, Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use super::{Mono, Scheduler, Subscription, operators};

pub(crate) type FluxSource<T> = Arc<dyn Fn() -> BoxStream<'static, T> + Send + Sync>;

/// Multi-value pipeline
///
/// A `Flux` is a stream factory: every subscription builds a fresh stream, so
/// subscribing twice replays the whole sequence.
///
/// # Example
/// ```no_run
/// # use reactive_examples::rx::Flux;
/// # use std::time::Duration;
/// let subscription = Flux::just([1, 2, 3, 4])
///     .filter(|n| n % 2 == 0)
///     .delay_elements(Duration::from_millis(100))
///     .subscribe(
///         |value| println!("Next: {}", value),
///         || println!("Complete!"),
///     );
/// ```
pub struct Flux<T> {
    source: FluxSource<T>,
    scheduler: Option<Scheduler>,
}

impl<T> Clone for Flux<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<T: Send + 'static> Flux<T> {
    /// Create a Flux from a stream factory, invoked once per subscription
    pub fn defer<F, S>(factory: F) -> Flux<T>
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = T> + Send + 'static,
    {
        Self::from_source(Arc::new(move || factory().boxed()))
    }

    /// A Flux that completes immediately
    pub fn empty() -> Flux<T> {
        Self::from_source(Arc::new(|| stream::empty().boxed()))
    }

    pub(crate) fn from_source(source: FluxSource<T>) -> Flux<T> {
        Flux {
            source,
            scheduler: None,
        }
    }

    /// Rebuild with a new source, keeping the scheduler choice
    pub(crate) fn with_source<R>(&self, source: FluxSource<R>) -> Flux<R> {
        Flux {
            source,
            scheduler: self.scheduler.clone(),
        }
    }

    pub(crate) fn source(&self) -> FluxSource<T> {
        Arc::clone(&self.source)
    }

    /// Map operator - transform values
    pub fn map<F, R>(self, f: F) -> Flux<R>
    where
        F: Fn(T) -> R + Send + Sync + 'static,
        R: Send + 'static,
    {
        let f = Arc::new(f);
        let source = self.source();
        self.with_source(Arc::new(move || {
            let f = Arc::clone(&f);
            source().map(move |item| f(item)).boxed()
        }))
    }

    /// Filter operator - keep values matching the predicate, in order
    pub fn filter<F>(self, predicate: F) -> Flux<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        let source = self.source();
        self.with_source(Arc::new(move || {
            let predicate = Arc::clone(&predicate);
            source()
                .filter(move |item| future::ready(predicate(item)))
                .boxed()
        }))
    }

    /// Take operator - take first N values
    pub fn take(self, n: usize) -> Flux<T> {
        let source = self.source();
        self.with_source(Arc::new(move || source().take(n).boxed()))
    }

    /// Skip operator - skip first N values
    pub fn skip(self, n: usize) -> Flux<T> {
        let source = self.source();
        self.with_source(Arc::new(move || source().skip(n).boxed()))
    }

    /// Emit each value `duration` after the previous one, without blocking a thread
    pub fn delay_elements(self, duration: Duration) -> Flux<T> {
        operators::delay_elements(self, duration)
    }

    /// Run `f` on every value before it reaches the subscriber
    pub fn do_on_next<F>(self, f: F) -> Flux<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let source = self.source();
        self.with_source(Arc::new(move || {
            let f = Arc::clone(&f);
            source().inspect(move |item| f(item)).boxed()
        }))
    }

    /// Run `f` when the sequence completes; never after cancellation
    pub fn do_on_complete<F>(self, f: F) -> Flux<T>
    where
        F: Fn() + Send + Sync + 'static,
    {
        operators::do_on_complete(self, f)
    }

    /// Run subscriptions on the given scheduler instead of [`Scheduler::parallel`]
    pub fn subscribe_on(mut self, scheduler: Scheduler) -> Flux<T> {
        self.scheduler = Some(scheduler);
        self
    }

    /// Collect every value into a single-value pipeline
    pub fn collect_list(self) -> Mono<Vec<T>> {
        let source = self.source();
        let mono =
            Mono::defer(move || source().collect::<Vec<T>>().map(Some)).name("collectList");
        match self.scheduler {
            Some(scheduler) => mono.subscribe_on(scheduler),
            None => mono,
        }
    }

    /// Count the values of one pass over the sequence
    pub fn count(self) -> Mono<usize> {
        let source = self.source();
        let mono = Mono::defer(move || source().count().map(Some)).name("count");
        match self.scheduler {
            Some(scheduler) => mono.subscribe_on(scheduler),
            None => mono,
        }
    }

    /// A fresh stream over the sequence, for chaining with `StreamExt`
    pub fn into_stream(self) -> BoxStream<'static, T> {
        (self.source)()
    }

    /// Subscribe with next/complete callbacks (Reactor style)
    ///
    /// Returns immediately. `next` runs once per value in emission order and
    /// `complete` exactly once after the last value, both on the scheduler's
    /// threads. Neither runs after [`Subscription::unsubscribe`].
    pub fn subscribe<N, C>(self, mut next: N, complete: C) -> Subscription
    where
        N: FnMut(T) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        let subscription = Subscription::new();
        let handle = subscription.clone();
        let scheduler = self.scheduler.unwrap_or_else(Scheduler::parallel);
        let mut stream = (self.source)();
        let mut complete = Some(complete);

        debug!("Flux subscribed");

        scheduler.spawn(async move {
            loop {
                let cancelled = handle.cancelled();
                tokio::pin!(cancelled);
                if !handle.is_active() {
                    break;
                }

                tokio::select! {
                    biased;
                    () = &mut cancelled => break,
                    item = stream.next() => match item {
                        Some(value) => {
                            if !handle.is_active() {
                                break;
                            }
                            trace!("Flux emitting next value");
                            next(value);
                        }
                        None => {
                            if let Some(complete) = complete.take() {
                                if handle.complete() {
                                    debug!("Flux completed");
                                    complete();
                                }
                            }
                            break;
                        }
                    },
                }
            }
        });

        subscription
    }

    /// Subscribe with only next callback (simplified)
    pub fn subscribe_next<F>(self, next: F) -> Subscription
    where
        F: FnMut(T) + Send + 'static,
    {
        self.subscribe(next, || {})
    }
}

impl<T: Clone + Send + Sync + 'static> Flux<T> {
    /// A finite sequence over `values`, in order
    pub fn just<I>(values: I) -> Flux<T>
    where
        I: IntoIterator<Item = T>,
    {
        let values: Arc<[T]> = values.into_iter().collect();
        Self::from_source(Arc::new(move || {
            let values = Arc::clone(&values);
            stream::iter((0..values.len()).map(move |i| values[i].clone())).boxed()
        }))
    }
}

impl Flux<i64> {
    /// `count` consecutive integers starting at `start`
    pub fn range(start: i64, count: usize) -> Flux<i64> {
        Self::from_source(Arc::new(move || stream::iter((start..).take(count)).boxed()))
    }
}

impl<T: Clone + Send + Sync + 'static> FromIterator<T> for Flux<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Flux::just(iter)
    }
}

impl<T> std::fmt::Debug for Flux<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flux")
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
