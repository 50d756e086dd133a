//! Mono: a lazy pipeline producing zero or one value (Reactor-like)

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::Scheduler;
use crate::error::{ReactiveError, Result};

type MonoSource<T> = Arc<dyn Fn() -> BoxFuture<'static, Option<T>> + Send + Sync>;

/// Single-value pipeline
///
/// A `Mono` is a recipe: nothing runs until a terminal operation
/// ([`block`](Mono::block), `.await`). Each operator returns a new `Mono`, and
/// every terminal operation evaluates the whole pipeline again.
///
/// # Example
/// ```
/// # use reactive_examples::rx::Mono;
/// let doubled = Mono::just(21).map(|n| n * 2).block().unwrap();
/// assert_eq!(doubled, 42);
///
/// let rejected = Mono::just(1).filter(|n| *n > 1).block();
/// assert!(rejected.unwrap_err().is_absent());
/// ```
pub struct Mono<T> {
    source: MonoSource<T>,
    assembly: String,
    scheduler: Option<Scheduler>,
}

impl<T> Clone for Mono<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            assembly: self.assembly.clone(),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<T: Send + 'static> Mono<T> {
    /// Build the value lazily, once per evaluation
    pub fn defer<F, Fut>(factory: F) -> Mono<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<T>> + Send + 'static,
    {
        Self::assemble("defer", Arc::new(move || factory().boxed()))
    }

    /// A Mono that completes without a value
    pub fn empty() -> Mono<T> {
        Self::assemble("empty", Arc::new(|| future::ready(None).boxed()))
    }

    /// Transform the value; an empty source stays empty
    pub fn map<F, R>(self, f: F) -> Mono<R>
    where
        F: Fn(T) -> R + Send + Sync + 'static,
        R: Send + 'static,
    {
        let f = Arc::new(f);
        let source = self.source;
        let mapped: MonoSource<R> = Arc::new(move || {
            let f = Arc::clone(&f);
            source().map(move |value| value.map(|v| f(v))).boxed()
        });

        Mono {
            source: mapped,
            assembly: format!("{}.map", self.assembly),
            scheduler: self.scheduler,
        }
    }

    /// Drop the value when the predicate rejects it; the result is empty, not an error
    pub fn filter<F>(self, predicate: F) -> Mono<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        let source = self.source;
        let filtered: MonoSource<T> = Arc::new(move || {
            let predicate = Arc::clone(&predicate);
            source()
                .map(move |value| value.filter(|v| predicate(v)))
                .boxed()
        });

        Mono {
            source: filtered,
            assembly: format!("{}.filter", self.assembly),
            scheduler: self.scheduler,
        }
    }

    /// Label the pipeline; the label names the origin of an absent value
    pub fn name(mut self, label: impl Into<String>) -> Mono<T> {
        self.assembly = label.into();
        self
    }

    /// Run evaluation on the given scheduler instead of [`Scheduler::parallel`]
    pub fn subscribe_on(mut self, scheduler: Scheduler) -> Mono<T> {
        self.scheduler = Some(scheduler);
        self
    }

    /// Block the calling thread until the pipeline completes
    ///
    /// Fails with [`ReactiveError::AbsentValue`] when the pipeline completes
    /// empty, and with [`ReactiveError::BlockingInAsyncContext`] when called
    /// from a thread that drives a Tokio runtime (use `.await` there).
    pub fn block(self) -> Result<T> {
        self.block_inner(None)
    }

    /// Like [`block`](Mono::block), giving up with [`ReactiveError::Timeout`]
    pub fn block_timeout(self, timeout: Duration) -> Result<T> {
        self.block_inner(Some(timeout))
    }

    fn block_inner(self, timeout: Option<Duration>) -> Result<T> {
        if Handle::try_current().is_ok() {
            let thread = std::thread::current();
            return Err(ReactiveError::BlockingInAsyncContext {
                thread: thread.name().unwrap_or("<unnamed>").to_string(),
            });
        }

        let scheduler = self.scheduler.clone().unwrap_or_else(Scheduler::parallel);
        let (tx, rx) = oneshot::channel();
        let evaluation = self.evaluate(timeout);

        scheduler.spawn(async move {
            // Receiver gone means the caller stopped waiting
            let _ = tx.send(evaluation.await);
        });

        match rx.blocking_recv() {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("Mono evaluation ended without a result");
                Err(ReactiveError::Terminated)
            }
        }
    }

    fn evaluate(self, timeout: Option<Duration>) -> impl Future<Output = Result<T>> + Send + 'static {
        let future = (self.source)();
        let origin = self.assembly;

        async move {
            let value = match timeout {
                Some(limit) => tokio::time::timeout(limit, future)
                    .await
                    .map_err(|_| ReactiveError::Timeout(limit))?,
                None => future.await,
            };

            match value {
                Some(value) => Ok(value),
                None => {
                    debug!(origin = %origin, "Mono completed empty");
                    Err(ReactiveError::AbsentValue { origin })
                }
            }
        }
    }

    fn assemble(name: &str, source: MonoSource<T>) -> Mono<T> {
        Mono {
            source,
            assembly: name.to_string(),
            scheduler: None,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Mono<T> {
    /// A Mono holding exactly one value
    pub fn just(value: T) -> Mono<T> {
        Self::assemble(
            "just",
            Arc::new(move || future::ready(Some(value.clone())).boxed()),
        )
    }

    /// Present when `Some`, empty when `None`
    pub fn from_option(value: Option<T>) -> Mono<T> {
        Self::assemble(
            "justOrEmpty",
            Arc::new(move || future::ready(value.clone()).boxed()),
        )
    }

    /// Substitute `fallback` when the pipeline completes empty
    pub fn default_if_empty(self, fallback: T) -> Mono<T> {
        let source = self.source;
        let defaulted: MonoSource<T> = Arc::new(move || {
            let fallback = fallback.clone();
            source().map(move |value| value.or(Some(fallback))).boxed()
        });

        Mono {
            source: defaulted,
            assembly: format!("{}.defaultIfEmpty", self.assembly),
            scheduler: self.scheduler,
        }
    }
}

/// `mono.await` resolves without blocking
///
/// Runs on the caller's runtime unless [`Mono::subscribe_on`] picked a scheduler.
impl<T: Send + 'static> IntoFuture for Mono<T> {
    type Output = Result<T>;
    type IntoFuture = BoxFuture<'static, Result<T>>;

    fn into_future(self) -> Self::IntoFuture {
        match self.scheduler.clone() {
            Some(scheduler) => {
                let task = scheduler.spawn(self.evaluate(None));
                async move {
                    task.await.unwrap_or_else(|e| {
                        warn!(error = %e, "Mono evaluation task failed");
                        Err(ReactiveError::Terminated)
                    })
                }
                .boxed()
            }
            None => self.evaluate(None).boxed(),
        }
    }
}

impl<T> std::fmt::Debug for Mono<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mono")
            .field("assembly", &self.assembly)
            .finish()
    }
}
