//! Time-shifting and lifecycle operators built on `async_stream`

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::Flux;

/// Delay elements operator - shift each value by `duration`
///
/// Values stay in order; the completion signal follows the last delayed
/// value. Only a timer waits, never a thread.
///
/// # Example
/// ```no_run
/// # use reactive_examples::rx::{Flux, operators::delay_elements};
/// # use std::time::Duration;
/// let flux = Flux::just([1, 2, 3]);
/// let delayed = delay_elements(flux, Duration::from_millis(500));
/// ```
pub fn delay_elements<T: Send + 'static>(flux: Flux<T>, duration: Duration) -> Flux<T> {
    let source = flux.source();
    flux.with_source(Arc::new(move || {
        let source = Arc::clone(&source);
        let stream = async_stream::stream! {
            let mut upstream = source();

            while let Some(value) = upstream.next().await {
                sleep(duration).await;
                yield value;
            }
        };
        stream.boxed()
    }))
}

/// Completion hook operator - run `hook` once the upstream completes
///
/// The hook runs before the subscriber's own completion callback. A cancelled
/// subscription drops the stream first, so the hook never runs for it.
pub fn do_on_complete<T, F>(flux: Flux<T>, hook: F) -> Flux<T>
where
    T: Send + 'static,
    F: Fn() + Send + Sync + 'static,
{
    let hook = Arc::new(hook);
    let source = flux.source();
    flux.with_source(Arc::new(move || {
        let source = Arc::clone(&source);
        let hook = Arc::clone(&hook);
        let stream = async_stream::stream! {
            let mut upstream = source();

            while let Some(value) = upstream.next().await {
                yield value;
            }
            hook();
        };
        stream.boxed()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_delay_elements_keeps_order_and_spacing() {
        let delayed = delay_elements(Flux::just([1, 2, 3]), Duration::from_millis(30));

        let start = Instant::now();
        let values: Vec<_> = delayed.into_stream().collect().await;

        assert_eq!(values, vec![1, 2, 3]);
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_delay_elements_first_value_waits() {
        let mut stream =
            delay_elements(Flux::just(["a"]), Duration::from_millis(50)).into_stream();

        let start = Instant::now();
        assert_eq!(stream.next().await, Some("a"));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_do_on_complete_runs_once_per_pass() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let flux = do_on_complete(Flux::just([1, 2]), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let first: Vec<_> = flux.clone().into_stream().collect().await;
        let second: Vec<_> = flux.into_stream().collect().await;

        assert_eq!(first, vec![1, 2]);
        assert_eq!(second, vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_do_on_complete_skipped_when_dropped_early() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let flux = do_on_complete(Flux::just([1, 2, 3]), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let mut stream = flux.into_stream();
        assert_eq!(stream.next().await, Some(1));
        drop(stream);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
