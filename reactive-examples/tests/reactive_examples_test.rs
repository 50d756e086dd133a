//! Tests for the Mono/Flux scenarios over the person cast

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reactive_examples::rx::{Flux, Mono, Scheduler, SchedulerConfig, SubscriptionState};
use reactive_examples::{Named, Person, PersonCommand, ReactiveError};
use tokio::sync::{mpsc, oneshot};
use tokio_test::assert_err;

fn michael() -> Person {
    Person::new("Michael", "Weston")
}

fn fiona() -> Person {
    Person::new("Fiona", "Glenanne")
}

fn sam() -> Person {
    Person::new("Sam", "Axe")
}

fn jesse() -> Person {
    Person::new("Jesse", "Porter")
}

fn people() -> Flux<Person> {
    Flux::just([michael(), fiona(), sam(), jesse()])
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Subscribe, wait for completion and return the first names seen
async fn first_names(flux: Flux<Person>) -> Vec<String> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let (done_tx, done_rx) = oneshot::channel();

    let _subscription = flux.subscribe(
        move |person: Person| {
            tracing::info!("{}", person.describe());
            sink.lock().unwrap().push(person.first_name().to_string());
        },
        move || {
            let _ = done_tx.send(());
        },
    );

    tokio::time::timeout(Duration::from_secs(10), done_rx)
        .await
        .expect("flux did not complete")
        .unwrap();
    std::mem::take(&mut *seen.lock().unwrap())
}

#[test]
fn test_mono_block() {
    init_tracing();
    let person = Mono::just(michael()).block().unwrap();
    assert_eq!(person.describe(), "My Name is Michael Weston.");
}

#[test]
fn test_mono_transform() {
    let command: PersonCommand = Mono::just(fiona()).map(PersonCommand::from).block().unwrap();
    assert_eq!(command.describe(), fiona().describe());
    assert_eq!(command.describe(), "My Name is Fiona Glenanne.");
}

#[test]
fn test_mono_filter_blocks_to_absent_value() {
    let result = Mono::just(sam())
        .filter(|person| person.first_name().eq_ignore_ascii_case("foo"))
        .name("foo")
        .block();

    let err = assert_err!(result);
    assert!(err.is_absent());
    assert!(err.to_string().contains("`foo`"));
}

#[test]
fn test_mono_filter_ignores_case() {
    let found = Mono::just(sam())
        .filter(|person| person.first_name().eq_ignore_ascii_case("SAM"))
        .block()
        .unwrap();
    assert_eq!(found, sam());
}

#[tokio::test]
async fn test_flux_emits_everyone_in_order() {
    init_tracing();
    assert_eq!(
        first_names(people()).await,
        vec!["Michael", "Fiona", "Sam", "Jesse"]
    );
}

#[tokio::test]
async fn test_flux_filter() {
    let fiona_name = fiona().first_name().to_string();
    let filtered = people().filter(move |person| person.first_name() == fiona_name);
    assert_eq!(first_names(filtered).await, vec!["Fiona"]);
}

#[tokio::test]
async fn test_flux_delay_completes_after_everyone() {
    let start = Instant::now();
    let delayed = people().delay_elements(Duration::from_millis(100));

    assert_eq!(first_names(delayed).await.len(), 4);
    assert!(start.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_flux_delay_then_filter() {
    let completions = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&completions);

    let flux = people()
        .delay_elements(Duration::from_secs(1))
        .filter(|person| person.first_name().contains('i'))
        .do_on_complete(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

    assert_eq!(first_names(flux).await, vec!["Michael", "Fiona"]);
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_flux_subscribe_does_not_wait_for_delay() {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let start = Instant::now();
    let subscription = people()
        .delay_elements(Duration::from_millis(200))
        .subscribe_next(move |person| {
            let _ = tx.send(person);
        });
    assert!(start.elapsed() < Duration::from_millis(200));
    assert!(subscription.is_active());

    assert_eq!(rx.recv().await, Some(michael()));
    subscription.unsubscribe();
}

#[tokio::test]
async fn test_flux_resubscribe_replays_sequence() {
    let flux = people();
    let first = first_names(flux.clone()).await;
    let second = first_names(flux).await;

    assert_eq!(first, second);
    assert_eq!(second.len(), 4);
}

#[tokio::test]
async fn test_flux_unsubscribe_stops_callbacks() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let completed = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&completed);

    let subscription = people().delay_elements(Duration::from_millis(100)).subscribe(
        move |person| {
            let _ = tx.send(person);
        },
        move || {
            c.fetch_add(1, Ordering::SeqCst);
        },
    );

    assert_eq!(rx.recv().await, Some(michael()));
    subscription.unsubscribe();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(subscription.state(), SubscriptionState::Cancelled);
    assert_eq!(completed.load(Ordering::SeqCst), 0);
    // Sender dropped with the cancelled task; nothing else was delivered
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn test_flux_collect_to_commands() {
    let commands = people()
        .map(PersonCommand::from)
        .collect_list()
        .await
        .unwrap();

    let lines: Vec<_> = commands.iter().map(Named::describe).collect();
    assert_eq!(lines[3], "My Name is Jesse Porter.");
    assert_eq!(lines.len(), 4);
}

#[tokio::test]
async fn test_block_inside_runtime_is_an_error() {
    let err = Mono::just(jesse()).block().unwrap_err();
    assert!(matches!(err, ReactiveError::BlockingInAsyncContext { .. }));
}

#[tokio::test]
async fn test_flux_on_dedicated_scheduler_from_async_code() {
    let config = SchedulerConfig {
        worker_threads: Some(1),
        thread_name: "rx-people".to_string(),
    };
    let flux = people().subscribe_on(Scheduler::new(&config).unwrap());

    assert_eq!(
        first_names(flux).await,
        vec!["Michael", "Fiona", "Sam", "Jesse"]
    );
}

#[test]
fn test_mono_block_on_temporary_scheduler() {
    let config = SchedulerConfig::default();
    let person = Mono::just(sam())
        .subscribe_on(Scheduler::new(&config).unwrap())
        .block()
        .unwrap();
    assert_eq!(person.describe(), "My Name is Sam Axe.");
}
