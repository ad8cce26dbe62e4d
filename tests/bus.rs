//! End-to-end tests for the bus: fan-out delivery, queueing discipline, and
//! the two-phase close-and-drain protocol.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use notibus::{Bus, BusError, Dispatcher, Event, EventData, Subscribe, SubscriberError};

/// Counts invocations, optionally sleeping first to simulate slow work.
struct Counting {
    hits: AtomicUsize,
    delay: Option<Duration>,
}

impl Counting {
    fn instant() -> Arc<Self> {
        Arc::new(Self { hits: AtomicUsize::new(0), delay: None })
    }

    fn sleeping(delay: Duration) -> Arc<Self> {
        Arc::new(Self { hits: AtomicUsize::new(0), delay: Some(delay) })
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Subscribe for Counting {
    async fn on_event(&self, _event: &Event) -> Result<(), SubscriberError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Records the entity id of every delivered event.
#[derive(Default)]
struct Recording {
    seen: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Subscribe for Recording {
    async fn on_event(&self, event: &Event) -> Result<(), SubscriberError> {
        self.seen.lock().unwrap().push(event.entity_id.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Fails every invocation.
struct Failing;

#[async_trait::async_trait]
impl Subscribe for Failing {
    async fn on_event(&self, _event: &Event) -> Result<(), SubscriberError> {
        Err(SubscriberError::failed("boom"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Panics on every invocation.
struct Panicking;

#[async_trait::async_trait]
impl Subscribe for Panicking {
    async fn on_event(&self, _event: &Event) -> Result<(), SubscriberError> {
        panic!("subscriber exploded");
    }

    fn name(&self) -> &'static str {
        "panicking"
    }
}

fn spawn_loop(mut dispatcher: Dispatcher, stop: CancellationToken) -> JoinHandle<Dispatcher> {
    tokio::spawn(async move {
        dispatcher.listen(stop).await;
        dispatcher
    })
}

fn item_event(n: u32) -> Event {
    Event::new("user-1", EventData::ItemCreated { id: format!("item-{n}") })
}

#[tokio::test]
async fn every_subscriber_invoked_once_per_event() {
    // Created, updated, deleted on the same entity with two instantaneous
    // subscribers: 6 invocations total, drain well under the 1s deadline.
    let first = Counting::instant();
    let second = Counting::instant();
    let (bus, dispatcher) = Bus::new(vec![first.clone(), second.clone()]);

    let stop = CancellationToken::new();
    let handle = spawn_loop(dispatcher, stop.clone());

    bus.notify(Event::new("user-1", EventData::ItemCreated { id: "a".into() })).await;
    bus.notify(Event::new("user-1", EventData::ItemUpdated { id: "a".into() })).await;
    bus.notify(Event::new("user-1", EventData::ItemDeleted { id: "a".into() })).await;

    stop.cancel();
    let dispatcher = handle.await.unwrap();

    let started = Instant::now();
    dispatcher.close_and_drain(Duration::from_secs(1)).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));

    assert_eq!(first.hits(), 3);
    assert_eq!(second.hits(), 3);
}

#[tokio::test]
async fn every_event_delivered_exactly_once() {
    let recording = Arc::new(Recording::default());
    let (bus, dispatcher) = Bus::new(vec![recording.clone()]);

    let stop = CancellationToken::new();
    let handle = spawn_loop(dispatcher, stop.clone());

    for n in 0..10 {
        bus.notify(item_event(n)).await;
    }

    stop.cancel();
    let dispatcher = handle.await.unwrap();
    dispatcher.close_and_drain(Duration::from_secs(1)).await.unwrap();

    let mut seen = recording.seen.lock().unwrap().clone();
    seen.sort();
    let mut expected: Vec<String> = (0..10).map(|n| format!("item-{n}")).collect();
    expected.sort();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn failing_subscriber_does_not_affect_others() {
    let counting = Counting::instant();
    let (bus, dispatcher) = Bus::new(vec![Arc::new(Failing), counting.clone()]);

    let stop = CancellationToken::new();
    let handle = spawn_loop(dispatcher, stop.clone());

    for n in 0..3 {
        bus.notify(item_event(n)).await;
    }

    stop.cancel();
    let dispatcher = handle.await.unwrap();
    dispatcher.close_and_drain(Duration::from_secs(1)).await.unwrap();

    assert_eq!(counting.hits(), 3);
}

#[tokio::test]
async fn panicking_subscriber_is_isolated() {
    let counting = Counting::instant();
    let (bus, dispatcher) = Bus::new(vec![Arc::new(Panicking), counting.clone()]);

    let stop = CancellationToken::new();
    let handle = spawn_loop(dispatcher, stop.clone());

    bus.notify(item_event(1)).await;

    stop.cancel();
    let dispatcher = handle.await.unwrap();
    dispatcher.close_and_drain(Duration::from_secs(1)).await.unwrap();

    assert_eq!(counting.hits(), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_drain_returns_immediately() {
    let (_bus, dispatcher) = Bus::new(vec![Counting::instant()]);

    let started = Instant::now();
    dispatcher.close_and_drain(Duration::from_secs(60)).await.unwrap();
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn drain_returns_when_last_invocation_completes_before_deadline() {
    let slow = Counting::sleeping(Duration::from_millis(100));
    let (bus, dispatcher) = Bus::new(vec![slow.clone()]);

    let stop = CancellationToken::new();
    let handle = spawn_loop(dispatcher, stop.clone());

    bus.notify(item_event(1)).await;

    stop.cancel();
    let dispatcher = handle.await.unwrap();

    let started = Instant::now();
    dispatcher.close_and_drain(Duration::from_secs(5)).await.unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_secs(5));
    assert_eq!(slow.hits(), 1);
}

#[tokio::test(start_paused = true)]
async fn drain_gives_up_at_deadline_with_work_still_in_flight() {
    // Subscriber sleeps 2s, deadline 500ms: drain must return at the
    // deadline with the invocation abandoned (observable via DrainTimeout).
    let slow = Counting::sleeping(Duration::from_secs(2));
    let (bus, dispatcher) = Bus::new(vec![slow.clone()]);

    let stop = CancellationToken::new();
    let handle = spawn_loop(dispatcher, stop.clone());

    bus.notify(item_event(1)).await;

    stop.cancel();
    let dispatcher = handle.await.unwrap();

    let started = Instant::now();
    let err = dispatcher.close_and_drain(Duration::from_millis(500)).await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(500));
    assert!(elapsed < Duration::from_secs(2));
    match err {
        BusError::DrainTimeout { grace, abandoned } => {
            assert_eq!(grace, Duration::from_millis(500));
            assert_eq!(abandoned, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(slow.hits(), 0);
}

#[tokio::test(start_paused = true)]
async fn notify_suspends_until_the_loop_takes_the_event() {
    let counting = Counting::instant();
    let (bus, dispatcher) = Bus::new(vec![counting.clone()]);

    // No dispatch loop yet: the producer must park in notify().
    let producer = tokio::spawn({
        let bus = bus.clone();
        async move { bus.notify(item_event(1)).await }
    });
    tokio::task::yield_now().await;
    assert!(!producer.is_finished());

    let stop = CancellationToken::new();
    let handle = spawn_loop(dispatcher, stop.clone());
    producer.await.unwrap();

    stop.cancel();
    let dispatcher = handle.await.unwrap();
    dispatcher.close_and_drain(Duration::from_secs(1)).await.unwrap();
    assert_eq!(counting.hits(), 1);
}

#[tokio::test]
async fn producer_mid_handoff_completes_during_drain() {
    // The loop never runs: the producer's event is accepted into the queue
    // but not yet taken when close happens. Close must complete the handoff
    // and deliver the event rather than lose it.
    let counting = Counting::instant();
    let (bus, dispatcher) = Bus::new(vec![counting.clone()]);

    let producer = tokio::spawn({
        let bus = bus.clone();
        async move { bus.notify(item_event(1)).await }
    });
    // Let the producer reach its rendezvous point.
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }

    dispatcher.close_and_drain(Duration::from_secs(1)).await.unwrap();
    producer.await.unwrap();
    assert_eq!(counting.hits(), 1);
}

#[tokio::test]
#[should_panic(expected = "no longer accepts events")]
async fn notify_after_close_panics() {
    let (bus, dispatcher) = Bus::new(vec![Counting::instant()]);
    dispatcher.close_and_drain(Duration::from_secs(1)).await.unwrap();

    bus.notify(item_event(1)).await;
}
