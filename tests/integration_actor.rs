mod common;

use std::{sync::Arc, time::Duration};

use multi_timer::{
    events::TimerEvent,
    state::{TimerSpec, TimerStatus},
    storage::MemoryStore,
    tasks::{completion_policy_task, TimerActor, TimerHandle},
    EngineError,
};
use pretty_assertions::assert_eq;
use tokio::{sync::broadcast, task::JoinHandle, time::sleep};

use common::ticker;

fn spec(name: &str, category: &str, duration: i64, halfway_alert: bool) -> TimerSpec {
    TimerSpec {
        name: name.to_string(),
        category: category.to_string(),
        duration,
        halfway_alert,
    }
}

async fn spawn_actor() -> (TimerHandle, JoinHandle<()>, broadcast::Sender<TimerEvent>) {
    let (engine, _, _) = ticker();
    let (events_tx, _) = broadcast::channel(16);
    let actor = TimerActor::load(Arc::new(MemoryStore::new()), engine, events_tx.clone()).await;
    let (handle, task) = actor.spawn();
    (handle, task, events_tx)
}

#[tokio::test(start_paused = true)]
async fn actor_counts_down_once_per_second() {
    let (handle, task, events_tx) = spawn_actor().await;
    let mut events = events_tx.subscribe();

    let tea = handle.add(spec("Tea", "Kitchen", 5, true)).await.unwrap();
    handle.start(&tea.id).await.unwrap();

    sleep(Duration::from_millis(2500)).await;
    let timers = handle.list().await.unwrap();
    assert_eq!(timers[0].remaining_time, 3);
    assert_eq!(timers[0].status, TimerStatus::Running);

    sleep(Duration::from_secs(3)).await;
    let timers = handle.list().await.unwrap();
    assert_eq!(timers[0].remaining_time, 0);
    assert_eq!(timers[0].status, TimerStatus::Completed);

    let history = handle.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].name, "Tea");

    match events.recv().await.unwrap() {
        TimerEvent::HalfwayReached { id, remaining_time, .. } => {
            assert_eq!(id, tea.id);
            assert_eq!(remaining_time, 2);
        }
        other => panic!("expected halfway event, got {:?}", other),
    }
    assert!(matches!(
        events.recv().await.unwrap(),
        TimerEvent::Completed { .. }
    ));

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn paused_timer_holds_its_remaining_time() {
    let (handle, task, _events_tx) = spawn_actor().await;

    let run = handle.add(spec("Run", "Fitness", 60, false)).await.unwrap();
    handle.start(&run.id).await.unwrap();
    sleep(Duration::from_millis(3500)).await;
    handle.pause(&run.id).await.unwrap();
    sleep(Duration::from_secs(10)).await;

    let timers = handle.list().await.unwrap();
    assert_eq!(timers[0].remaining_time, 57);
    assert_eq!(timers[0].status, TimerStatus::Paused);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn invalid_request_is_rejected_with_every_field() {
    let (handle, task, _events_tx) = spawn_actor().await;

    let err = handle.add(spec("  ", "", 0, false)).await.unwrap_err();
    match err {
        EngineError::Validation(errors) => {
            assert_eq!(errors.get("name"), Some("Timer name is required"));
            assert_eq!(errors.get("category"), Some("Category is required"));
            assert_eq!(errors.get("duration"), Some("Duration must be a positive number"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(handle.list().await.unwrap().is_empty());

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn stopped_actor_reports_stopped() {
    let (handle, task, _events_tx) = spawn_actor().await;

    handle.shutdown().await.unwrap();
    task.await.unwrap();

    assert!(matches!(handle.list().await, Err(EngineError::Stopped)));
}

#[tokio::test]
async fn toggle_category_flips_expansion() {
    let (handle, task, _events_tx) = spawn_actor().await;

    handle.add(spec("Tea", "Kitchen", 5, false)).await.unwrap();
    let views = handle.categories().await.unwrap();
    assert_eq!(views.len(), 1);
    assert!(views[0].expanded);

    assert!(!handle.toggle_category(" Kitchen ").await.unwrap());
    assert!(!handle.categories().await.unwrap()[0].expanded);
    assert!(handle.toggle_category("Kitchen").await.unwrap());

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn completion_policy_removes_finished_timers() {
    let (handle, task, events_tx) = spawn_actor().await;
    let policy = tokio::spawn(completion_policy_task(handle.clone(), events_tx.subscribe()));

    let egg = handle.add(spec("Egg", "Kitchen", 2, false)).await.unwrap();
    let tea = handle.add(spec("Tea", "Kitchen", 60, false)).await.unwrap();
    handle.start(&egg.id).await.unwrap();
    handle.start(&tea.id).await.unwrap();

    sleep(Duration::from_millis(3500)).await;

    let timers = handle.list().await.unwrap();
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0].id, tea.id);
    assert_eq!(handle.history().await.unwrap().len(), 1);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
    drop(events_tx);
    policy.abort();
}
