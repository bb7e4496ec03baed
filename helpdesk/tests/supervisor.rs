#![cfg(feature = "test-utils")]

use helpdesk::error::ErrorKind;
use helpdesk::observer::log::LogObserver;
use helpdesk::state::helper::HelperPhase;
use helpdesk::supervisor::SupervisorId;
use helpdesk::test_utils::event::{
    count_events_of_type, group_events_by_type, max_concurrent_in_service,
};
use helpdesk::test_utils::supervisor::{SupervisorBuilder, create_supervisor};
use helpdesk::test_utils::test_observer_wrapper::TestObserverWrapper;
use helpdesk::types::{EventType, SeekerId};
use helpdesk_telemetry::tracing::init_test_tracing;
use rand::random;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test(flavor = "multi_thread")]
async fn seeker_is_serviced_repeatedly_when_chairs_are_plentiful() {
    init_test_tracing();

    let observer = TestObserverWrapper::wrap(LogObserver::new());

    let supervisor_id: SupervisorId = random();
    let mut supervisor = SupervisorBuilder::new(supervisor_id, observer.clone())
        .with_chair_count(3)
        .with_seeker_count(1)
        .build();

    // Wait for the seeker to go through the full cycle a few times.
    let serviced_notify = observer
        .wait_for_min_events_count(vec![(EventType::Serviced, 3)])
        .await;

    supervisor.start().await.unwrap();

    serviced_notify.notified().await;

    // The seeker's own counters must agree with the observed events.
    let seeker_state = supervisor.seeker_state(SeekerId(0)).await.unwrap();
    {
        let inner = seeker_state.lock().await;
        assert!(inner.services_completed() >= 3);
        assert_eq!(inner.rejections(), 0);
    }

    let room = supervisor.waiting_room();
    let handoff = supervisor.handoff_channel();
    let helper_state = supervisor.helper_state();

    supervisor.shutdown_and_wait().await.unwrap();

    let events = observer.get_events().await;
    let grouped = group_events_by_type(&events);

    // A single seeker with three chairs never finds the room full.
    assert!(!grouped.contains_key(&EventType::SeatRejected));

    // Every handshake that started also completed, no wakeup was lost.
    let entered = count_events_of_type(&events, &EventType::EnteredService);
    assert!(entered >= 3);
    assert_eq!(entered, count_events_of_type(&events, &EventType::ServiceStarted));
    assert_eq!(entered, count_events_of_type(&events, &EventType::ServiceFinished));
    assert_eq!(entered, count_events_of_type(&events, &EventType::Serviced));

    // A seat can be granted without the service starting when shutdown lands in
    // between, but never the other way around.
    assert!(count_events_of_type(&events, &EventType::SeatGranted) >= entered);

    // The helper idled between services and was woken by calls.
    assert!(count_events_of_type(&events, &EventType::HelperIdle) >= 1);
    assert!(count_events_of_type(&events, &EventType::HelperWoken) >= 1);

    // After the drain every seat is free again and no call was left unconsumed.
    assert!(room.is_empty().await);
    assert_eq!(room.free_seats().await, 3);
    assert_eq!(handoff.pending_calls(), 0);

    assert!(helper_state.lock().await.services_performed() >= 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn all_seekers_are_rejected_when_room_has_no_chairs() {
    init_test_tracing();

    let observer = TestObserverWrapper::wrap(LogObserver::new());

    let supervisor_id: SupervisorId = random();
    let mut supervisor = SupervisorBuilder::new(supervisor_id, observer.clone())
        .with_chair_count(0)
        .with_seeker_count(3)
        .build();

    // Wait for each seeker to be turned away a few times.
    let rejected_notify = observer
        .wait_for_min_events_count(vec![(EventType::SeatRejected, 9)])
        .await;

    supervisor.start().await.unwrap();

    rejected_notify.notified().await;

    // The helper found the room empty once and has been asleep ever since.
    let helper_state = supervisor.helper_state();
    {
        let inner = helper_state.lock().await;
        assert_eq!(inner.phase(), HelperPhase::Idle);
        assert_eq!(inner.services_performed(), 0);
    }
    assert!(helper_state.is_idle());

    let handoff = supervisor.handoff_channel();

    supervisor.shutdown_and_wait().await.unwrap();

    let events = observer.get_events().await;
    let grouped = group_events_by_type(&events);

    // With no chairs nobody ever sits down, so the handshake never starts.
    assert!(!grouped.contains_key(&EventType::SeatGranted));
    assert!(!grouped.contains_key(&EventType::HelperWoken));
    assert!(!grouped.contains_key(&EventType::ServiceStarted));
    assert!(!grouped.contains_key(&EventType::ServiceFinished));
    assert!(!grouped.contains_key(&EventType::EnteredService));
    assert!(!grouped.contains_key(&EventType::Serviced));

    // The helper announces its idleness exactly once since nothing ever wakes it.
    assert_eq!(count_events_of_type(&events, &EventType::HelperIdle), 1);

    assert_eq!(handoff.pending_calls(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn single_slot_services_never_overlap_under_contention() {
    init_test_tracing();

    let observer = TestObserverWrapper::wrap(LogObserver::new());

    // One chair and long services force the spare seekers to retry against a
    // room that stays occupied.
    let supervisor_id: SupervisorId = random();
    let mut supervisor = SupervisorBuilder::new(supervisor_id, observer.clone())
        .with_chair_count(1)
        .with_seeker_count(3)
        .with_think_time(1, 5)
        .with_service_time(200, 300)
        .build();

    let serviced_notify = observer
        .wait_for_min_events_count(vec![(EventType::Serviced, 3)])
        .await;

    supervisor.start().await.unwrap();

    serviced_notify.notified().await;

    let room = supervisor.waiting_room();

    supervisor.shutdown_and_wait().await.unwrap();

    let events = observer.get_events().await;

    // With a single service slot no two seekers are ever in service together.
    assert_eq!(max_concurrent_in_service(&events), 1);

    // While one seeker holds the only chair through a whole service, the spare
    // seekers must have been turned away.
    assert!(count_events_of_type(&events, &EventType::SeatRejected) >= 1);

    // Every handshake that started also completed.
    let entered = count_events_of_type(&events, &EventType::EnteredService);
    assert_eq!(entered, count_events_of_type(&events, &EventType::Serviced));

    // After the drain the only seat is free again.
    assert_eq!(room.free_seats().await, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn extra_service_slots_allow_overlapping_handshakes() {
    init_test_tracing();

    let observer = TestObserverWrapper::wrap(LogObserver::new());

    let supervisor_id: SupervisorId = random();
    let mut supervisor = SupervisorBuilder::new(supervisor_id, observer.clone())
        .with_chair_count(3)
        .with_seeker_count(4)
        .with_service_slot_count(2)
        .with_think_time(1, 5)
        .with_service_time(100, 200)
        .build();

    let serviced_notify = observer
        .wait_for_min_events_count(vec![(EventType::Serviced, 4)])
        .await;

    supervisor.start().await.unwrap();

    serviced_notify.notified().await;

    let room = supervisor.waiting_room();

    supervisor.shutdown_and_wait().await.unwrap();

    let events = observer.get_events().await;

    // With two slots a second seeker claims its slot while the first service is
    // still running, and the bound of two is never exceeded.
    assert_eq!(max_concurrent_in_service(&events), 2);

    // The single helper still performs one service at a time, so the service
    // events stay paired.
    let started = count_events_of_type(&events, &EventType::ServiceStarted);
    assert_eq!(started, count_events_of_type(&events, &EventType::ServiceFinished));
    assert_eq!(started, count_events_of_type(&events, &EventType::Serviced));

    assert!(room.is_empty().await);
}

#[tokio::test(flavor = "multi_thread")]
async fn starting_a_supervisor_twice_fails() {
    init_test_tracing();

    let observer = TestObserverWrapper::wrap(LogObserver::new());

    let supervisor_id: SupervisorId = random();
    let mut supervisor = create_supervisor(supervisor_id, observer.clone());

    supervisor.start().await.unwrap();

    let err = supervisor.start().await.unwrap_err();
    assert!(
        err.kinds().contains(&ErrorKind::InvalidState),
        "Error should be InvalidState, got: {:?}",
        err.kinds()
    );

    supervisor.shutdown_and_wait().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn waiting_for_a_supervisor_that_was_not_started_returns() {
    init_test_tracing();

    let observer = TestObserverWrapper::wrap(LogObserver::new());

    let supervisor_id: SupervisorId = random();
    let supervisor = create_supervisor(supervisor_id, observer.clone());

    // Workers only exist after start, so there is no state to query yet.
    assert!(supervisor.seeker_state(SeekerId(0)).await.is_none());

    supervisor.wait().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn shutdown_interrupts_thinking_seekers_promptly() {
    init_test_tracing();

    let observer = TestObserverWrapper::wrap(LogObserver::new());

    // Think times far beyond the test timeout prove that shutdown does not wait
    // for the current work period to end.
    let supervisor_id: SupervisorId = random();
    let mut supervisor = SupervisorBuilder::new(supervisor_id, observer.clone())
        .with_chair_count(3)
        .with_seeker_count(2)
        .with_think_time(60_000, 120_000)
        .build();

    supervisor.start().await.unwrap();

    timeout(Duration::from_secs(5), supervisor.shutdown_and_wait())
        .await
        .expect("shutdown did not complete in time")
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn supervisor_shutdown_calls_observer_shutdown() {
    init_test_tracing();

    let observer = TestObserverWrapper::wrap(LogObserver::new());

    let supervisor_id: SupervisorId = random();
    let mut supervisor = create_supervisor(supervisor_id, observer.clone());

    let serviced_notify = observer
        .wait_for_min_events_count(vec![(EventType::Serviced, 1)])
        .await;

    supervisor.start().await.unwrap();

    serviced_notify.notified().await;

    // Shutdown should not have been called yet.
    assert!(!observer.shutdown_called().await);

    supervisor.shutdown_and_wait().await.unwrap();

    // Verify that shutdown was called on the observer.
    assert!(observer.shutdown_called().await);
}
