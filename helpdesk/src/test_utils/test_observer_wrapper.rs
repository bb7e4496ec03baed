use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{Notify, RwLock};

use crate::error::HelpdeskResult;
use crate::observer::Observer;
use crate::test_utils::event::{check_events_count, check_min_events_count};
use crate::test_utils::notify::TimedNotify;
use crate::types::{Event, EventType};

type EventCondition = Box<dyn Fn(&[Event]) -> bool + Send + Sync>;

struct Inner<O> {
    wrapped_observer: O,
    events: Vec<Event>,
    event_conditions: Vec<(EventCondition, Arc<Notify>)>,
    shutdown_called: bool,
}

impl<O> Inner<O> {
    fn check_conditions(&mut self) {
        let events = self.events.clone();
        self.event_conditions.retain(|(condition, notify)| {
            let should_retain = !condition(&events);
            if !should_retain {
                notify.notify_one();
            }
            should_retain
        });
    }
}

/// Test wrapper for [`Observer`] implementations that records every event.
///
/// [`TestObserverWrapper`] wraps any observer implementation and keeps a copy of
/// each event flowing through it. Tests can register conditions on the recorded
/// events and wait for them with a timeout, which makes assertions on a running
/// supervisor deterministic without polling or sleeping.
#[derive(Clone)]
pub struct TestObserverWrapper<O> {
    inner: Arc<RwLock<Inner<O>>>,
}

impl<O: fmt::Debug> fmt::Debug for TestObserverWrapper<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = tokio::task::block_in_place(move || {
            Handle::current().block_on(async move { self.inner.read().await })
        });
        f.debug_struct("TestObserverWrapper")
            .field("wrapped_observer", &inner.wrapped_observer)
            .field("events", &inner.events)
            .finish()
    }
}

impl<O> TestObserverWrapper<O> {
    /// Creates a new test wrapper around any observer implementation.
    ///
    /// The wrapper records every event delivered to the observer, enabling
    /// assertions on the full event stream of a run.
    pub fn wrap(observer: O) -> Self {
        let inner = Inner {
            wrapped_observer: observer,
            events: Vec::new(),
            event_conditions: Vec::new(),
            shutdown_called: false,
        };

        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Get all events that have been observed.
    pub async fn get_events(&self) -> Vec<Event> {
        self.inner.read().await.events.clone()
    }

    /// Registers a notification that fires when events match a specific condition.
    ///
    /// Returns a [`TimedNotify`] that will automatically timeout after 30 seconds if the
    /// condition is not met. This prevents tests from hanging indefinitely.
    pub async fn notify_on_events<F>(&self, condition: F) -> TimedNotify
    where
        F: Fn(&[Event]) -> bool + Send + Sync + 'static,
    {
        let notify = Arc::new(Notify::new());
        let mut inner = self.inner.write().await;
        inner
            .event_conditions
            .push((Box::new(condition), notify.clone()));

        // Check conditions immediately in case they're already satisfied
        inner.check_conditions();

        TimedNotify::new(notify)
    }

    /// Registers a notification that fires when exactly the given number of events of
    /// each type was observed.
    ///
    /// Returns a [`TimedNotify`] that will automatically timeout after 30 seconds if the
    /// expected event count is not reached. This prevents tests from hanging indefinitely.
    pub async fn wait_for_events_count(&self, conditions: Vec<(EventType, u64)>) -> TimedNotify {
        self.notify_on_events(move |events| check_events_count(events, conditions.clone()))
            .await
    }

    /// Registers a notification that fires once at least the given number of events of
    /// each type was observed.
    ///
    /// Returns a [`TimedNotify`] that will automatically timeout after 30 seconds if the
    /// expected event count is not reached. This prevents tests from hanging indefinitely.
    pub async fn wait_for_min_events_count(
        &self,
        conditions: Vec<(EventType, u64)>,
    ) -> TimedNotify {
        self.notify_on_events(move |events| check_min_events_count(events, conditions.clone()))
            .await
    }

    pub async fn clear_events(&self) {
        let mut inner = self.inner.write().await;
        inner.events.clear();
    }

    /// Returns whether the shutdown method was called on the observer.
    pub async fn shutdown_called(&self) -> bool {
        self.inner.read().await.shutdown_called
    }
}

impl<O> Observer for TestObserverWrapper<O>
where
    O: Observer + Send + Sync + Clone,
{
    fn name() -> &'static str {
        "wrapper"
    }

    async fn observe(&self, event: Event) -> HelpdeskResult<()> {
        let observer = {
            let inner = self.inner.read().await;
            inner.wrapped_observer.clone()
        };

        let result = observer.observe(event.clone()).await;

        {
            let mut inner = self.inner.write().await;
            if result.is_ok() {
                inner.events.push(event);
            }

            inner.check_conditions();
        }

        result
    }

    async fn shutdown(&self) -> HelpdeskResult<()> {
        let observer = {
            let inner = self.inner.read().await;
            inner.wrapped_observer.clone()
        };

        let result = observer.shutdown().await;

        {
            let mut inner = self.inner.write().await;
            inner.shutdown_called = true;
        }

        result
    }
}
