use std::collections::HashMap;

use crate::types::{Event, EventType};

pub fn group_events_by_type(events: &[Event]) -> HashMap<EventType, Vec<Event>> {
    let mut grouped = HashMap::new();
    for event in events {
        let event_type = EventType::from(event);
        grouped
            .entry(event_type)
            .or_insert_with(Vec::new)
            .push(event.clone());
    }

    grouped
}

/// Checks that exactly `count` events of each given type were observed.
pub fn check_events_count(events: &[Event], conditions: Vec<(EventType, u64)>) -> bool {
    let grouped_events = group_events_by_type(events);

    conditions.into_iter().all(|(event_type, count)| {
        grouped_events
            .get(&event_type)
            .map(|inner| inner.len() == count as usize)
            .unwrap_or(false)
    })
}

/// Checks that at least `count` events of each given type were observed.
///
/// Most scenarios keep producing events until shutdown, so tests usually wait for
/// a minimum count instead of an exact one.
pub fn check_min_events_count(events: &[Event], conditions: Vec<(EventType, u64)>) -> bool {
    let grouped_events = group_events_by_type(events);

    conditions.into_iter().all(|(event_type, count)| {
        grouped_events
            .get(&event_type)
            .map(|inner| inner.len() as u64 >= count)
            .unwrap_or(count == 0)
    })
}

/// Returns the number of observed events of the given type.
pub fn count_events_of_type(events: &[Event], event_type: &EventType) -> u64 {
    events
        .iter()
        .filter(|event| EventType::from(*event) == *event_type)
        .count() as u64
}

/// Returns the maximum number of seekers that were in service at the same time.
///
/// The count goes up on [`Event::EnteredService`] and down on [`Event::Serviced`].
/// Since each seeker emits those two events from within its claimed service slot,
/// the maximum over the whole run is the peak service slot occupancy.
pub fn max_concurrent_in_service(events: &[Event]) -> u64 {
    let mut current: u64 = 0;
    let mut max_seen: u64 = 0;

    for event in events {
        match event {
            Event::EnteredService(_) => {
                current += 1;
                max_seen = max_seen.max(current);
            }
            Event::Serviced(_) => {
                current = current.saturating_sub(1);
            }
            _ => {}
        }
    }

    max_seen
}
