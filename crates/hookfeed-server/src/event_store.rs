use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use hookfeed_core::events::{Action, RawEvent};

/// Default maximum number of events stored before oldest are evicted.
pub const DEFAULT_MAX_STORED_EVENTS: usize = 500;

/// A normalized webhook event as kept by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    pub request_id: Option<String>,
    pub author: String,
    pub action: Action,
    pub from_branch: Option<String>,
    pub to_branch: String,
    pub timestamp: DateTime<Utc>,
}

impl StoredEvent {
    /// Wire form served on the notifications endpoint.
    pub fn to_raw(&self) -> RawEvent {
        RawEvent {
            action: Some(self.action.clone()),
            author: Some(self.author.clone()),
            from_branch: self.from_branch.clone(),
            to_branch: Some(self.to_branch.clone()),
            timestamp: Some(self.timestamp.to_rfc3339()),
            request_id: self.request_id.clone(),
        }
    }
}

/// In-memory, bounded event store with a last-fetch cursor.
pub struct EventStore {
    events: VecDeque<StoredEvent>,
    last_fetch: Option<DateTime<Utc>>,
    max_stored_events: usize,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_STORED_EVENTS)
    }

    pub fn with_capacity(max_stored_events: usize) -> Self {
        Self {
            events: VecDeque::new(),
            last_fetch: None,
            max_stored_events,
        }
    }

    /// Insert a new event. Evicts the oldest event if at capacity.
    pub fn insert(&mut self, event: StoredEvent) {
        self.events.push_back(event);
        while self.events.len() > self.max_stored_events {
            self.events.pop_front();
        }
    }

    /// Events newer than the cursor, newest first. Advances the cursor to the
    /// newest returned timestamp.
    ///
    /// Events that arrive with a timestamp at or before the cursor are never
    /// returned.
    pub fn take_new(&mut self) -> Vec<StoredEvent> {
        let mut fresh: Vec<StoredEvent> = self
            .events
            .iter()
            .filter(|e| self.last_fetch.is_none_or(|cursor| e.timestamp > cursor))
            .cloned()
            .collect();
        fresh.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        if let Some(newest) = fresh.first() {
            self.last_fetch = Some(newest.timestamp);
        }
        fresh
    }

    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.last_fetch
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
