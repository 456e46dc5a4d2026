use serde::{Deserialize, Serialize};

use crate::events::DisplayEvent;

/// User-facing message shown whenever a fetch fails, whatever the cause.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load events. Please try again later.";

/// Session-local event feed, newest fetched batch first.
///
/// Never deduplicated or truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feed {
    events: Vec<DisplayEvent>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a batch in front of everything already in the feed, keeping the
    /// batch's own order.
    pub fn prepend(&mut self, batch: Vec<DisplayEvent>) {
        self.events.splice(0..0, batch);
    }

    pub fn events(&self) -> &[DisplayEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DisplayEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<'a> IntoIterator for &'a Feed {
    type Item = &'a DisplayEvent;
    type IntoIter = std::slice::Iter<'a, DisplayEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Everything a renderer needs: the feed plus loading/error status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedState {
    pub feed: Feed,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for FeedState {
    /// Nothing fetched yet, so the state starts out loading.
    fn default() -> Self {
        Self {
            feed: Feed::new(),
            loading: true,
            error: None,
        }
    }
}

impl FeedState {
    pub fn begin_fetch(&mut self) {
        self.loading = true;
    }

    /// Merge a successfully fetched batch and clear any previous error.
    pub fn apply_batch(&mut self, batch: Vec<DisplayEvent>) {
        self.feed.prepend(batch);
        self.error = None;
    }

    /// Record a failed fetch. The feed is left untouched.
    pub fn record_failure(&mut self) {
        self.error = Some(FETCH_FAILED_MESSAGE.to_string());
    }

    pub fn finish_fetch(&mut self) {
        self.loading = false;
    }
}
