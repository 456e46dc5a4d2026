pub mod events;
pub mod feed;
pub mod format;

pub use events::{Action, DisplayEvent, RawEvent};
pub use feed::{FETCH_FAILED_MESSAGE, Feed, FeedState};
pub use format::{Rejection, format_notification, format_records, validate};

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::{Action, DisplayEvent, RawEvent};

    /// Timestamp shared by the helper events: 5th March 2024, 10:00 UTC.
    pub const TEST_TIMESTAMP: &str = "2024-03-05T10:00:00Z";

    /// A valid PUSH record from `author` to `to_branch`.
    pub fn push_event(author: &str, to_branch: &str) -> RawEvent {
        RawEvent {
            action: Some(Action::Push),
            author: Some(author.to_string()),
            from_branch: None,
            to_branch: Some(to_branch.to_string()),
            timestamp: Some(TEST_TIMESTAMP.to_string()),
            request_id: Some(format!("push-{author}")),
        }
    }

    /// A valid PULL_REQUEST record.
    pub fn pull_request_event(author: &str, from_branch: &str, to_branch: &str) -> RawEvent {
        RawEvent {
            action: Some(Action::PullRequest),
            author: Some(author.to_string()),
            from_branch: Some(from_branch.to_string()),
            to_branch: Some(to_branch.to_string()),
            timestamp: Some(TEST_TIMESTAMP.to_string()),
            request_id: Some(format!("pr-{author}")),
        }
    }

    /// A valid MERGE record.
    pub fn merge_event(author: &str, from_branch: &str, to_branch: &str) -> RawEvent {
        RawEvent {
            action: Some(Action::Merge),
            ..pull_request_event(author, from_branch, to_branch)
        }
    }

    /// A record the formatter rejects (no author).
    pub fn invalid_event() -> RawEvent {
        RawEvent {
            author: None,
            ..push_event("nobody", "main")
        }
    }

    /// Wrap a record that is known to be valid.
    pub fn display_event(raw: RawEvent) -> DisplayEvent {
        DisplayEvent::try_from(raw).expect("helper event should be valid")
    }
}
