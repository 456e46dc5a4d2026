use hookfeed_core::FeedState;

pub const TITLE: &str = "GitHub Webhook Events";

/// Plain-text view of the feed state.
pub fn render(state: &FeedState) -> String {
    let mut lines = vec![TITLE.to_string(), "=".repeat(TITLE.len())];

    if let Some(error) = &state.error {
        lines.push(format!("! {error}"));
    }

    if state.feed.is_empty() {
        let placeholder = if state.loading {
            "Loading events..."
        } else {
            "No events yet."
        };
        lines.push(placeholder.to_string());
    } else {
        lines.extend(state.feed.iter().map(|e| format!("- {}", e.display_text())));
    }

    lines.join("\n")
}
