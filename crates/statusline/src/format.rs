//! Pure presentation of a snapshot as a colored one-liner

use chrono::{DateTime, Utc};
use statusline_cache::Snapshot;

// ANSI color codes.
const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[0;31m";
const GREEN: &str = "\x1b[0;32m";
const YELLOW: &str = "\x1b[0;33m";
const MAGENTA: &str = "\x1b[0;35m";
const CYAN: &str = "\x1b[0;36m";
const DIM: &str = "\x1b[2m";

fn colorize(color: &str, text: &str) -> String {
    format!("{color}{text}{RESET}")
}

/// Indicator rendered when no snapshot is available.
#[must_use]
pub fn render_no_stack() -> String {
    colorize(YELLOW, "☁ No stack selected")
}

/// Render a snapshot as the final status line.
#[must_use]
pub fn render(snapshot: &Snapshot) -> String {
    render_at(snapshot, Utc::now())
}

/// [`render`] with an explicit clock for the relative-time segment.
#[must_use]
pub fn render_at(snapshot: &Snapshot, now: DateTime<Utc>) -> String {
    let mut parts = Vec::with_capacity(5);

    if let Some(project) = snapshot.project_name.as_deref().filter(|p| !p.is_empty()) {
        parts.push(colorize(MAGENTA, &format!("🏷️ {project}")));
    }

    parts.push(colorize(CYAN, &format!("📚 {}", snapshot.stack_name)));
    parts.push(colorize(
        CYAN,
        &pluralize(snapshot.resource_count, "resource"),
    ));

    if let Some(status) = snapshot.last_status.as_deref().filter(|s| !s.is_empty()) {
        parts.push(colorize_status(status));
    }

    if let Some(last_update) = snapshot.last_update {
        parts.push(colorize(YELLOW, &relative_time(last_update, now)));
    }

    parts.join(&colorize(DIM, " | "))
}

fn colorize_status(status: &str) -> String {
    match status {
        "succeeded" => colorize(GREEN, "✓ succeeded"),
        "failed" => colorize(RED, "✗ failed"),
        other => colorize(YELLOW, other),
    }
}

fn pluralize(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - then;
    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else {
        format!("{}d ago", diff.num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use statusline_cache::Fingerprint;

    fn snapshot() -> Snapshot {
        Snapshot {
            stack_name: "production".to_string(),
            project_name: Some("api".to_string()),
            resource_count: 7,
            last_status: Some("succeeded".to_string()),
            last_update: None,
            fetched_at: Utc::now(),
            fingerprint: Fingerprint::NEUTRAL,
        }
    }

    // ==========================================================================
    // relative_time tests
    // ==========================================================================

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        let cases = [
            (Duration::seconds(30), "just now"),
            (Duration::minutes(1), "1m ago"),
            (Duration::minutes(5), "5m ago"),
            (Duration::hours(1), "1h ago"),
            (Duration::hours(3), "3h ago"),
            (Duration::hours(25), "1d ago"),
            (Duration::days(10), "10d ago"),
        ];
        for (ago, want) in cases {
            assert_eq!(relative_time(now - ago, now), want, "{ago:?}");
        }
    }

    // ==========================================================================
    // status and pluralization
    // ==========================================================================

    #[test]
    fn status_colors() {
        assert!(colorize_status("succeeded").contains("✓ succeeded"));
        assert!(colorize_status("succeeded").starts_with(GREEN));
        assert!(colorize_status("failed").contains("✗ failed"));
        assert!(colorize_status("failed").starts_with(RED));
    }

    #[test]
    fn unknown_status_passes_through() {
        let rendered = colorize_status("in_progress");
        assert!(rendered.contains("in_progress"));
        assert!(rendered.starts_with(YELLOW));
    }

    #[test]
    fn pluralize_counts() {
        assert_eq!(pluralize(1, "resource"), "1 resource");
        assert_eq!(pluralize(0, "resource"), "0 resources");
        assert_eq!(pluralize(7, "resource"), "7 resources");
    }

    // ==========================================================================
    // render tests
    // ==========================================================================

    #[test]
    fn render_includes_all_present_fields() {
        let mut snap = snapshot();
        snap.last_update = Some(Utc::now() - Duration::minutes(5));

        let line = render(&snap);
        assert!(line.contains("🏷️ api"));
        assert!(line.contains("📚 production"));
        assert!(line.contains("7 resources"));
        assert!(line.contains("✓ succeeded"));
        assert!(line.contains("5m ago"));
    }

    #[test]
    fn render_omits_absent_fields() {
        let mut snap = snapshot();
        snap.project_name = None;
        snap.last_status = None;
        snap.last_update = None;

        let line = render(&snap);
        assert!(!line.contains("🏷️"));
        assert!(line.contains("📚 production"));
        assert!(!line.contains("ago"));
    }

    #[test]
    fn no_stack_indicator_is_yellow() {
        let line = render_no_stack();
        assert!(line.contains("☁ No stack selected"));
        assert!(line.starts_with(YELLOW));
    }
}
