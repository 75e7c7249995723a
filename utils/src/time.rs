//! Time formatting helpers.

use datafutures_types::Timestamp;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// "expires in 6d 23h" while active, "expired 2h 5m ago" afterwards.
pub fn describe_expiry(expires_at: Timestamp, now: Timestamp) -> String {
    if now < expires_at {
        format!("expires in {}", format_duration(expires_at.remaining_from(now)))
    } else {
        format!("expired {} ago", format_duration(expires_at.elapsed_since(now)))
    }
}
