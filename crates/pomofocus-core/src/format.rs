//! Duration formatting shared by display, export and the session log.

/// Format seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(seconds: u64) -> String {
    let hrs = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hrs:02}:{mins:02}:{secs:02}")
}

/// Format seconds as `MM:SS` for the timer readout.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Parse `HH:MM:SS` back into seconds.
///
/// Returns `None` for anything that is not three colon-separated
/// non-negative integers with minutes and seconds below 60.
pub fn parse_hms(text: &str) -> Option<u64> {
    let mut parts = text.trim().split(':');
    let hrs: u64 = parts.next()?.parse().ok()?;
    let mins: u64 = parts.next()?.parse().ok()?;
    let secs: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || mins >= 60 || secs >= 60 {
        return None;
    }
    hrs.checked_mul(3600)?
        .checked_add(mins * 60)?
        .checked_add(secs)
}
