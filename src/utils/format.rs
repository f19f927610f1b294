//! Display formatting helpers shared by the watch and grid surfaces.

/// Format a runtime in minutes as "2h 15m" (or "45m" below an hour).
pub fn runtime_label(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, rest)
    } else {
        format!("{}m", rest)
    }
}

/// Format a runtime in minutes as a "m:ss" track clock, the label shown
/// at the right end of the progress bar.
pub fn track_clock(minutes: u32) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}
