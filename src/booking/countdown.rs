/// `m:ss` for a positive remaining time, `None` once the reservation is due.
pub fn format_remaining(remaining_ms: i64) -> Option<String> {
    if remaining_ms <= 0 {
        return None;
    }
    let minutes = remaining_ms / 60_000;
    let seconds = (remaining_ms % 60_000) / 1000;
    Some(format!("{minutes}:{seconds:02}"))
}
