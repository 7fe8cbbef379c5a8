//! Hourly batch label generation.

/// Default batch range: 6:00 am up to (but not including) 7:00 pm.
pub const DEFAULT_START_HOUR: i32 = 6;
pub const DEFAULT_END_HOUR: i32 = 19;

/// Render an hour of day on a 12-hour clock with a lowercase am/pm
/// suffix. Hours 0 and 12 both display as `12`. The hour is reduced
/// mod 24 first, so a slot ending at 24 renders as midnight.
pub fn format_hour(hour: i32) -> String {
    let hour = hour.rem_euclid(24);
    let period = if hour >= 12 { "pm" } else { "am" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:00 {}", display, period)
}

/// Produce one `"<start> - <end>"` label per hour in `[start, end)`.
///
/// Bounds are clamped to `[0, 24]`; an inverted or empty range yields
/// an empty list rather than nonsense labels.
pub fn generate_time_slots(start_hour: i32, end_hour: i32) -> Vec<String> {
    let start = start_hour.clamp(0, 24);
    let end = end_hour.clamp(0, 24);

    (start..end)
        .map(|hour| format!("{} - {}", format_hour(hour), format_hour(hour + 1)))
        .collect()
}

/// The batch labels both dashboards selectors are populated from.
pub fn batch_labels() -> Vec<String> {
    generate_time_slots(DEFAULT_START_HOUR, DEFAULT_END_HOUR)
}
