use chrono::NaiveDate;

const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Display format for stored dates, e.g. "Mar 5, 2024"
const DATE_DISPLAY_FORMAT: &str = "%b %-d, %Y";

/// Format a byte count with 1024-based units and at most one decimal.
/// Values past the gigabyte range stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0} {}", rounded, BYTE_UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, BYTE_UNITS[unit])
    }
}

/// Format a percentage with one decimal
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        return dt.format(DATE_DISPLAY_FORMAT).to_string();
    }
    // Naive timestamps ("2024-03-05 10:00:00") and bare dates
    match date.get(..10).map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d")) {
        Some(Ok(day)) => day.format(DATE_DISPLAY_FORMAT).to_string(),
        _ => date.to_string(),
    }
}
