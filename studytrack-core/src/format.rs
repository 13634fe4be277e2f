//! Formatting helpers shared by the CLI and the analytics labels.

/// English month name for a 1-based month.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Short weekday name for an ISO weekday (Monday = 1).
pub fn weekday_name(weekday: u32) -> &'static str {
    match weekday {
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        7 => "Sun",
        _ => "???",
    }
}

/// Format hours with one decimal (e.g., "3.5h").
pub fn format_hours(hours: f64) -> String {
    format!("{:.1}h", hours)
}

/// Format a percentage with no decimals (e.g., "42%").
pub fn format_percent(percent: f64) -> String {
    format!("{:.0}%", percent)
}

/// Proportional bar of `width` cells for a 0-100 percentage.
pub fn bar(percent: f64, width: usize) -> String {
    let clamped = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
