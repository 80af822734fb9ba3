/// Round `value` to `decimals` places.
///
/// Values are rounded half away from zero after nudging by a relative
/// epsilon, so binary midpoints such as `2.675` round up.
///
/// # Examples
///
/// ```
/// use merge_core::formatting::round_to;
///
/// assert_eq!(round_to(485.0 / 3.0, 2), 161.67);
/// assert_eq!(round_to(2.675, 2), 2.68);
/// assert_eq!(round_to(0.0, 2), 0.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * value.abs() * factor;
    let scaled = value * factor;
    let nudged = if scaled < 0.0 {
        scaled - epsilon
    } else {
        scaled + epsilon
    };
    nudged.round() / factor
}

/// Format a sleep duration in hours with one decimal place.
///
/// # Examples
///
/// ```
/// use merge_core::formatting::format_hours;
///
/// assert_eq!(format_hours(8.0), "8.0h");
/// assert_eq!(format_hours(5.25), "5.3h");
/// ```
pub fn format_hours(hours: f64) -> String {
    format!("{:.1}h", round_to(hours, 1))
}

/// Format a duration in minutes as a human-readable string.
///
/// * `< 60` minutes → `"45m"`
/// * whole hours → `"2h"`
/// * otherwise → `"1h 30m"`
///
/// # Examples
///
/// ```
/// use merge_core::formatting::format_minutes;
///
/// assert_eq!(format_minutes(45), "45m");
/// assert_eq!(format_minutes(120), "2h");
/// assert_eq!(format_minutes(90), "1h 30m");
/// assert_eq!(format_minutes(0), "0m");
/// ```
pub fn format_minutes(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, mins)
    }
}

/// Format a fraction (`0.0..=1.0`) as a percentage with one decimal place.
///
/// # Examples
///
/// ```
/// use merge_core::formatting::format_rate;
///
/// assert_eq!(format_rate(2.0 / 3.0), "66.7%");
/// assert_eq!(format_rate(0.0), "0.0%");
/// assert_eq!(format_rate(1.0), "100.0%");
/// ```
pub fn format_rate(fraction: f64) -> String {
    format!("{:.1}%", round_to(fraction * 100.0, 1))
}

/// Insert `,` thousands separators into a whole number.
///
/// # Examples
///
/// ```
/// use merge_core::formatting::group_thousands;
///
/// assert_eq!(group_thousands(970), "970");
/// assert_eq!(group_thousands(12_345), "12,345");
/// assert_eq!(group_thousands(1_000_000), "1,000,000");
/// ```
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
