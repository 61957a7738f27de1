//! ISO 8601 video duration parsing
//!
//! The videos endpoint reports `contentDetails.duration` as `PT#H#M#S`.
//! Only the time part is understood; anything else parses to zero.

use regex::Regex;

/// Converts a `PT#H#M#S` duration to whole seconds
///
/// Absent components count as zero. Input that does not start with `PT`
/// returns 0. Totals too large for `u64` saturate at `u64::MAX`.
///
/// # Example
/// ```
/// use tubescout_core::parse_duration;
/// assert_eq!(parse_duration("PT1H2M3S"), 3723);
/// assert_eq!(parse_duration("PT45S"), 45);
/// assert_eq!(parse_duration("P1D"), 0);
/// ```
pub fn parse_duration(text: &str) -> u64 {
    if !text.starts_with("PT") {
        return 0;
    }

    component(r"([0-9]+)H", text)
        .saturating_mul(3600)
        .saturating_add(component(r"([0-9]+)M", text).saturating_mul(60))
        .saturating_add(component(r"([0-9]+)S", text))
}

/// Number captured by `pattern`, 0 when absent; digits beyond `u64` saturate
fn component(pattern: &str, text: &str) -> u64 {
    if let Ok(re) = Regex::new(pattern)
        && let Some(caps) = re.captures(text)
        && let Some(m) = caps.get(1)
    {
        return m.as_str().parse::<u64>().unwrap_or(u64::MAX);
    }
    0
}
