//! Countdown rendering.

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_DAY: u64 = 86_400;

/// Hours at which the seconds component is dropped.
const COARSE_HOURS: u64 = 6;

/// Render a second count as a tiered countdown string.
///
/// | magnitude      | format        |
/// |----------------|---------------|
/// | >= 1 day       | `1d 2h 3m`    |
/// | >= 6 hours     | `7h 8m`       |
/// | >= 1 hour      | `1h 2m 3s`    |
/// | >= 1 minute    | `4:05`        |
/// | otherwise      | `9s`          |
pub fn format_time_remaining(total_seconds: u64) -> String {
    let days = total_seconds / SECONDS_PER_DAY;
    let hours = (total_seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_seconds % SECONDS_PER_MINUTE;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours >= COARSE_HOURS {
        format!("{}h {}m", hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}:{:02}", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_only() {
        assert_eq!(format_time_remaining(0), "0s");
        assert_eq!(format_time_remaining(59), "59s");
    }

    #[test]
    fn test_minutes_and_padded_seconds() {
        assert_eq!(format_time_remaining(60), "1:00");
        assert_eq!(format_time_remaining(90), "1:30");
        assert_eq!(format_time_remaining(605), "10:05");
        assert_eq!(format_time_remaining(3599), "59:59");
    }

    #[test]
    fn test_hours_with_seconds_below_six_hours() {
        assert_eq!(format_time_remaining(3600), "1h 0m 0s");
        assert_eq!(format_time_remaining(3661), "1h 1m 1s");
        assert_eq!(format_time_remaining(6 * 3600 - 1), "5h 59m 59s");
    }

    #[test]
    fn test_hours_without_seconds_from_six_hours() {
        assert_eq!(format_time_remaining(6 * 3600), "6h 0m");
        assert_eq!(format_time_remaining(23 * 3600 + 59 * 60 + 59), "23h 59m");
    }

    #[test]
    fn test_days() {
        assert_eq!(format_time_remaining(86_400), "1d 0h 0m");
        assert_eq!(format_time_remaining(25 * 3600), "1d 1h 0m");
        assert_eq!(format_time_remaining(3 * 86_400 + 7 * 3600 + 42 * 60 + 9), "3d 7h 42m");
    }
}
