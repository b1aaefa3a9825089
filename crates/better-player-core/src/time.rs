//! Playback time formatting

const TIME_UNIT: f64 = 60.0;

/// Whole seconds within the minute (0..60)
pub fn seconds(time: f64) -> u64 {
    (time % TIME_UNIT).floor() as u64
}

/// Whole minutes within the hour (0..60)
pub fn minutes(time: f64) -> u64 {
    ((time / TIME_UNIT) % TIME_UNIT).floor() as u64
}

/// Whole hours
pub fn hours(time: f64) -> u64 {
    (time / TIME_UNIT / TIME_UNIT).floor() as u64
}

/// Format seconds as `mm:ss`, or `hh:mm:ss` from one hour on.
///
/// Negative or non-finite input formats as `00:00`.
///
/// ```
/// use better_player_core::time::format_time;
///
/// assert_eq!(format_time(59.0), "00:59");
/// assert_eq!(format_time(3600.0), "01:00:00");
/// ```
pub fn format_time(time: f64) -> String {
    let time = if time.is_finite() && time > 0.0 { time } else { 0.0 };
    let hours = hours(time);
    let hour_part = if hours > 0 {
        format!("{hours:02}:")
    } else {
        String::new()
    };
    format!("{hour_part}{:02}:{:02}", minutes(time), seconds(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds() {
        assert_eq!(seconds(0.0), 0);
        assert_eq!(seconds(0.123), 0);
        assert_eq!(seconds(3.141592), 3);
        assert_eq!(seconds(59.0), 59);
        assert_eq!(seconds(60.0), 0);
        assert_eq!(seconds(77.29912), 17);
        assert_eq!(seconds(3600.0), 0);
    }

    #[test]
    fn test_minutes() {
        assert_eq!(minutes(59.0), 0);
        assert_eq!(minutes(60.0), 1);
        assert_eq!(minutes(128.0), 2);
        assert_eq!(minutes(400.93991), 6);
        assert_eq!(minutes(3600.0), 0);
        assert_eq!(minutes(3660.0), 1);
    }

    #[test]
    fn test_hours() {
        assert_eq!(hours(3599.9999), 0);
        assert_eq!(hours(3600.0), 1);
        assert_eq!(hours(360000.0), 100);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.0), "00:59");
        assert_eq!(format_time(3599.0), "59:59");
        assert_eq!(format_time(3600.0), "01:00:00");
        assert_eq!(format_time(360000.0), "100:00:00");
    }

    #[test]
    fn test_format_time_unknown_duration() {
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
        assert_eq!(format_time(-3.0), "00:00");
    }
}
