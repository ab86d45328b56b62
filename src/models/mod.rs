pub mod audit;
pub mod collection;
pub mod pickup;
pub mod user;

use chrono::{DateTime, Utc};

/// Display format used wherever scheduled times are shown to people,
/// e.g. "7 August 2026".
pub fn format_display_date(time: DateTime<Utc>) -> String {
    time.format("%-d %B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn display_date_has_no_leading_zero() {
        let time = Utc.with_ymd_and_hms(2026, 8, 7, 10, 30, 0).unwrap();
        assert_eq!(format_display_date(time), "7 August 2026");
    }

    #[test]
    fn display_date_double_digit_day() {
        let time = Utc.with_ymd_and_hms(2025, 12, 25, 0, 0, 0).unwrap();
        assert_eq!(format_display_date(time), "25 December 2025");
    }
}
