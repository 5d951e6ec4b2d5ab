//! Timestamp rendering for Discord `<t:...>` tags.
//!
//! All output is UTC with English month and weekday names, independent of
//! the host locale. The relative form uses 30-day months and 365-day years,
//! matching what the bridge has always produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Rendering style selected by the format character of a timestamp tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// No format character: `1 Jan 2024 13:37 UTC`.
    None,
    /// `t`: `13:37 UTC`.
    ShortTime,
    /// `T`: `13:37:05 UTC`.
    LongTime,
    /// `d`: `01/01/2024 UTC`.
    ShortDate,
    /// `D`: `01 January 2024 UTC`.
    LongDate,
    /// `f`: `01 January 2024 13:37 UTC`.
    ShortDateTime,
    /// `F`: `Monday, 01 January 2024 13:37 UTC`.
    LongDateTime,
    /// `R`: `3 days ago`, `in 2 hours`.
    Relative,
    /// Any other format character, echoed back verbatim.
    Unknown(char),
}

impl TimestampFormat {
    /// Maps a tag format character to a format.
    ///
    /// # Examples
    ///
    /// ```
    /// use vplink::markup::TimestampFormat;
    ///
    /// assert_eq!(TimestampFormat::from_char('R'), TimestampFormat::Relative);
    /// assert_eq!(TimestampFormat::from_char('x'), TimestampFormat::Unknown('x'));
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Self {
        match c {
            't' => Self::ShortTime,
            'T' => Self::LongTime,
            'd' => Self::ShortDate,
            'D' => Self::LongDate,
            'f' => Self::ShortDateTime,
            'F' => Self::LongDateTime,
            'R' => Self::Relative,
            other => Self::Unknown(other),
        }
    }

    /// Returns the tag format character, if this format has one.
    #[must_use]
    pub const fn as_char(self) -> Option<char> {
        match self {
            Self::None => None,
            Self::ShortTime => Some('t'),
            Self::LongTime => Some('T'),
            Self::ShortDate => Some('d'),
            Self::LongDate => Some('D'),
            Self::ShortDateTime => Some('f'),
            Self::LongDateTime => Some('F'),
            Self::Relative => Some('R'),
            Self::Unknown(c) => Some(c),
        }
    }

    /// `strftime` pattern for the fixed formats, which all carry a `UTC` suffix.
    const fn clock_pattern(self) -> Option<&'static str> {
        match self {
            Self::None => Some("%-d %b %Y %H:%M"),
            Self::ShortTime => Some("%H:%M"),
            Self::LongTime => Some("%H:%M:%S"),
            Self::ShortDate => Some("%d/%m/%Y"),
            Self::LongDate => Some("%d %B %Y"),
            Self::ShortDateTime => Some("%d %B %Y %H:%M"),
            Self::LongDateTime => Some("%A, %d %B %Y %H:%M"),
            Self::Relative | Self::Unknown(_) => None,
        }
    }
}

/// Formats the date/time body of a fixed format, without the `UTC` suffix.
///
/// Returns `None` for [`TimestampFormat::Relative`] and
/// [`TimestampFormat::Unknown`], which have no clock body.
#[must_use]
pub fn format_clock(instant: DateTime<Utc>, format: TimestampFormat) -> Option<String> {
    format
        .clock_pattern()
        .map(|pattern| instant.format(pattern).to_string())
}

/// Formats an instant in the given style, measuring relative forms from now.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use vplink::markup::{TimestampFormat, format_timestamp};
///
/// let instant = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
/// assert_eq!(
///     format_timestamp(instant, TimestampFormat::ShortDate),
///     "14/11/2023 UTC"
/// );
/// ```
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>, format: TimestampFormat) -> String {
    format_timestamp_at(instant, format, Utc::now())
}

/// Formats an instant in the given style with an explicit reference instant.
#[must_use]
pub fn format_timestamp_at(
    instant: DateTime<Utc>,
    format: TimestampFormat,
    now: DateTime<Utc>,
) -> String {
    match format {
        TimestampFormat::Relative => format_relative(instant, now),
        TimestampFormat::Unknown(c) => format!("<t:{}:{c}>", instant.timestamp()),
        _ => format_clock(instant, format)
            .map_or_else(String::new, |body| format!("{body} UTC")),
    }
}

/// Renders the humanized distance between `instant` and `now`.
///
/// Magnitude is truncated, never rounded. The unit is pluralized only when
/// the value is greater than one.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use vplink::markup::format_relative;
///
/// let now = Utc::now();
/// assert_eq!(format_relative(now - Duration::seconds(90), now), "1 minute ago");
/// assert_eq!(format_relative(now + Duration::days(400), now), "in 1 year");
/// ```
#[must_use]
pub fn format_relative(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(instant).num_milliseconds();
    let is_future = delta < 0;
    let millis = delta.unsigned_abs();

    let days = millis / MILLIS_PER_DAY;
    let (value, unit) = if days >= 365 {
        (days / 365, "year")
    } else if days >= 30 {
        (days / 30, "month")
    } else if days >= 1 {
        (days, "day")
    } else if millis >= MILLIS_PER_HOUR {
        (millis / MILLIS_PER_HOUR, "hour")
    } else if millis >= MILLIS_PER_MINUTE {
        (millis / MILLIS_PER_MINUTE, "minute")
    } else {
        (millis / MILLIS_PER_SECOND, "second")
    };

    let suffix = if value > 1 { "s" } else { "" };
    if is_future {
        format!("in {value} {unit}{suffix}")
    } else {
        format!("{value} {unit}{suffix} ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use test_case::test_case;

    fn instant() -> DateTime<Utc> {
        // Tuesday 14 November 2023 22:13:20 UTC
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test_case(TimestampFormat::None, "14 Nov 2023 22:13 UTC" ; "none")]
    #[test_case(TimestampFormat::ShortTime, "22:13 UTC" ; "short time")]
    #[test_case(TimestampFormat::LongTime, "22:13:20 UTC" ; "long time")]
    #[test_case(TimestampFormat::ShortDate, "14/11/2023 UTC" ; "short date")]
    #[test_case(TimestampFormat::LongDate, "14 November 2023 UTC" ; "long date")]
    #[test_case(TimestampFormat::ShortDateTime, "14 November 2023 22:13 UTC" ; "short date time")]
    #[test_case(TimestampFormat::LongDateTime, "Tuesday, 14 November 2023 22:13 UTC" ; "long date time")]
    #[test_case(TimestampFormat::Unknown('x'), "<t:1700000000:x>" ; "unknown")]
    fn test_fixed_formats(format: TimestampFormat, expected: &str) {
        assert_eq!(format_timestamp(instant(), format), expected);
    }

    #[test]
    fn test_none_format_does_not_pad_day() {
        let instant = DateTime::from_timestamp(1_704_067_200, 0).unwrap(); // 1 Jan 2024
        assert_eq!(
            format_timestamp(instant, TimestampFormat::None),
            "1 Jan 2024 00:00 UTC"
        );
        assert_eq!(
            format_timestamp(instant, TimestampFormat::LongDate),
            "01 January 2024 UTC"
        );
    }

    #[test_case(-Duration::seconds(10), "10 seconds ago" ; "seconds")]
    #[test_case(-Duration::seconds(1), "1 second ago" ; "one second")]
    #[test_case(Duration::zero(), "0 second ago" ; "zero")]
    #[test_case(-Duration::seconds(90), "1 minute ago" ; "ninety seconds")]
    #[test_case(-Duration::minutes(59), "59 minutes ago" ; "minutes")]
    #[test_case(-Duration::minutes(150), "2 hours ago" ; "hours")]
    #[test_case(-Duration::days(2), "2 days ago" ; "days")]
    #[test_case(-Duration::days(29), "29 days ago" ; "below a month")]
    #[test_case(-Duration::days(45), "1 month ago" ; "one month")]
    #[test_case(-Duration::days(364), "12 months ago" ; "below a year")]
    #[test_case(-Duration::days(800), "2 years ago" ; "years")]
    #[test_case(Duration::seconds(30), "in 30 seconds" ; "future seconds")]
    #[test_case(Duration::hours(5), "in 5 hours" ; "future hours")]
    #[test_case(Duration::days(400), "in 1 year" ; "future year")]
    fn test_relative(offset: Duration, expected: &str) {
        let now = instant();
        assert_eq!(format_relative(now + offset, now), expected);
    }

    #[test]
    fn test_relative_truncates_partial_units() {
        let now = instant();
        let then = now - Duration::hours(47) - Duration::minutes(59);
        assert_eq!(format_relative(then, now), "1 day ago");
    }

    #[test]
    fn test_format_timestamp_at_relative() {
        let now = instant();
        let then = now - Duration::days(3);
        assert_eq!(
            format_timestamp_at(then, TimestampFormat::Relative, now),
            "3 days ago"
        );
    }

    #[test]
    fn test_format_clock_has_no_suffix() {
        assert_eq!(
            format_clock(instant(), TimestampFormat::ShortTime).as_deref(),
            Some("22:13")
        );
        assert!(format_clock(instant(), TimestampFormat::Relative).is_none());
        assert!(format_clock(instant(), TimestampFormat::Unknown('q')).is_none());
    }

    #[test]
    fn test_format_char_round_trip() {
        for c in ['t', 'T', 'd', 'D', 'f', 'F', 'R', 'z'] {
            assert_eq!(TimestampFormat::from_char(c).as_char(), Some(c));
        }
        assert_eq!(TimestampFormat::None.as_char(), None);
    }
}
