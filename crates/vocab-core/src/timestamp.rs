//! Storage encoding for timestamps and calendar-day windows.

use thiserror::Error;
use time::error::IndeterminateOffset;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Failure to encode or decode a stored timestamp.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The value could not be rendered in the storage format.
    #[error("failed to format timestamp: {0}")]
    Format(#[from] time::error::Format),
    /// The stored text matched none of the accepted layouts.
    #[error("unrecognized timestamp '{0}'")]
    Parse(String),
}

/// Render `ts` as fixed-width UTC text (`YYYY-MM-DDTHH:MM:SS.ffffffZ`).
///
/// Every encoded value has the same width, so comparing the text compares the instants.
///
/// # Errors
/// Returns an error if the timestamp falls outside the four-digit year range.
pub fn encode(ts: OffsetDateTime) -> Result<String, TimestampError> {
    let utc = ts.to_offset(UtcOffset::UTC);
    Ok(utc.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
    ))?)
}

/// Parse a stored timestamp.
///
/// Besides the layout produced by [`encode`], this accepts:
/// - RFC 3339 with any offset,
/// - `YYYY-MM-DD HH:MM:SS[.fff...]±hh:mm` as written by other `SQLite` drivers,
/// - `YYYY-MM-DD HH:MM:SS[.fff...]` without an offset, read as UTC (`CURRENT_TIMESTAMP`).
///
/// # Errors
/// Returns [`TimestampError::Parse`] when no layout matches.
pub fn decode(raw: &str) -> Result<OffsetDateTime, TimestampError> {
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(parsed.to_offset(UtcOffset::UTC));
    }
    if let Ok(parsed) = OffsetDateTime::parse(
        raw,
        format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory]:[offset_minute]"
        ),
    ) {
        return Ok(parsed.to_offset(UtcOffset::UTC));
    }
    PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"),
    )
    .map(PrimitiveDateTime::assume_utc)
    .map_err(|_| TimestampError::Parse(raw.to_owned()))
}

/// Current time truncated to the microsecond precision kept in storage.
#[must_use]
pub fn now() -> OffsetDateTime {
    truncate_to_micros(OffsetDateTime::now_utc())
}

/// Drop sub-microsecond precision so values survive an encode/decode cycle unchanged.
#[must_use]
pub fn truncate_to_micros(ts: OffsetDateTime) -> OffsetDateTime {
    let micros = ts.microsecond();
    ts.replace_microsecond(micros).unwrap_or(ts)
}

/// One calendar day in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDay {
    date: Date,
    offset: UtcOffset,
}

impl LocalDay {
    /// The current day in the system's local time zone.
    ///
    /// # Errors
    /// Returns an error when the platform cannot report the local offset safely.
    pub fn today() -> Result<Self, IndeterminateOffset> {
        let offset = UtcOffset::current_local_offset()?;
        Ok(Self::containing(OffsetDateTime::now_utc(), offset))
    }

    /// The current day in UTC.
    #[must_use]
    pub fn today_utc() -> Self {
        Self::containing(OffsetDateTime::now_utc(), UtcOffset::UTC)
    }

    /// The day in `offset` that contains `instant`.
    #[must_use]
    pub fn containing(instant: OffsetDateTime, offset: UtcOffset) -> Self {
        Self {
            date: instant.to_offset(offset).date(),
            offset,
        }
    }

    /// Calendar date of this day.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.date
    }

    /// First instant of the day (inclusive).
    #[must_use]
    pub fn start(&self) -> OffsetDateTime {
        self.date.midnight().assume_offset(self.offset)
    }

    /// First instant of the following day (exclusive).
    #[must_use]
    pub fn end(&self) -> OffsetDateTime {
        self.start() + Duration::days(1)
    }

    /// Whether `ts` falls within this day.
    #[must_use]
    pub fn contains(&self, ts: OffsetDateTime) -> bool {
        ts >= self.start() && ts < self.end()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    #[test]
    fn encode_is_fixed_width_utc() {
        let ts = datetime!(2024-03-05 09:07:01.5 +09:00);
        let text = encode(ts).expect("encode");
        assert_eq!(text, "2024-03-05T00:07:01.500000Z");
    }

    #[test]
    fn encoded_order_matches_chronological_order() {
        let earlier = datetime!(2024-03-05 10:00:05 UTC);
        let later = datetime!(2024-03-05 10:00:05.25 UTC);
        let a = encode(earlier).expect("encode");
        let b = encode(later).expect("encode");
        assert!(a < b);
    }

    #[test]
    fn decode_reverses_encode() {
        let ts = truncate_to_micros(OffsetDateTime::now_utc());
        let text = encode(ts).expect("encode");
        assert_eq!(decode(&text).expect("decode"), ts);
    }

    #[test]
    fn decode_accepts_sqlite_default_layout() {
        let ts = decode("2024-01-02 03:04:05").expect("decode");
        assert_eq!(ts, datetime!(2024-01-02 03:04:05 UTC));
    }

    #[test]
    fn decode_accepts_default_layout_with_fraction() {
        let ts = decode("2024-01-02 03:04:05.250").expect("decode");
        assert_eq!(ts, datetime!(2024-01-02 03:04:05.25 UTC));
    }

    #[test]
    fn decode_accepts_driver_layout_with_offset() {
        let ts = decode("2024-10-17 12:34:56.123456789+09:00").expect("decode");
        assert_eq!(ts, datetime!(2024-10-17 03:34:56.123456789 UTC));
        assert_eq!(ts.offset(), UtcOffset::UTC);
    }

    #[test]
    fn decode_accepts_driver_layout_without_fraction() {
        let ts = decode("2024-10-17 00:30:00-05:00").expect("decode");
        assert_eq!(ts, datetime!(2024-10-17 05:30 UTC));
    }

    #[test]
    fn decode_accepts_rfc3339_with_offset() {
        let ts = decode("2024-10-17T12:34:56.5+02:00").expect("decode");
        assert_eq!(ts, datetime!(2024-10-17 10:34:56.5 UTC));
        assert_eq!(decode("2024-10-17T10:34:56Z").expect("decode"), datetime!(2024-10-17 10:34:56 UTC));
    }

    #[test]
    fn decode_rejects_unknown_layout() {
        let Err(err) = decode("yesterday") else {
            panic!("expected parse failure");
        };
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn local_day_uses_offset_for_date() {
        let instant = datetime!(2024-06-30 23:30 UTC);
        let day = LocalDay::containing(instant, offset!(+2));
        assert_eq!(day.date(), date!(2024-07-01));
        assert_eq!(day.start(), datetime!(2024-06-30 22:00 UTC));
        assert_eq!(day.end(), datetime!(2024-07-01 22:00 UTC));
    }

    #[test]
    fn local_day_window_is_half_open() {
        let day = LocalDay::containing(datetime!(2024-06-30 12:00 UTC), UtcOffset::UTC);
        assert!(day.contains(datetime!(2024-06-30 00:00 UTC)));
        assert!(day.contains(datetime!(2024-06-30 23:59:59.999999 UTC)));
        assert!(!day.contains(datetime!(2024-07-01 00:00 UTC)));
        assert!(!day.contains(datetime!(2024-06-29 23:59:59 UTC)));
    }
}
