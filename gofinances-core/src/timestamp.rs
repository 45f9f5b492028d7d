//! Timestamp parsing for stored transaction dates.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::transaction::TransactionError;

/// Naive layouts accepted after RFC 3339 fails. `%.f` also matches no fraction.
const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a stored `date` value into UTC.
///
/// RFC 3339 strings carry their own offset. Naive date-times are read as wall
/// clock time in `tz`, and a bare `YYYY-MM-DD` is local midnight in `tz`, so
/// the calendar day the user picked survives the round trip through UTC.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Result<DateTime<Utc>, TransactionError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, layout) {
            return localize(ndt, tz, raw);
        }
    }

    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return localize(day.and_time(NaiveTime::MIN), tz, raw);
    }

    Err(TransactionError::MalformedDate(raw.to_string()))
}

/// Resolve local wall-clock time in `tz`. Ambiguous times take the earlier
/// instant; times inside a DST gap move forward one hour.
fn localize(ndt: NaiveDateTime, tz: Tz, raw: &str) -> Result<DateTime<Utc>, TransactionError> {
    tz.from_local_datetime(&ndt)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(ndt + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TransactionError::MalformedDate(raw.to_string()))
}

/// Format a UTC timestamp the way records are written back to the store.
pub fn to_stored_string(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_keeps_instant() {
        let utc = parse_timestamp("2023-04-10T15:30:00.000Z", Tz::America__Sao_Paulo).unwrap();
        assert_eq!(to_stored_string(utc), "2023-04-10T15:30:00.000Z");

        let offset = parse_timestamp("2023-04-10T12:30:00-03:00", Tz::UTC).unwrap();
        assert_eq!(offset, utc);
    }

    #[test]
    fn test_date_only_is_local_midnight() {
        // Sao Paulo has been UTC-3 without DST since 2019
        let utc = parse_timestamp("2023-04-10", Tz::America__Sao_Paulo).unwrap();
        assert_eq!(to_stored_string(utc), "2023-04-10T03:00:00.000Z");
    }

    #[test]
    fn test_naive_datetime_forms() {
        let a = parse_timestamp("2023-04-10T08:15:00", Tz::UTC).unwrap();
        let b = parse_timestamp("2023-04-10 08:15:00.250", Tz::UTC).unwrap();
        let c = parse_timestamp("2023-04-10 08:15", Tz::UTC).unwrap();
        assert_eq!(to_stored_string(a), "2023-04-10T08:15:00.000Z");
        assert_eq!(to_stored_string(b), "2023-04-10T08:15:00.250Z");
        assert_eq!(a, c);
    }

    #[test]
    fn test_dst_gap_moves_forward() {
        // Brazil's 2018 DST started at 00:00 on Nov 4, so local midnight never happened
        let utc = parse_timestamp("2018-11-04", Tz::America__Sao_Paulo).unwrap();
        assert_eq!(to_stored_string(utc), "2018-11-04T03:00:00.000Z");
    }

    #[test]
    fn test_garbage_is_rejected() {
        for raw in ["", "Invalid Date", "10/04/2023", "2023-13-01", "2023-04-31"] {
            let err = parse_timestamp(raw, Tz::UTC).unwrap_err();
            assert_eq!(err, TransactionError::MalformedDate(raw.to_string()));
        }
    }
}
