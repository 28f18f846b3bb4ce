//! Encoding of event timestamps in the `dateTime` column.
//!
//! New rows are written as RFC 3339. Older data files hold
//! `2006-01-02 15:04:05.999999999-07:00` style values, and rows edited by hand
//! may carry SQLite's own offset-less `datetime()` layout (read as UTC).

use chrono::{DateTime, NaiveDateTime, SecondsFormat};

use eventhub_domain::time::Timestamp;

const OFFSET_LAYOUTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

pub(crate) fn encode(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn decode(raw: &str) -> Result<Timestamp, sqlx::Error> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.to_utc());
    }
    for layout in OFFSET_LAYOUTS {
        if let Ok(dt) = DateTime::parse_from_str(raw, layout) {
            return Ok(dt.to_utc());
        }
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return Ok(dt.and_utc());
        }
    }
    Err(sqlx::Error::Decode(
        format!("unrecognized timestamp `{raw}`").into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ten_am() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn should_write_rfc3339_with_zulu_suffix() {
        assert_eq!(encode(ten_am()), "2025-01-01T10:00:00Z");
    }

    #[test]
    fn should_read_back_what_it_writes() {
        assert_eq!(decode(&encode(ten_am())).unwrap(), ten_am());
    }

    #[test]
    fn should_read_legacy_layout_with_offset() {
        assert_eq!(decode("2025-01-01 10:00:00+00:00").unwrap(), ten_am());
        assert_eq!(decode("2025-01-01 12:00:00.000000000+02:00").unwrap(), ten_am());
    }

    #[test]
    fn should_read_naive_layout_as_utc() {
        assert_eq!(decode("2025-01-01 10:00:00").unwrap(), ten_am());
    }

    #[test]
    fn should_fail_on_garbage() {
        assert!(decode("not a date").is_err());
    }
}
