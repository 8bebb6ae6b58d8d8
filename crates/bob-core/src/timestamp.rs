//! Serde helpers for stored timestamps.
//!
//! Files are written as RFC 3339, but older projects and hand edits carry
//! naive ISO timestamps (`2024-05-01T10:00:00.123456`) which are read as UTC.
//! An empty string in an optional field reads as `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Parse an RFC 3339 or naive ISO 8601 timestamp. Naive values are taken as UTC.
pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn deserialize<'de, D>(d: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
}

pub mod option {
    use super::parse;
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_rfc3339_and_naive_forms() {
        let rfc = parse("2024-05-01T10:00:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 8);

        let naive = parse("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!((naive.day(), naive.hour()), (1, 10));
        assert_eq!(naive.nanosecond(), 123_456_000);

        assert!(parse("2024-05-01 10:00:00").is_some());
        assert!(parse("2024-05-01").is_some());
        assert!(parse("yesterday").is_none());
    }

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(deserialize_with = "super::deserialize")]
        at: DateTime<Utc>,
        #[serde(default, deserialize_with = "option::deserialize")]
        since: Option<DateTime<Utc>>,
    }

    #[test]
    fn empty_optional_reads_as_none() {
        let s: Stamped = serde_yaml::from_str("at: '2024-05-01T10:00:00'\nsince: ''\n").unwrap();
        assert_eq!(s.at.year(), 2024);
        assert!(s.since.is_none());

        let s: Stamped = serde_yaml::from_str("at: '2024-05-01T10:00:00Z'\n").unwrap();
        assert!(s.since.is_none());

        let s: Stamped = serde_json::from_str(r#"{"at":"2024-05-01","since":null}"#).unwrap();
        assert!(s.since.is_none());
    }

    #[test]
    fn garbage_timestamp_is_an_error() {
        let err = serde_yaml::from_str::<Stamped>("at: soon\n").err().unwrap();
        assert!(err.to_string().contains("invalid timestamp 'soon'"));
    }
}
