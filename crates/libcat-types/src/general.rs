use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
};

pub const STATUS_AVAILABLE: &str = "Available";
pub const STATUS_ISSUED: &str = "Issued";

/// Parses RFC 3339 timestamp or plain `YYYY-MM-DD` date (taken as midnight UTC)
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let value = value.trim();
    match OffsetDateTime::parse(value, &Rfc3339) {
        Ok(ts) => Ok(ts),
        Err(e) => Date::parse(value, format_description!("[year]-[month]-[day]"))
            .map(|d| d.midnight().assume_utc())
            .map_err(|_| e),
    }
}

/// Serde helper for optional timestamps in request bodies.
///
/// Accepts text understood by [parse_timestamp] or a number of milliseconds since Unix epoch.
pub mod lenient_timestamp {
    use serde::{Deserialize, Deserializer};
    use time::OffsetDateTime;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Millis(i64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<RawTimestamp> = Option::deserialize(deserializer)?;
        match value {
            None => Ok(None),
            Some(RawTimestamp::Text(s)) => super::parse_timestamp(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            Some(RawTimestamp::Millis(ms)) => {
                OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000)
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}

/// Serde helper for optional text fields that clients may send as numbers or booleans,
/// e.g. phone numbers. Scalars are kept in their JSON text form.
pub mod lenient_string {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        UInt(u64),
        Float(f64),
        Bool(bool),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<Scalar> = Option::deserialize(deserializer)?;
        Ok(value.map(|v| match v {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::UInt(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;
    use serde::Deserialize;
    use time::{macros::datetime, Month};

    use super::*;

    #[derive(Deserialize)]
    struct Due {
        #[serde(default, with = "lenient_timestamp")]
        due: Option<OffsetDateTime>,
    }

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp("2024-03-01T10:15:00+01:00").unwrap();
        assert_eq!(ts, datetime!(2024-03-01 09:15 UTC));
    }

    #[test]
    fn test_parse_plain_date() {
        let ts = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(ts, datetime!(2024-03-01 0:00 UTC));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_timestamp("next tuesday").is_err());
        assert!(parse_timestamp("2024-13-01").is_err());
    }

    #[test]
    fn test_lenient_deserialize() {
        let due: Due = serde_json::from_str(r#"{"due":"2024-03-01"}"#).unwrap();
        assert_eq!(due.due, Some(datetime!(2024-03-01 0:00 UTC)));
        let due: Due = serde_json::from_str(r#"{}"#).unwrap();
        assert!(due.due.is_none());
        let due: Due = serde_json::from_str(r#"{"due":null}"#).unwrap();
        assert!(due.due.is_none());
        assert!(serde_json::from_str::<Due>(r#"{"due":"whenever"}"#).is_err());
    }

    #[test]
    fn test_lenient_deserialize_epoch_millis() {
        let due: Due = serde_json::from_str(r#"{"due":1709251200000}"#).unwrap();
        assert_eq!(due.due, Some(datetime!(2024-03-01 0:00 UTC)));
        assert!(serde_json::from_str::<Due>(r#"{"due":true}"#).is_err());
    }

    #[derive(Deserialize)]
    struct Contact {
        #[serde(default, with = "lenient_string")]
        mobile: Option<String>,
    }

    #[test]
    fn test_lenient_string() {
        let mobile = |json: &str| serde_json::from_str::<Contact>(json).unwrap().mobile;
        assert_eq!(mobile(r#"{"mobile":"555-123"}"#).as_deref(), Some("555-123"));
        assert_eq!(mobile(r#"{"mobile":5551234}"#).as_deref(), Some("5551234"));
        assert_eq!(mobile(r#"{"mobile":-1}"#).as_deref(), Some("-1"));
        assert_eq!(mobile(r#"{"mobile":true}"#).as_deref(), Some("true"));
        assert_eq!(mobile(r#"{"mobile":null}"#), None);
        assert_eq!(mobile(r#"{}"#), None);
        assert!(serde_json::from_str::<Contact>(r#"{"mobile":[1]}"#).is_err());
        assert!(serde_json::from_str::<Contact>(r#"{"mobile":{"n":1}}"#).is_err());
    }

    #[quickcheck]
    fn test_any_plain_date_is_midnight_utc(year: u16, month: u8, day: u8) -> TestResult {
        let year = 1900 + (year % 200) as i32;
        let Ok(month) = Month::try_from(month % 12 + 1) else {
            return TestResult::discard();
        };
        let Ok(date) = Date::from_calendar_date(year, month, day % 31 + 1) else {
            return TestResult::discard();
        };
        let text = format!("{:04}-{:02}-{:02}", year, month as u8, date.day());
        let parsed = parse_timestamp(&text).unwrap();
        TestResult::from_bool(parsed == date.midnight().assume_utc())
    }
}
