//! Wire timestamp (de)serialization.
//!
//! The service emits ISO-8601 timestamps that are not always
//! offset-qualified (`2024-05-15T14:30:00.123456` is naive UTC).
//! Deserialization therefore accepts RFC 3339 first and falls back to the
//! naive form interpreted as UTC; serialization always writes RFC 3339.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

const NAIVE_WITH_SUBSECOND: &[time::format_description::FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const NAIVE: &[time::format_description::FormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Parses a wire timestamp, offset-qualified or naive UTC.
///
/// # Errors
///
/// Returns the RFC 3339 parse error when the value matches none of the
/// accepted shapes.
pub fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    match OffsetDateTime::parse(value, &Rfc3339) {
        Ok(parsed) => Ok(parsed),
        Err(err) => PrimitiveDateTime::parse(value, NAIVE_WITH_SUBSECOND)
            .or_else(|_| PrimitiveDateTime::parse(value, NAIVE))
            .map(PrimitiveDateTime::assume_utc)
            .map_err(|_| err),
    }
}

/// Formats a timestamp as RFC 3339.
#[must_use]
pub fn format(value: OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.unix_timestamp().to_string())
}

/// Serde codec for required wire timestamps.
///
/// Usage: `#[serde(with = "warden_core::timestamp::wire")]`.
pub mod wire {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(|err| {
            serde::de::Error::custom(format!("invalid timestamp '{raw}': {err}"))
        })
    }
}

/// Serde codec for optional wire timestamps.
///
/// Usage: `#[serde(default, with = "warden_core::timestamp::wire_opt")]`.
pub mod wire_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(inner) => serializer.serialize_some(&super::format(*inner)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) => super::parse(&raw).map(Some).map_err(|err| {
                serde::de::Error::custom(format!("invalid timestamp '{raw}': {err}"))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse("2024-05-15T14:30:00Z").unwrap();
        assert_eq!(parsed, datetime!(2024-05-15 14:30:00 UTC));

        let parsed = parse("2024-05-15T14:30:00+02:00").unwrap();
        assert_eq!(
            parsed.to_offset(time::UtcOffset::UTC),
            datetime!(2024-05-15 12:30:00 UTC)
        );
    }

    #[test]
    fn test_parse_naive_assumes_utc() {
        let parsed = parse("2024-05-15T14:30:00").unwrap();
        assert_eq!(parsed, datetime!(2024-05-15 14:30:00 UTC));

        let parsed = parse("2024-05-15T14:30:00.123456").unwrap();
        assert_eq!(parsed, datetime!(2024-05-15 14:30:00.123456 UTC));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse("not-a-date").is_err());
        assert!(parse("2024-13-01T00:00:00").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        let original = datetime!(2024-05-15 14:30:00 UTC);
        assert_eq!(parse(&format(original)).unwrap(), original);
    }
}
