//! Shared JSON encoding/decoding contract.
//!
//! Wire keys are snake_case. Rust field names already are, so serde's
//! default naming is the key-casing conversion in both directions.
//! Timestamps use [`timestamp`] (nine fractional digits, explicit offset).

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{OllamaKitError, Result};

/// Encode a request payload into a JSON body.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(OllamaKitError::Encode)
}

/// Decode one complete JSON document into `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(OllamaKitError::Decode)
}

/// Serde adapter for server timestamps.
///
/// Decodes `yyyy-MM-ddTHH:mm:ss.SSSSSSSSS±hh:mm` (any fractional precision,
/// `Z` accepted for UTC) into UTC. Encodes with nine fractional digits and an
/// explicit `+00:00` offset.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Format a UTC timestamp the way the server does.
    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Nanos, false)
    }

    /// Parse a server timestamp, normalising it to UTC.
    pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Same contract for optional fields; pair with `#[serde(default)]`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_str(&super::format(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
