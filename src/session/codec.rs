// src/session/codec.rs — Session record file format
//
// One JSON object per file:
//   { "name": "...", "time": "<ISO-8601>", "messages": [{"role", "content"}, ...] }
// These three keys and the message shape are the only persisted contract.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;

use super::SessionRecord;
use crate::infra::errors::ProfessorError;

/// Name and timestamp of a record, decoded without materializing messages.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordHeader {
    pub name: String,
    #[serde(rename = "time", with = "timestamp")]
    pub last_modified: DateTime<Utc>,
    // Required to be present, but skipped token by token.
    #[allow(dead_code)]
    messages: IgnoredAny,
}

pub fn decode(raw: &[u8]) -> Result<SessionRecord, ProfessorError> {
    Ok(serde_json::from_slice(raw)?)
}

/// Metadata-only decode path used when building the index.
pub fn decode_header(raw: &[u8]) -> Result<RecordHeader, ProfessorError> {
    Ok(serde_json::from_slice(raw)?)
}

pub fn encode(record: &SessionRecord) -> Result<Vec<u8>, ProfessorError> {
    let mut out = serde_json::to_vec_pretty(record)?;
    out.push(b'\n');
    Ok(out)
}

/// `time` field format: RFC 3339 in UTC on write. Reads also accept naive
/// ISO-8601 timestamps (no offset), interpreted as UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
            return Some(t.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|n| n.and_utc())
    }
}
