// src/session/mod.rs — Session data model
//
// A session is one named conversation persisted as `<SessionId>.json`.
// The store owns the index and the selected transcript; the codec owns
// the file format; the controller sequences one turn at a time.

pub mod codec;
pub mod controller;
pub mod index;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::infra::errors::ProfessorError;

pub use controller::SessionController;
pub use index::{IndexScan, SessionIndex, SkippedRecord};
pub use store::SessionStore;

/// Extension of session record files.
pub const RECORD_EXTENSION: &str = "json";

/// Opaque session identifier. Its hyphenated lowercase form is both the
/// index key and the file basename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// `<id>.json`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self, RECORD_EXTENSION)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for SessionId {
    type Err = ProfessorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| ProfessorError::Format(format!("invalid session id '{}': {}", s, e)))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        })
    }
}

/// One transcript entry. Content is never empty; construction enforces it,
/// including when decoding from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMessage")]
pub struct Message {
    role: Role,
    content: String,
}

#[derive(Deserialize)]
struct RawMessage {
    role: Role,
    content: String,
}

impl TryFrom<RawMessage> for Message {
    type Error = ProfessorError;

    fn try_from(raw: RawMessage) -> Result<Self, Self::Error> {
        Message::new(raw.role, raw.content)
    }
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Result<Self, ProfessorError> {
        let content = content.into();
        if content.is_empty() {
            return Err(ProfessorError::EmptyContent { role });
        }
        Ok(Self { role, content })
    }

    pub fn user(content: impl Into<String>) -> Result<Self, ProfessorError> {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Result<Self, ProfessorError> {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Metadata-only view of a session, held by the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMetadata {
    pub id: SessionId,
    pub name: String,
    pub last_modified: DateTime<Utc>,
}

/// The full on-disk unit for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub name: String,
    #[serde(rename = "time", with = "codec::timestamp")]
    pub last_modified: DateTime<Utc>,
    pub messages: Vec<Message>,
}
