// src/session/store.rs — Authoritative session state
//
// Owns the metadata index and the single selected transcript. Every
// successful append rewrites the whole record (temp file + rename).

use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::codec;
use super::index::{SessionIndex, SkippedRecord};
use super::{Message, SessionId, SessionMetadata, SessionRecord};
use crate::infra::errors::ProfessorError;

pub struct SessionStore {
    dir: PathBuf,
    index: HashMap<SessionId, SessionMetadata>,
    /// Always a key of `index` when set.
    selected: Option<SessionId>,
    /// Empty when nothing is selected.
    selected_messages: Vec<Message>,
    skipped: Vec<SkippedRecord>,
    /// Created in this process and not yet written; these have no file.
    unsaved: HashSet<SessionId>,
    /// Latest timestamp issued or observed; new stamps are strictly later.
    last_stamp: Option<DateTime<Utc>>,
}

impl SessionStore {
    /// Open (creating if needed) a sessions directory and index it.
    /// Malformed records are skipped and available via [`skipped`](Self::skipped).
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ProfessorError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let scan = SessionIndex::scan(&dir)?;
        let last_stamp = scan.entries.values().map(|m| m.last_modified).max();

        Ok(Self {
            dir,
            index: scan.entries,
            selected: None,
            selected_messages: Vec::new(),
            skipped: scan.skipped,
            unsaved: HashSet::new(),
            last_stamp,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    pub fn selected(&self) -> Option<SessionId> {
        self.selected
    }

    pub fn selected_messages(&self) -> &[Message] {
        &self.selected_messages
    }

    pub fn metadata(&self, id: SessionId) -> Option<&SessionMetadata> {
        self.index.get(&id)
    }

    /// All sessions, oldest first. Ties are broken by id so the order is stable.
    pub fn list_sessions(&self) -> Vec<SessionMetadata> {
        let mut sessions: Vec<SessionMetadata> = self.index.values().cloned().collect();
        sessions.sort_by(|a, b| {
            a.last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.id.cmp(&b.id))
        });
        sessions
    }

    /// Load a session's full transcript and make it the selection.
    ///
    /// A session created by this store and never saved has no file yet and
    /// selects as an empty transcript. A missing file for any other session
    /// is an `Io` error. On error the previous selection stays.
    pub fn select(&mut self, id: SessionId) -> Result<&[Message], ProfessorError> {
        let meta = self
            .index
            .get(&id)
            .ok_or(ProfessorError::UnknownSession(id))?;

        let record = match std::fs::read(self.record_path(id)) {
            Ok(raw) => codec::decode(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && self.unsaved.contains(&id) => {
                SessionRecord {
                    name: meta.name.clone(),
                    last_modified: meta.last_modified,
                    messages: Vec::new(),
                }
            }
            Err(e) => return Err(e.into()),
        };

        self.observe(record.last_modified);
        if let Some(entry) = self.index.get_mut(&id) {
            entry.name = record.name;
            entry.last_modified = record.last_modified;
        }

        tracing::debug!("Selected session {} ({} messages)", id, record.messages.len());
        self.selected = Some(id);
        self.selected_messages = record.messages;
        Ok(&self.selected_messages)
    }

    /// Register a new, empty session and select it. Nothing is written until
    /// the first successful append.
    pub fn create(&mut self, name: impl Into<String>) -> SessionId {
        let id = SessionId::new();
        let last_modified = self.next_stamp();
        self.index.insert(
            id,
            SessionMetadata {
                id,
                name: name.into(),
                last_modified,
            },
        );
        self.unsaved.insert(id);
        self.selected = Some(id);
        self.selected_messages.clear();
        tracing::debug!("Created session {}", id);
        id
    }

    /// Record one user/assistant exchange on the selected session and persist.
    ///
    /// Validation happens before any mutation. If only the write fails, the
    /// in-memory transcript and timestamp stay advanced and the error is
    /// `Persist`; retry with [`persist_selected`](Self::persist_selected).
    pub fn append_exchange(
        &mut self,
        user_content: &str,
        assistant_content: &str,
    ) -> Result<(), ProfessorError> {
        let id = self.selected.ok_or(ProfessorError::NoSelection)?;
        let user = Message::user(user_content)?;
        let assistant = Message::assistant(assistant_content)?;
        if !self.index.contains_key(&id) {
            return Err(ProfessorError::UnknownSession(id));
        }

        self.selected_messages.push(user);
        self.selected_messages.push(assistant);
        let stamp = self.next_stamp();
        if let Some(entry) = self.index.get_mut(&id) {
            entry.last_modified = stamp;
        }

        self.persist_selected()
    }

    /// Write the selected session's current state to disk, replacing any
    /// previous record atomically.
    pub fn persist_selected(&mut self) -> Result<(), ProfessorError> {
        let id = self.selected.ok_or(ProfessorError::NoSelection)?;
        let meta = self
            .index
            .get(&id)
            .ok_or(ProfessorError::UnknownSession(id))?;

        let record = SessionRecord {
            name: meta.name.clone(),
            last_modified: meta.last_modified,
            messages: self.selected_messages.clone(),
        };
        let bytes = codec::encode(&record)?;

        write_atomic(&self.dir, id, &bytes)
            .map_err(|source| ProfessorError::Persist { id, source })?;
        self.unsaved.remove(&id);
        tracing::debug!(
            "Saved session {} ({} messages)",
            id,
            self.selected_messages.len()
        );
        Ok(())
    }

    fn record_path(&self, id: SessionId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    fn observe(&mut self, stamp: DateTime<Utc>) {
        if self.last_stamp.map_or(true, |last| stamp > last) {
            self.last_stamp = Some(stamp);
        }
    }

    fn next_stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::nanoseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

/// Write to a hidden temp file in the same directory, fsync, then rename
/// over the record. A failure before the rename leaves the old record intact.
fn write_atomic(dir: &Path, id: SessionId, bytes: &[u8]) -> std::io::Result<()> {
    let dst = dir.join(id.file_name());
    let tmp = dir.join(format!(".{}.tmp", id.file_name()));

    let result = (|| -> std::io::Result<()> {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.flush()?;
        f.sync_all()?;
        std::fs::rename(&tmp, &dst)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}
