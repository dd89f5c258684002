// src/session/index.rs — Startup scan of the sessions directory
//
// Reads only `name` and `time` from each `<uuid>.json`; message arrays are
// skipped by the decoder. A uuid spelled any other way (uppercase, no
// hyphens, braced) is reported, not indexed. Anything else is ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::codec;
use super::{SessionId, SessionMetadata, RECORD_EXTENSION};
use crate::infra::errors::ProfessorError;

/// A record file that could not be indexed.
#[derive(Debug, Clone)]
pub struct SkippedRecord {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a degraded-mode scan: every valid entry plus what was skipped.
#[derive(Debug, Default)]
pub struct IndexScan {
    pub entries: HashMap<SessionId, SessionMetadata>,
    pub skipped: Vec<SkippedRecord>,
}

pub struct SessionIndex;

impl SessionIndex {
    /// Strict build: the first unreadable or malformed record fails the
    /// whole build with `ProfessorError::Index`.
    pub fn build(dir: &Path) -> Result<HashMap<SessionId, SessionMetadata>, ProfessorError> {
        let mut entries = HashMap::new();
        for (path, name) in record_files(dir)? {
            let meta = name
                .and_then(|id| read_metadata(id, &path))
                .map_err(|e| ProfessorError::Index {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            entries.insert(meta.id, meta);
        }
        Ok(entries)
    }

    /// Degraded build: bad records are reported and excluded. Only a failure
    /// to list the directory itself is an error.
    pub fn scan(dir: &Path) -> Result<IndexScan, ProfessorError> {
        let mut scan = IndexScan::default();
        for (path, name) in record_files(dir)? {
            match name.and_then(|id| read_metadata(id, &path)) {
                Ok(meta) => {
                    scan.entries.insert(meta.id, meta);
                }
                Err(e) => {
                    tracing::warn!("Skipping session file {}: {}", path.display(), e);
                    scan.skipped.push(SkippedRecord {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }
        tracing::debug!(
            "Indexed {} session(s) in {} ({} skipped)",
            scan.entries.len(),
            dir.display(),
            scan.skipped.len()
        );
        Ok(scan)
    }
}

/// Parse `<uuid>.json` into its identifier. Other names (including
/// `.<uuid>.json.tmp` write-in-progress files) are not record files.
///
/// Other spellings of a uuid (uppercase, no hyphens, braced) are `Err`: the
/// store only ever reads and writes the canonical name.
pub(crate) fn record_id(path: &Path) -> Option<Result<SessionId, ProfessorError>> {
    if path.extension()? != RECORD_EXTENSION {
        return None;
    }
    let id: SessionId = path.file_stem()?.to_str()?.parse().ok()?;
    let expected = id.file_name();
    if path.file_name()? == expected.as_str() {
        Some(Ok(id))
    } else {
        Some(Err(ProfessorError::Format(format!(
            "non-canonical session file name, expected '{expected}'"
        ))))
    }
}

type RecordFile = (PathBuf, Result<SessionId, ProfessorError>);

fn record_files(dir: &Path) -> Result<Vec<RecordFile>, ProfessorError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match record_id(&path) {
            Some(name) => files.push((path, name)),
            None => tracing::trace!("Ignoring non-session file {}", path.display()),
        }
    }
    Ok(files)
}

fn read_metadata(id: SessionId, path: &Path) -> Result<SessionMetadata, ProfessorError> {
    let raw = std::fs::read(path)?;
    let header = codec::decode_header(&raw)?;
    Ok(SessionMetadata {
        id,
        name: header.name,
        last_modified: header.last_modified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_uuid_json() {
        let id = SessionId::new();
        let path = PathBuf::from("/tmp").join(id.file_name());
        assert_eq!(record_id(&path).unwrap().unwrap(), id);
    }

    #[test]
    fn test_record_id_rejects_other_uuid_spellings() {
        let id = SessionId::new();
        let canonical = id.to_string();
        let spellings = [
            canonical.to_uppercase(),
            canonical.replace('-', ""),
            format!("{{{canonical}}}"),
        ];
        for stem in spellings {
            let path = PathBuf::from(format!("/tmp/{stem}.json"));
            let err = record_id(&path).unwrap().unwrap_err();
            assert!(
                err.to_string().contains(&id.file_name()),
                "unexpected error for {stem}: {err}"
            );
        }
    }

    #[test]
    fn test_record_id_rejects_other_names() {
        let id = SessionId::new();
        assert!(record_id(Path::new("/tmp/notes.json")).is_none());
        assert!(record_id(Path::new(&format!("/tmp/{id}.txt"))).is_none());
        assert!(record_id(Path::new(&format!("/tmp/.{id}.json.tmp"))).is_none());
        assert!(record_id(Path::new(&format!("/tmp/{id}"))).is_none());
    }
}
