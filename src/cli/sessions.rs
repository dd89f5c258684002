// src/cli/sessions.rs — `professor sessions`

use crate::session::{SessionMetadata, SessionStore};

pub fn run_sessions(store: &SessionStore) -> anyhow::Result<()> {
    let sessions = store.list_sessions();
    if sessions.is_empty() {
        println!("No saved sessions in {}.", store.dir().display());
    } else {
        for meta in &sessions {
            println!("{}", format_row(meta));
        }
    }

    for skipped in store.skipped() {
        eprintln!(
            "  WARN: skipped {}: {}",
            skipped.path.display(),
            skipped.reason
        );
    }
    Ok(())
}

fn format_row(meta: &SessionMetadata) -> String {
    format!(
        "{}  {}  {}",
        meta.id,
        meta.last_modified.format("%Y-%m-%dT%H:%M:%SZ"),
        meta.name
    )
}
