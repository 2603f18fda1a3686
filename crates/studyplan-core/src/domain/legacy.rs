//! Import of the superseded local snapshot.
//!
//! Before tasks lived in the remote store, the whole list was kept as one JSON
//! array under a fixed key in browser storage, with no owner column. That
//! format is only read here, to migrate an exported snapshot into the store;
//! it is never written and never used as a second persistence mode.

use serde::Deserialize;

use super::date::TaskDate;
use super::task::{Category, NewTask, Priority, Subject, ValidationError};

/// Storage key the snapshot was saved under.
pub const LEGACY_SNAPSHOT_KEY: &str = "minha_plataforma_tarefas";

#[derive(Debug, Clone, Deserialize)]
struct LegacyRecord {
    #[serde(default, rename = "titulo")]
    title: Option<String>,
    #[serde(default, rename = "data")]
    date: Option<String>,
    #[serde(default, rename = "tipo")]
    category: Option<Category>,
    #[serde(default, rename = "prioridade")]
    priority: Option<Priority>,
    #[serde(default, rename = "concluida")]
    completed: bool,
}

/// One snapshot entry converted into a creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyEntry {
    pub task: NewTask,
    pub completed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LegacyImport {
    pub entries: Vec<LegacyEntry>,
    /// Records dropped because they would fail creation (title/date).
    pub rejected: Vec<(usize, ValidationError)>,
}

/// Parse an exported snapshot (the JSON array stored under [`LEGACY_SNAPSHOT_KEY`]).
pub fn parse_snapshot(json: &str) -> Result<LegacyImport, serde_json::Error> {
    let records: Vec<LegacyRecord> = serde_json::from_str(json)?;
    let mut import = LegacyImport::default();

    for (index, record) in records.into_iter().enumerate() {
        let task = NewTask {
            title: record.title.unwrap_or_default(),
            date: record.date.map(TaskDate::raw),
            category: record.category.unwrap_or_default(),
            priority: record.priority.unwrap_or_default(),
            subject: Subject::Unspecified,
        };
        match task.validate() {
            Ok(()) => import.entries.push(LegacyEntry {
                task,
                completed: record.completed,
            }),
            Err(err) => import.rejected.push((index, err)),
        }
    }

    Ok(import)
}
