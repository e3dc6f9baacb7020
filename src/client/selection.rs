//! Current-team selection and persistence
//!
//! The client holds exactly one mutable "current team" value. It is written
//! only here and read by every outbound team-scoped call. The persisted id is
//! never trusted standalone: it is parsed into a typed id on load and
//! reconciled against every freshly fetched membership list before use.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::domain::TeamId;

/// Backing store for the single persisted team id
pub trait SelectionStorage: Send + Sync {
    fn load(&self) -> Option<String>;
    fn store(&self, value: Option<&str>);
}

/// Process-local storage, for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct InMemorySelectionStorage {
    value: Mutex<Option<String>>,
}

impl InMemorySelectionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }
}

impl SelectionStorage for InMemorySelectionStorage {
    fn load(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }

    fn store(&self, value: Option<&str>) {
        *self.value.lock().unwrap() = value.map(String::from);
    }
}

/// File-backed storage holding the id as the file's entire contents
#[derive(Debug)]
pub struct FileSelectionStorage {
    path: PathBuf,
}

impl FileSelectionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SelectionStorage for FileSelectionStorage {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(_) => None,
        }
    }

    fn store(&self, value: Option<&str>) {
        let result = match value {
            Some(value) => std::fs::write(&self.path, value),
            None => match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };

        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "Failed to persist team selection");
        }
    }
}

/// The single source of truth for the current team
pub struct TeamSelectionStore {
    storage: Arc<dyn SelectionStorage>,
    current: Mutex<Option<TeamId>>,
}

impl TeamSelectionStore {
    /// Load the persisted id, discarding anything that does not parse.
    pub fn new(storage: Arc<dyn SelectionStorage>) -> Self {
        let current = storage
            .load()
            .and_then(|raw| match TeamId::parse(&raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(raw = %raw, "Discarding unparseable persisted team id");
                    None
                }
            });

        Self {
            storage,
            current: Mutex::new(current),
        }
    }

    pub fn current(&self) -> Option<TeamId> {
        *self.current.lock().unwrap()
    }

    /// Set and persist the current selection.
    pub fn select(&self, team: TeamId) {
        *self.current.lock().unwrap() = Some(team);
        self.storage.store(Some(&team.to_string()));
        debug!(team_id = %team, "Team selected");
    }

    /// Re-derive the selection from a freshly fetched membership list.
    ///
    /// Runs after every successful fetch, not only the first: membership can
    /// change between fetches and a removed team must not stay selected.
    /// Keeps the current selection if it is still in the list, otherwise
    /// falls back to the first team, and clears everything when the list is
    /// empty.
    pub fn reconcile(&self, fetched: &[TeamId]) -> Option<TeamId> {
        let mut current = self.current.lock().unwrap();

        let next = match *current {
            Some(selected) if fetched.contains(&selected) => Some(selected),
            _ => fetched.first().copied(),
        };

        if *current != next {
            debug!(
                previous = ?current.map(|id| id.to_string()),
                next = ?next.map(|id| id.to_string()),
                "Reconciled team selection"
            );
        }

        *current = next;
        match next {
            Some(id) => self.storage.store(Some(&id.to_string())),
            None => self.storage.store(None),
        }

        next
    }
}
