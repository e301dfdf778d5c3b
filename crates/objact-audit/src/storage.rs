//! Change log storage backends.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use uuid::Uuid;

use crate::error::AuditError;
use crate::event::ChangeEvent;
use crate::logger::AuditFilter;

/// Trait for change log storage backends.
pub trait ChangeStorage: Send + Sync {
    /// Store a change event.
    fn store(&self, event: ChangeEvent) -> Result<(), AuditError>;

    /// Query change events, oldest first.
    fn query(&self, filter: &AuditFilter) -> Result<Vec<ChangeEvent>, AuditError>;

    /// Count events matching a filter (ignores limit/offset).
    fn count(&self, filter: &AuditFilter) -> Result<usize, AuditError>;

    /// Get a change event by ID.
    fn get(&self, event_id: Uuid) -> Result<Option<ChangeEvent>, AuditError>;
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullStorage;

impl NullStorage {
    pub fn new() -> Self {
        Self
    }
}

impl ChangeStorage for NullStorage {
    fn store(&self, _event: ChangeEvent) -> Result<(), AuditError> {
        Ok(())
    }

    fn query(&self, _filter: &AuditFilter) -> Result<Vec<ChangeEvent>, AuditError> {
        Ok(vec![])
    }

    fn count(&self, _filter: &AuditFilter) -> Result<usize, AuditError> {
        Ok(0)
    }

    fn get(&self, _event_id: Uuid) -> Result<Option<ChangeEvent>, AuditError> {
        Ok(None)
    }
}

/// Console storage (JSON to stdout).
#[derive(Debug, Default)]
pub struct ConsoleStorage;

impl ConsoleStorage {
    pub fn new() -> Self {
        Self
    }
}

impl ChangeStorage for ConsoleStorage {
    fn store(&self, event: ChangeEvent) -> Result<(), AuditError> {
        let json = serde_json::to_string(&event)?;
        println!("{}", json);
        Ok(())
    }

    fn query(&self, _filter: &AuditFilter) -> Result<Vec<ChangeEvent>, AuditError> {
        // Console output is write-only.
        Ok(vec![])
    }

    fn count(&self, _filter: &AuditFilter) -> Result<usize, AuditError> {
        Ok(0)
    }

    fn get(&self, _event_id: Uuid) -> Result<Option<ChangeEvent>, AuditError> {
        Ok(None)
    }
}

/// File storage: appends JSON lines and keeps an in-memory index for queries.
///
/// Events already present in the file are loaded when the storage opens, so
/// history survives restarts.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    file: Mutex<File>,
    events: RwLock<Vec<ChangeEvent>>,
}

impl FileStorage {
    /// Open (or create) the log file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let events = if path.exists() {
            Self::load(&path)?
        } else {
            Vec::new()
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                AuditError::InitializationFailed(format!("{}: {}", path.display(), e))
            })?;

        tracing::debug!(path = %path.display(), loaded = events.len(), "Change log opened");

        Ok(Self {
            path,
            file: Mutex::new(file),
            events: RwLock::new(events),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Vec<ChangeEvent>, AuditError> {
        let reader = BufReader::new(File::open(path)?);
        let mut events = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(event) => events.push(event),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    line = index + 1,
                    error = %e,
                    "Skipping unreadable change log line"
                ),
            }
        }
        Ok(events)
    }

    fn matching(&self, filter: &AuditFilter) -> Result<Vec<ChangeEvent>, AuditError> {
        let events = self.events.read().map_err(|e| {
            AuditError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(events.iter().filter(|e| filter.matches(e)).cloned().collect())
    }
}

impl ChangeStorage for FileStorage {
    fn store(&self, event: ChangeEvent) -> Result<(), AuditError> {
        let json = serde_json::to_string(&event)?;

        {
            let mut file = self.file.lock().map_err(|e| {
                AuditError::StorageError(format!("Failed to acquire file lock: {}", e))
            })?;
            writeln!(file, "{}", json)?;
            file.flush()?;
        }

        let mut events = self.events.write().map_err(|e| {
            AuditError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;
        events.push(event);

        Ok(())
    }

    fn query(&self, filter: &AuditFilter) -> Result<Vec<ChangeEvent>, AuditError> {
        let results = self.matching(filter)?;
        Ok(filter.paginate(results))
    }

    fn count(&self, filter: &AuditFilter) -> Result<usize, AuditError> {
        Ok(self.matching(filter)?.len())
    }

    fn get(&self, event_id: Uuid) -> Result<Option<ChangeEvent>, AuditError> {
        let events = self.events.read().map_err(|e| {
            AuditError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(events.iter().find(|e| e.event_id == event_id).cloned())
    }
}

/// File storage plus a human-readable line on stdout.
#[derive(Debug)]
pub struct DualStorage {
    file: FileStorage,
}

impl DualStorage {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        Ok(Self {
            file: FileStorage::new(path)?,
        })
    }
}

impl ChangeStorage for DualStorage {
    fn store(&self, event: ChangeEvent) -> Result<(), AuditError> {
        println!("{}", event.to_log_line());
        self.file.store(event)
    }

    fn query(&self, filter: &AuditFilter) -> Result<Vec<ChangeEvent>, AuditError> {
        self.file.query(filter)
    }

    fn count(&self, filter: &AuditFilter) -> Result<usize, AuditError> {
        self.file.count(filter)
    }

    fn get(&self, event_id: Uuid) -> Result<Option<ChangeEvent>, AuditError> {
        self.file.get(event_id)
    }
}
