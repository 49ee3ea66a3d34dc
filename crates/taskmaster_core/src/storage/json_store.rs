use crate::error::TaskError;
use crate::model::Task;
use log::warn;
use serde_json::Value;
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "tasks.json";

pub fn store_path() -> Result<PathBuf, TaskError> {
    if let Ok(path) = std::env::var("TASKMASTER_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| TaskError::store("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("taskmaster")
            .join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| TaskError::store("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskmaster")
            .join(STORE_FILE_NAME))
    }
}

/// Durable slot holding the serialized task list as a JSON array.
///
/// All validation and recovery lives here: callers always receive a
/// well-formed (possibly empty) list from [`JsonStore::load`].
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
}

/// Result of reading the slot, including recovery diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub tasks: Vec<Task>,
    /// Stored elements that failed the shape check and were dropped.
    pub dropped: usize,
    /// True when the raw value was unreadable and the slot was reset.
    pub recovered: bool,
}

impl LoadOutcome {
    fn empty(recovered: bool) -> Self {
        Self {
            tasks: Vec::new(),
            dropped: 0,
            recovered,
        }
    }
}

impl JsonStore {
    pub fn open_default() -> Result<Self, TaskError> {
        Ok(Self { path: store_path()? })
    }

    pub fn at_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored task array. Never fails: a missing file yields an
    /// empty list, unreadable or non-array content resets the slot, and
    /// elements failing the shape check are dropped.
    pub fn load(&self) -> LoadOutcome {
        if !self.path.exists() {
            return LoadOutcome::empty(false);
        }

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("unreadable task store at {}: {err}", self.path.display());
                self.clear();
                return LoadOutcome::empty(true);
            }
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!("corrupted task store at {}: {err}", self.path.display());
                self.clear();
                return LoadOutcome::empty(true);
            }
        };

        let Some(items) = parsed.as_array() else {
            warn!(
                "task store at {} does not hold an array",
                self.path.display()
            );
            self.clear();
            return LoadOutcome::empty(true);
        };

        let mut tasks = Vec::with_capacity(items.len());
        let mut dropped = 0;
        for item in items {
            match task_from_value(item) {
                Some(task) => tasks.push(task),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!(
                "dropped {dropped} malformed task entries from {}",
                self.path.display()
            );
        }

        LoadOutcome {
            tasks,
            dropped,
            recovered: false,
        }
    }

    /// Serializes and writes the full list, replacing the prior value.
    pub fn save(&self, tasks: &[Task]) -> Result<(), TaskError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| TaskError::store(err.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(tasks).map_err(|err| TaskError::store(err.to_string()))?;
        std::fs::write(&self.path, content).map_err(|err| TaskError::store(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)
                .map_err(|err| TaskError::store(err.to_string()))?;
        }

        Ok(())
    }

    /// Removes the stored value entirely. Best-effort.
    pub fn clear(&self) {
        if let Err(err) = std::fs::remove_file(&self.path)
            && err.kind() != std::io::ErrorKind::NotFound
        {
            warn!("failed to clear task store at {}: {err}", self.path.display());
        }
    }
}

/// Shape check for one stored element. `id` may be an integer or a non-blank
/// string, `text` must be non-empty after trimming, and `completed` must be
/// strictly a boolean (a truthy `1` does not pass). `createdAt` is optional.
fn task_from_value(value: &Value) -> Option<Task> {
    let entry = value.as_object()?;

    let id = match entry.get("id")? {
        Value::String(id) if !id.trim().is_empty() => id.clone(),
        Value::Number(id) => id.to_string(),
        _ => return None,
    };

    let text = entry.get("text")?.as_str()?.trim().to_string();
    if text.is_empty() {
        return None;
    }

    let completed = entry.get("completed")?.as_bool()?;

    let created_at = entry
        .get("createdAt")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(Task {
        id,
        text,
        completed,
        created_at,
    })
}
