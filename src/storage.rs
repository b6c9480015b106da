//! Implementations of [`TaskStateStorage`]

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::state::TaskState;
use crate::traits::TaskStateStorage;


/// A storage that keeps the task state in a local JSON file
#[derive(Clone, Debug, PartialEq)]
pub struct FileStorage {
    backing_file: PathBuf,
}

impl FileStorage {
    pub fn new(path: &Path) -> Self {
        Self { backing_file: PathBuf::from(path) }
    }

    /// A storage backed by the file set in the configuration
    pub fn from_config() -> Self {
        Self::new(&crate::config::STATE_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.backing_file
    }
}

impl TaskStateStorage for FileStorage {
    fn load(&self) -> Result<Option<TaskState>, Box<dyn Error>> {
        let path = &self.backing_file;
        if path.exists() == false {
            log::debug!("No task state file at {:?} yet", path);
            return Ok(None);
        }

        let text = match std::fs::read_to_string(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(text) => text,
        };
        TaskState::from_json(&text).map(Some)
    }

    fn save(&mut self, state: &TaskState) -> Result<(), Box<dyn Error>> {
        let path = &self.backing_file;
        if let Some(folder) = path.parent() {
            if folder.as_os_str().is_empty() == false {
                std::fs::create_dir_all(folder)?;
            }
        }

        let file = match std::fs::File::create(path) {
            Err(err) => {
                return Err(format!("Unable to save file {:?}: {}", path, err).into());
            },
            Ok(f) => f,
        };
        serde_json::to_writer(file, state)?;
        Ok(())
    }
}


/// A storage that holds the serialized task state in memory.
///
/// It behaves like a browser key-value store: whatever has been written is read back as-is,
/// so it can also be seeded with an arbitrary (even corrupt) blob.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStorage {
    blob: Option<String>,
    n_writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: String) -> Self {
        Self { blob: Some(blob), n_writes: 0 }
    }

    /// The raw stored content
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    /// How many times the state has been written
    pub fn n_writes(&self) -> usize {
        self.n_writes
    }
}

impl TaskStateStorage for MemoryStorage {
    fn load(&self) -> Result<Option<TaskState>, Box<dyn Error>> {
        match &self.blob {
            None => Ok(None),
            Some(blob) => TaskState::from_json(blob).map(Some),
        }
    }

    fn save(&mut self, state: &TaskState) -> Result<(), Box<dyn Error>> {
        self.blob = Some(state.to_json()?);
        self.n_writes += 1;
        Ok(())
    }
}
