use std::error::Error;

use async_trait::async_trait;

use crate::course::StudentRecord;
use crate::state::TaskState;

/// Somewhere the task state can be persisted to
pub trait TaskStateStorage {
    /// Returns the stored state, or `None` in case nothing has ever been stored
    fn load(&self) -> Result<Option<TaskState>, Box<dyn Error>>;
    /// Replace the stored state by `state`
    fn save(&mut self, state: &TaskState) -> Result<(), Box<dyn Error>>;

    /// Returns the stored state.
    /// A missing, unreadable or corrupt state is logged and replaced by an empty one.
    fn load_or_default(&self) -> TaskState {
        match self.load() {
            Ok(Some(state)) => state,
            Ok(None) => TaskState::default(),
            Err(err) => {
                log::warn!("Unable to load the task state: {}. Using an empty state", err);
                TaskState::default()
            },
        }
    }
}

#[async_trait]
pub trait StudentDataSource {
    /// Returns the student record.
    /// This may be a long process, or can even fail, e.g. in case of a remote server
    async fn get_student_data(&self) -> Result<StudentRecord, Box<dyn Error>>;
}
