//! The persisted task state: which tasks are completed, and the custom tasks

use std::collections::BTreeSet;
use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::task::{CustomTask, TaskId};


/// The only piece of state that is persisted locally.
///
/// It is always read and written as a whole.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskState {
    #[serde(default)]
    completed_task_ids: BTreeSet<TaskId>,
    #[serde(default)]
    custom_tasks: Vec<CustomTask>,
}

impl TaskState {
    pub fn new(completed_task_ids: BTreeSet<TaskId>, custom_tasks: Vec<CustomTask>) -> Self {
        Self { completed_task_ids, custom_tasks }
    }

    pub fn from_json(text: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn completed_task_ids(&self) -> &BTreeSet<TaskId> { &self.completed_task_ids }
    pub fn custom_tasks(&self) -> &[CustomTask]           { &self.custom_tasks }

    pub fn is_completed(&self, id: &TaskId) -> bool {
        self.completed_task_ids.contains(id)
    }

    /// Mark a task as completed (or not). Returns whether this changed anything
    pub fn set_completed(&mut self, id: &TaskId, completed: bool) -> bool {
        match completed {
            true => self.completed_task_ids.insert(id.clone()),
            false => self.completed_task_ids.remove(id),
        }
    }

    pub fn custom_task(&self, id: &TaskId) -> Option<&CustomTask> {
        self.custom_tasks.iter().find(|task| task.id() == id)
    }

    pub fn add_custom_task(&mut self, task: CustomTask) {
        self.custom_tasks.push(task);
    }

    /// Remove a custom task, and forget whether it was completed
    pub fn remove_custom_task(&mut self, id: &TaskId) -> Option<CustomTask> {
        let index = self.custom_tasks.iter().position(|task| task.id() == id)?;
        self.completed_task_ids.remove(id);
        Some(self.custom_tasks.remove(index))
    }
}
