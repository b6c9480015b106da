//! Filters for the task list

use crate::course::TaskCategory;
use crate::task::{Priority, Task};

/// Criteria a task must match to be displayed. A `None` criterion matches everything
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskFilter {
    pub course: Option<String>,
    pub category: Option<TaskCategory>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(course) = &self.course {
            if task.course_name() != course.as_str() {
                return false;
            }
        }
        if let Some(category) = self.category {
            if task.category() != category {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority() != priority {
                return false;
            }
        }
        if let Some(completed) = self.completed {
            if task.completed() != completed {
                return false;
            }
        }
        true
    }

    pub fn apply<'t>(&self, tasks: &'t [Task]) -> Vec<&'t Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }

    // Selecting the value that is already selected clears the criterion

    pub fn toggle_course(&mut self, course: &str) {
        toggle(&mut self.course, course.to_string());
    }

    pub fn toggle_category(&mut self, category: TaskCategory) {
        toggle(&mut self.category, category);
    }

    pub fn toggle_priority(&mut self, priority: Priority) {
        toggle(&mut self.priority, priority);
    }

    pub fn toggle_completed(&mut self, completed: bool) {
        toggle(&mut self.completed, completed);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn toggle<T: PartialEq>(slot: &mut Option<T>, value: T) {
    if slot.as_ref() == Some(&value) {
        *slot = None;
    } else {
        *slot = Some(value);
    }
}
