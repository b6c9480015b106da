//! Tasks, either derived from a course schedule or created by the student

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{HIGH_PRIORITY_WITHIN_DAYS, LOW_PRIORITY_AFTER_DAYS};
use crate::course::{ScheduleItem, TaskCategory};

/// Dates are written this way in task ids and in the persisted state
const DATE_FORMAT: &str = "%Y-%m-%d";


/// The identifier of a task.
///
/// Completion is tracked by id only, so the id of a schedule-derived task must not change across reloads.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// The id of the task derived from a schedule item. This only depends on the course name, the item title and its date.
    pub fn for_schedule_item(course_name: &str, item: &ScheduleItem) -> Self {
        Self(format!("{}-{}-{}", course_name, item.title(), item.date().format(DATE_FORMAT)))
    }

    /// Pick a new (random) id for a custom task
    pub fn random_custom(title: &str) -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self(format!("custom-{}-{}", random, title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}


/// How urgent a task is.
///
/// Variants are ordered from the most to the least urgent, so that `High < Medium < Low`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// The default priority of a schedule-derived task
    pub fn for_due_date(category: TaskCategory, due: NaiveDate, today: NaiveDate) -> Self {
        let days_until = (due - today).num_days();
        if category == TaskCategory::Exam || days_until <= HIGH_PRIORITY_WITHIN_DAYS {
            Priority::High
        } else if days_until > LOW_PRIORITY_AFTER_DAYS {
            Priority::Low
        } else {
            Priority::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("Invalid priority '{}' (expected high, medium or low)", other).into()),
        }
    }
}


/// A task created by the student, as it is persisted
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTask {
    id: TaskId,
    course_name: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "type")]
    category: TaskCategory,
    date: NaiveDate,
    priority: Priority,
    #[serde(default = "always_custom")]
    is_custom: bool,
}

fn always_custom() -> bool { true }

impl CustomTask {
    /// Create a custom task from the fields filled in by the student.
    /// This picks a new (random) id.
    pub fn new(new_task: NewTask) -> Self {
        Self {
            id: TaskId::random_custom(&new_task.title),
            course_name: new_task.course_name,
            title: new_task.title,
            description: new_task.description,
            category: new_task.category,
            date: new_task.date,
            priority: new_task.priority,
            is_custom: true,
        }
    }

    pub fn id(&self) -> &TaskId             { &self.id }
    pub fn course_name(&self) -> &str       { &self.course_name }
    pub fn title(&self) -> &str             { &self.title }
    pub fn description(&self) -> &str       { &self.description }
    pub fn category(&self) -> TaskCategory  { self.category }
    pub fn date(&self) -> NaiveDate         { self.date }
    pub fn priority(&self) -> Priority      { self.priority }
}


/// The fields needed to create a custom task
#[derive(Clone, Debug, PartialEq)]
pub struct NewTask {
    pub course_name: String,
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub date: NaiveDate,
    pub priority: Priority,
}

impl NewTask {
    /// A new assignment, with a medium priority and no description
    pub fn new(course_name: String, title: String, date: NaiveDate) -> Self {
        Self {
            course_name,
            title,
            description: String::new(),
            category: TaskCategory::Assignment,
            date,
            priority: Priority::default(),
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Checks the required fields are filled in
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.title.trim().is_empty() {
            return Err("A task needs a title".into());
        }
        if self.course_name.trim().is_empty() {
            return Err("A task needs a course".into());
        }
        Ok(())
    }
}


/// A task, as displayed in the task list
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    id: TaskId,
    course_name: String,
    title: String,
    description: String,
    category: TaskCategory,
    date: NaiveDate,
    priority: Priority,
    completed: bool,
    is_custom: bool,
}

impl Task {
    /// Build the task matching a schedule item. Its priority is derived from its category and due date.
    pub fn from_schedule_item(course_name: &str, category: TaskCategory, item: &ScheduleItem, completed: bool, today: NaiveDate) -> Self {
        Self {
            id: TaskId::for_schedule_item(course_name, item),
            course_name: course_name.to_string(),
            title: item.title().to_string(),
            description: item.description().unwrap_or_default().to_string(),
            category,
            date: item.date(),
            priority: Priority::for_due_date(category, item.date(), today),
            completed,
            is_custom: false,
        }
    }

    pub fn from_custom(custom: &CustomTask, completed: bool) -> Self {
        Self {
            id: custom.id.clone(),
            course_name: custom.course_name.clone(),
            title: custom.title.clone(),
            description: custom.description.clone(),
            category: custom.category,
            date: custom.date,
            priority: custom.priority,
            completed,
            is_custom: true,
        }
    }

    pub fn id(&self) -> &TaskId             { &self.id }
    pub fn course_name(&self) -> &str       { &self.course_name }
    pub fn title(&self) -> &str             { &self.title }
    pub fn description(&self) -> &str       { &self.description }
    pub fn category(&self) -> TaskCategory  { self.category }
    pub fn date(&self) -> NaiveDate         { self.date }
    pub fn priority(&self) -> Priority      { self.priority }
    pub fn completed(&self) -> bool         { self.completed }
    pub fn is_custom(&self) -> bool         { self.is_custom }

    pub(crate) fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn schedule_ids_are_stable() {
        let item = ScheduleItem::new(day(2026, 11, 2), TaskCategory::Quiz, "Quiz 3".to_string(), None);
        let first = TaskId::for_schedule_item("Algebra", &item);
        let second = TaskId::for_schedule_item("Algebra", &item.clone());
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "Algebra-Quiz 3-2026-11-02");
    }

    #[test]
    fn custom_ids_are_unique() {
        let a = TaskId::random_custom("Read chapter 4");
        let b = TaskId::random_custom("Read chapter 4");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("custom-"));
        assert!(a.as_str().ends_with("-Read chapter 4"));
    }

    #[test]
    fn priority_from_due_date() {
        let today = day(2026, 10, 18);
        let assignment = TaskCategory::Assignment;
        assert_eq!(Priority::for_due_date(assignment, day(2026, 10, 20), today), Priority::High);
        assert_eq!(Priority::for_due_date(assignment, day(2026, 10, 21), today), Priority::High);
        assert_eq!(Priority::for_due_date(assignment, day(2026, 10, 22), today), Priority::Medium);
        assert_eq!(Priority::for_due_date(assignment, day(2026, 10, 25), today), Priority::Medium);
        assert_eq!(Priority::for_due_date(assignment, day(2026, 10, 26), today), Priority::Low);
        assert_eq!(Priority::for_due_date(assignment, day(2026, 10, 10), today), Priority::High);
        assert_eq!(Priority::for_due_date(TaskCategory::Exam, day(2027, 1, 15), today), Priority::High);
    }

    #[test]
    fn priority_order() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn new_task_validation() {
        let ok = NewTask::new("Physics".to_string(), "Lab report".to_string(), day(2026, 10, 30));
        assert!(ok.validate().is_ok());

        let no_title = NewTask::new("Physics".to_string(), "  ".to_string(), day(2026, 10, 30));
        assert!(no_title.validate().is_err());

        let no_course = NewTask::new(String::new(), "Lab report".to_string(), day(2026, 10, 30));
        assert!(no_course.validate().is_err());
    }
}
