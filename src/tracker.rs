//! This module owns the task list and keeps it in sync with the persisted task state
//!
//! Courses come from the student-data service and are never modified here.
//! Completion flags and custom tasks are stored in a [`TaskStateStorage`], which is rewritten as a whole after every change.

use std::collections::BTreeSet;
use std::error::Error;

use chrono::{Local, NaiveDate};

use crate::course::{Course, TaskCategory};
use crate::filter::TaskFilter;
use crate::reconcile::{reconcile, sort_tasks};
use crate::state::TaskState;
use crate::task::{CustomTask, NewTask, Task, TaskId};
use crate::traits::{StudentDataSource, TaskStateStorage};


/// The task list of a student, merged from course schedules and locally persisted state.
#[derive(Debug)]
pub struct TaskTracker<S>
where
    S: TaskStateStorage,
{
    /// Where the task state is persisted
    storage: S,
    courses: Vec<Course>,
    state: TaskState,
    /// Always sorted by due date and priority
    tasks: Vec<Task>,
    today: NaiveDate,
}

impl<S> TaskTracker<S>
where
    S: TaskStateStorage,
{
    /// Create a tracker, load the persisted state from `storage`, and build the task list.
    ///
    /// Priorities are computed relative to the current local date
    pub fn new(courses: Vec<Course>, storage: S) -> Self {
        Self::new_at(courses, storage, Local::now().date_naive())
    }

    /// Same as [`Self::new`], but priorities are computed relative to `today`
    pub fn new_at(courses: Vec<Course>, storage: S, today: NaiveDate) -> Self {
        let state = storage.load_or_default();
        let mut tracker = Self { storage, courses, state, tasks: Vec::new(), today };
        tracker.rebuild();
        tracker
    }

    pub fn tasks(&self) -> &[Task]          { &self.tasks }
    pub fn courses(&self) -> &[Course]      { &self.courses }
    pub fn state(&self) -> &TaskState       { &self.state }
    pub fn storage(&self) -> &S             { &self.storage }
    pub fn today(&self) -> NaiveDate        { self.today }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// The tasks that match `filter`
    pub fn filtered(&self, filter: &TaskFilter) -> Vec<&Task> {
        filter.apply(&self.tasks)
    }

    /// The names of the courses, without duplicates, in the order they appear in
    pub fn course_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for course in &self.courses {
            if names.contains(&course.name()) == false {
                names.push(course.name());
            }
        }
        names
    }

    /// The task categories a filter can choose from: every known category, plus the ones found in the task list
    pub fn task_categories(&self) -> Vec<TaskCategory> {
        let mut categories: BTreeSet<TaskCategory> = TaskCategory::ALL.iter().copied().collect();
        categories.extend(self.tasks.iter().map(|task| task.category()));
        categories.into_iter().collect()
    }

    /// Flip the completion status of a task.
    ///
    /// Returns the new status, or `None` in case there is no such task
    pub fn toggle_completion(&mut self, id: &TaskId) -> Option<bool> {
        let completed = self.task(id)?.completed();
        self.set_completion(id, completed == false);
        Some(completed == false)
    }

    /// Set the completion status of a task. Returns `false` in case there is no such task
    ///
    /// Every task with this id is updated (the same course may be listed in several semesters).
    pub fn set_completion(&mut self, id: &TaskId, completed: bool) -> bool {
        let mut found = false;
        for task in self.tasks.iter_mut().filter(|task| task.id() == id) {
            task.set_completed(completed);
            found = true;
        }
        if found == false {
            log::warn!("No task with id {}", id);
            return false;
        }

        if self.state.set_completed(id, completed) {
            self.persist();
        }
        true
    }

    /// Create a custom task and add it to the task list.
    ///
    /// Returns an error in case a required field is missing
    pub fn add_custom_task(&mut self, new_task: NewTask) -> Result<TaskId, Box<dyn Error>> {
        new_task.validate()?;

        let custom = CustomTask::new(new_task);
        let id = custom.id().clone();
        log::debug!("Adding custom task {}", id);

        self.tasks.push(Task::from_custom(&custom, false));
        sort_tasks(&mut self.tasks);
        self.state.add_custom_task(custom);
        self.persist();
        Ok(id)
    }

    /// Delete a custom task.
    ///
    /// Tasks that come from a course schedule cannot be deleted.
    pub fn delete_custom_task(&mut self, id: &TaskId) -> Result<(), Box<dyn Error>> {
        if self.state.remove_custom_task(id).is_none() {
            return match self.task(id) {
                Some(_) => Err(format!("Task {} comes from a course schedule and cannot be deleted", id).into()),
                None => Err(format!("No custom task with id {}", id).into()),
            };
        }

        self.tasks.retain(|task| task.id() != id);
        self.persist();
        Ok(())
    }

    /// Replace the courses (e.g. after the student data has been fetched again) and rebuild the task list
    pub fn replace_courses(&mut self, courses: Vec<Course>) {
        self.courses = courses;
        self.rebuild();
    }

    /// Fetch the courses from `source`.
    ///
    /// In case of errors, they are logged, the current courses are kept, and this returns `false`.
    pub async fn refresh<D>(&mut self, source: &D) -> bool
    where
        D: StudentDataSource + Sync,
    {
        match source.get_student_data().await {
            Err(err) => {
                log::error!("Unable to fetch student data: {}", err);
                false
            },
            Ok(record) => {
                self.replace_courses(record.all_courses());
                true
            },
        }
    }

    /// Load the persisted state again and rebuild the task list
    pub fn reload(&mut self) {
        self.state = self.storage.load_or_default();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.tasks = reconcile(&self.courses, &self.state, self.today);
    }

    /// Write the whole state. Failures are only logged
    fn persist(&mut self) {
        if let Err(err) = self.storage.save(&self.state) {
            log::error!("Unable to save the task state: {}", err);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use async_trait::async_trait;

    use crate::course::{ScheduleItem, Semester, StudentRecord, TaskCategory};
    use crate::storage::MemoryStorage;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn biology() -> Course {
        Course::new("Biology".to_string(), "Dr. Darwin".to_string(), None, BTreeMap::new(), BTreeMap::new(), vec![
            ScheduleItem::new(day(2026, 10, 20), TaskCategory::Assignment, "Lab report".to_string(), None),
        ])
    }

    struct FailingSource;

    #[async_trait]
    impl StudentDataSource for FailingSource {
        async fn get_student_data(&self) -> Result<StudentRecord, Box<dyn Error>> {
            Err("connection refused".into())
        }
    }

    struct StaticSource(StudentRecord);

    #[async_trait]
    impl StudentDataSource for StaticSource {
        async fn get_student_data(&self) -> Result<StudentRecord, Box<dyn Error>> {
            Ok(self.0.clone())
        }
    }

    /// A storage that is always empty, and that cannot be written to
    #[derive(Debug)]
    struct ReadOnlyStorage {
        n_attempts: usize,
    }

    impl TaskStateStorage for ReadOnlyStorage {
        fn load(&self) -> Result<Option<TaskState>, Box<dyn Error>> {
            Ok(None)
        }

        fn save(&mut self, _state: &TaskState) -> Result<(), Box<dyn Error>> {
            self.n_attempts += 1;
            Err("disk full".into())
        }
    }

    #[test]
    fn write_errors_do_not_prevent_changes() {
        let _ = env_logger::builder().is_test(true).try_init();

        let storage = ReadOnlyStorage { n_attempts: 0 };
        let mut tracker = TaskTracker::new_at(vec![biology()], storage, day(2026, 10, 18));
        let id = tracker.tasks()[0].id().clone();

        assert_eq!(tracker.toggle_completion(&id), Some(true));
        assert!(tracker.task(&id).unwrap().completed());
        assert!(tracker.state().is_completed(&id));

        let custom_id = tracker.add_custom_task(NewTask::new("Biology".to_string(), "Flashcards".to_string(), day(2026, 10, 19))).unwrap();
        assert_eq!(tracker.tasks().len(), 2);
        assert!(tracker.state().custom_task(&custom_id).is_some());

        tracker.delete_custom_task(&custom_id).unwrap();
        assert_eq!(tracker.tasks().len(), 1);
        assert!(tracker.state().custom_tasks().is_empty());

        assert_eq!(tracker.storage().n_attempts, 3);
    }

    #[test]
    fn same_task_in_two_courses() {
        // The same course, listed in two semesters
        let mut tracker = TaskTracker::new_at(vec![biology(), biology()], MemoryStorage::new(), day(2026, 10, 18));
        let id = TaskId::from("Biology-Lab report-2026-10-20");
        assert_eq!(tracker.tasks().len(), 2);

        assert_eq!(tracker.toggle_completion(&id), Some(true));
        let flags: Vec<bool> = tracker.tasks().iter().map(|t| t.completed()).collect();
        assert_eq!(flags, vec![true, true]);
        assert!(tracker.state().is_completed(&id));

        tracker.reload();
        let flags: Vec<bool> = tracker.tasks().iter().map(|t| t.completed()).collect();
        assert_eq!(flags, vec![true, true]);

        assert_eq!(tracker.toggle_completion(&id), Some(false));
        assert!(tracker.tasks().iter().all(|t| t.completed() == false));
    }

    #[test]
    fn task_categories() {
        let tracker = TaskTracker::new_at(Vec::new(), MemoryStorage::new(), day(2026, 10, 18));
        assert_eq!(tracker.task_categories(), TaskCategory::ALL.to_vec());

        let mut tracker = TaskTracker::new_at(vec![biology()], MemoryStorage::new(), day(2026, 10, 18));
        tracker.add_custom_task(
            NewTask::new("Biology".to_string(), "Field trip".to_string(), day(2026, 10, 25)).with_category(TaskCategory::Project)
        ).unwrap();
        // No duplicates
        assert_eq!(tracker.task_categories(), vec![
            TaskCategory::Assignment, TaskCategory::Exam, TaskCategory::Quiz, TaskCategory::Project,
        ]);
    }

    #[test]
    fn unknown_task_is_not_persisted() {
        let mut tracker = TaskTracker::new_at(vec![biology()], MemoryStorage::new(), day(2026, 10, 18));
        assert_eq!(tracker.toggle_completion(&TaskId::from("nope")), None);
        assert_eq!(tracker.storage().n_writes(), 0);
    }

    #[test]
    fn setting_the_same_status_does_not_rewrite() {
        let mut tracker = TaskTracker::new_at(vec![biology()], MemoryStorage::new(), day(2026, 10, 18));
        let id = tracker.tasks()[0].id().clone();
        assert!(tracker.set_completion(&id, true));
        assert!(tracker.set_completion(&id, true));
        assert_eq!(tracker.storage().n_writes(), 1);
    }

    #[test]
    fn schedule_tasks_cannot_be_deleted() {
        let mut tracker = TaskTracker::new_at(vec![biology()], MemoryStorage::new(), day(2026, 10, 18));
        let id = tracker.tasks()[0].id().clone();
        assert!(tracker.delete_custom_task(&id).is_err());
        assert_eq!(tracker.tasks().len(), 1);
    }

    #[test]
    fn course_names_are_deduplicated() {
        let courses = vec![biology(), biology()];
        let tracker = TaskTracker::new_at(courses, MemoryStorage::new(), day(2026, 10, 18));
        assert_eq!(tracker.course_names(), vec!["Biology"]);
    }

    #[tokio::test]
    async fn refresh_keeps_courses_on_failure() {
        let mut tracker = TaskTracker::new_at(vec![biology()], MemoryStorage::new(), day(2026, 10, 18));
        assert_eq!(tracker.refresh(&FailingSource).await, false);
        assert_eq!(tracker.courses().len(), 1);

        let record = StudentRecord::new("Ada".to_string(), "ada@example.edu".to_string(), vec![
            Semester::new("semester_1".to_string(), vec![]),
        ]);
        assert!(tracker.refresh(&StaticSource(record)).await);
        assert!(tracker.courses().is_empty());
        assert!(tracker.tasks().is_empty());
    }
}
