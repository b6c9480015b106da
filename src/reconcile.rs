//! Merges course schedules and the locally persisted task state into a single task list

use chrono::NaiveDate;

use crate::course::Course;
use crate::state::TaskState;
use crate::task::Task;

/// Build the task list: tasks derived from every course schedule, then the custom tasks,
/// sorted by due date and priority.
///
/// `today` is used to derive the priority of schedule tasks.
pub fn reconcile(courses: &[Course], state: &TaskState, today: NaiveDate) -> Vec<Task> {
    let mut tasks = schedule_tasks(courses, state, today);
    tasks.extend(custom_tasks(state));
    sort_tasks(&mut tasks);
    log::debug!("Reconciled {} tasks ({} custom)", tasks.len(), state.custom_tasks().len());
    tasks
}

/// The tasks derived from the course schedules, in schedule order
pub fn schedule_tasks(courses: &[Course], state: &TaskState, today: NaiveDate) -> Vec<Task> {
    let mut tasks = Vec::new();
    for course in courses {
        for (category, item) in course.task_items() {
            let mut task = Task::from_schedule_item(course.name(), category, item, false, today);
            let completed = state.is_completed(task.id());
            task.set_completed(completed);
            tasks.push(task);
        }
    }
    tasks
}

/// The custom tasks of the persisted state
pub fn custom_tasks(state: &TaskState) -> Vec<Task> {
    state.custom_tasks().iter()
        .map(|custom| Task::from_custom(custom, state.is_completed(custom.id())))
        .collect()
}

/// Sort tasks by due date, then by priority (most urgent first).
/// The sort is stable, so that tasks that compare equal keep their relative order
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.date().cmp(&b.date())
            .then_with(|| a.priority().cmp(&b.priority()))
    });
}
