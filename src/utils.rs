//! Some utility functions

use chrono::NaiveDate;

use crate::agenda::{days_until_label, AgendaEntry};
use crate::progress::ProgressReport;
use crate::task::{Priority, Task};

/// A debug utility that pretty-prints a task
pub fn print_task(task: &Task, today: NaiveDate) {
    let completion = if task.completed() { "✓" } else { " " };
    let priority = match task.priority() {
        Priority::High => "!!!",
        Priority::Medium => "!! ",
        Priority::Low => "!  ",
    };
    let custom = if task.is_custom() { "*" } else { " " };
    println!("    {}{} {} {}\t[{}] {} ({})\t{}",
        completion, custom, priority, task.date(), task.course_name(), task.title(),
        days_until_label(task.date(), today), task.id());
}

pub fn print_task_list<'a, I>(tasks: I, today: NaiveDate)
where
    I: IntoIterator<Item = &'a Task>,
{
    for task in tasks {
        print_task(task, today);
    }
}

pub fn print_agenda_entry(entry: &AgendaEntry) {
    let time = entry.item.time().unwrap_or("");
    println!("    {} {:>8}  {:<10} [{}] {}",
        entry.date(), time, entry.item.kind().as_str(), entry.course_name, entry.item.title());
}

/// A debug utility that pretty-prints grades and task completion
pub fn print_progress(report: &ProgressReport) {
    for course in &report.courses {
        let grade = match &course.reported_grade {
            Some(g) => format!("{} (calculated {})", g, course.calculated_grade),
            None => course.calculated_grade.to_string(),
        };
        println!("COURSE {}: {}, {:.1}% of graded work, {}/{} tasks done",
            course.course_name, grade, course.percentage(), course.completed_tasks, course.total_tasks);
        for (category, marks) in &course.marks {
            println!("    {:<12} {:>5.1}% (weight {}%)", category, marks.obtained, marks.total);
        }
    }
    println!("OVERALL: average grade {}, {}/{} tasks done ({:.0}%)",
        report.overall.average_grade, report.overall.completed_tasks, report.overall.total_tasks,
        report.overall.average_completion);
}

