//! Grades and task completion statistics

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::course::Course;
use crate::state::TaskState;
use crate::task::TaskId;


/// A letter grade
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// The grade matching a percentage of the marks
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 { LetterGrade::A }
        else if percentage >= 80.0 { LetterGrade::B }
        else if percentage >= 70.0 { LetterGrade::C }
        else if percentage >= 60.0 { LetterGrade::D }
        else { LetterGrade::F }
    }

    /// The grade matching an average of grade points (see [`Self::points`])
    pub fn from_points(points: f64) -> Self {
        if points >= 3.5 { LetterGrade::A }
        else if points >= 2.5 { LetterGrade::B }
        else if points >= 1.5 { LetterGrade::C }
        else if points >= 0.5 { LetterGrade::D }
        else { LetterGrade::F }
    }

    pub fn points(&self) -> u8 {
        match self {
            LetterGrade::A => 4,
            LetterGrade::B => 3,
            LetterGrade::C => 2,
            LetterGrade::D => 1,
            LetterGrade::F => 0,
        }
    }
}

impl Display for LetterGrade {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let s = match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        };
        write!(f, "{}", s)
    }
}

/// Grade points of a reported grade such as `B+`. Only its first letter counts
pub fn reported_grade_points(grade: &str) -> u8 {
    match grade.chars().next() {
        Some('A') => 4,
        Some('B') => 3,
        Some('C') => 2,
        Some('D') => 1,
        _ => 0,
    }
}


/// Marks of a single category (assignments, exams...) of a course
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryMarks {
    /// Obtained mark, in percent of this category
    pub obtained: f64,
    /// Weight of this category, in percent of the final grade
    pub total: f64,
}

impl CategoryMarks {
    /// What this category contributes to the final grade
    pub fn weighted(&self) -> f64 {
        self.obtained / 100.0 * self.total
    }
}


#[derive(Clone, Debug, PartialEq)]
pub struct CourseProgress {
    pub course_name: String,
    pub reported_grade: Option<String>,
    pub calculated_grade: LetterGrade,
    pub marks_obtained: f64,
    pub marks_total: f64,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub marks: BTreeMap<String, CategoryMarks>,
}

impl CourseProgress {
    /// Weighted marks, in percent of the graded weight so far
    pub fn percentage(&self) -> f64 {
        match self.marks_total > 0.0 {
            true => self.marks_obtained / self.marks_total * 100.0,
            false => 0.0,
        }
    }

    /// Grade points of the reported grade, or of the calculated one if none is reported
    pub fn grade_points(&self) -> u8 {
        match &self.reported_grade {
            Some(grade) => reported_grade_points(grade),
            None => self.calculated_grade.points(),
        }
    }
}


#[derive(Clone, Debug, PartialEq)]
pub struct OverallProgress {
    pub average_grade: LetterGrade,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    /// Percentage of completed tasks, 0 when there are no tasks at all
    pub average_completion: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressReport {
    pub courses: Vec<CourseProgress>,
    pub overall: OverallProgress,
}

impl ProgressReport {
    pub fn course(&self, name: &str) -> Option<&CourseProgress> {
        self.courses.iter().find(|c| c.course_name == name)
    }
}


/// Compute the progress of a single course
///
/// Tasks are the schedule tasks of this course and the custom tasks attached to it.
pub fn course_progress(course: &Course, state: &TaskState) -> CourseProgress {
    let mut marks = BTreeMap::new();
    let mut marks_obtained = 0.0;
    let mut marks_total = 0.0;
    for (category, weight) in course.marks_distribution() {
        let obtained = course.current_marks().get(category).copied().unwrap_or(0.0);
        let category_marks = CategoryMarks { obtained, total: *weight };
        marks_obtained += category_marks.weighted();
        marks_total += weight;
        marks.insert(category.clone(), category_marks);
    }

    let mut completed_tasks = 0;
    let mut total_tasks = 0;
    for (_category, item) in course.task_items() {
        total_tasks += 1;
        if state.is_completed(&TaskId::for_schedule_item(course.name(), item)) {
            completed_tasks += 1;
        }
    }
    for custom in state.custom_tasks().iter().filter(|t| t.course_name() == course.name()) {
        total_tasks += 1;
        if state.is_completed(custom.id()) {
            completed_tasks += 1;
        }
    }

    let percentage = match marks_total > 0.0 {
        true => marks_obtained / marks_total * 100.0,
        false => 0.0,
    };

    CourseProgress {
        course_name: course.name().to_string(),
        reported_grade: course.grade().map(|g| g.to_string()),
        calculated_grade: LetterGrade::from_percentage(percentage),
        marks_obtained,
        marks_total,
        completed_tasks,
        total_tasks,
        marks,
    }
}

/// Compute the progress of every course, and the overall progress
pub fn progress_report(courses: &[Course], state: &TaskState) -> ProgressReport {
    let courses: Vec<CourseProgress> = courses.iter()
        .map(|course| course_progress(course, state))
        .collect();

    let completed_tasks: usize = courses.iter().map(|c| c.completed_tasks).sum();
    let total_tasks: usize = courses.iter().map(|c| c.total_tasks).sum();
    let grade_points: u32 = courses.iter().map(|c| c.grade_points() as u32).sum();

    let average_points = match courses.is_empty() {
        true => 0.0,
        false => grade_points as f64 / courses.len() as f64,
    };
    let average_completion = match total_tasks {
        0 => 0.0,
        n => completed_tasks as f64 / n as f64 * 100.0,
    };

    ProgressReport {
        overall: OverallProgress {
            average_grade: LetterGrade::from_points(average_points),
            completed_tasks,
            total_tasks,
            average_completion,
        },
        courses,
    }
}
