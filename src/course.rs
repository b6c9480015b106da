//! Courses and student records, as served by the student-data service
//!
//! Records coming from the service are loosely shaped JSON. This module is the boundary
//! that turns them into validated types: anything that does not match is either rejected
//! with an error (for the record itself) or skipped with a warning (for a single course).

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix of the record keys that hold a semester
const SEMESTER_KEY_PREFIX: &str = "semester_";


/// The kinds of schedule items that are tracked as tasks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Assignment,
    Exam,
    Quiz,
    Project,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 4] = [
        TaskCategory::Assignment,
        TaskCategory::Exam,
        TaskCategory::Quiz,
        TaskCategory::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Assignment => "assignment",
            TaskCategory::Exam => "exam",
            TaskCategory::Quiz => "quiz",
            TaskCategory::Project => "project",
        }
    }

    /// Returns the category with this exact name, if any
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|cat| cat.as_str() == name)
    }
}

impl Display for TaskCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}


/// The `type` of a schedule item.
///
/// Items such as lectures are part of a schedule, but only the [`TaskCategory`] ones are tasks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    Task(TaskCategory),
    Other(String),
}

impl ItemKind {
    pub fn task_category(&self) -> Option<TaskCategory> {
        match self {
            ItemKind::Task(cat) => Some(*cat),
            ItemKind::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Task(cat) => cat.as_str(),
            ItemKind::Other(name) => name,
        }
    }
}

impl From<String> for ItemKind {
    fn from(name: String) -> Self {
        match TaskCategory::from_name(&name) {
            Some(cat) => ItemKind::Task(cat),
            None => ItemKind::Other(name),
        }
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> String {
        match kind {
            ItemKind::Task(cat) => cat.as_str().to_string(),
            ItemKind::Other(name) => name,
        }
    }
}

impl From<TaskCategory> for ItemKind {
    fn from(cat: TaskCategory) -> Self {
        ItemKind::Task(cat)
    }
}


/// A dated entry of a course schedule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    date: NaiveDate,
    #[serde(rename = "type")]
    kind: ItemKind,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Free-form time of day, e.g. `10:30 AM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<String>,
}

impl ScheduleItem {
    pub fn new<K: Into<ItemKind>>(date: NaiveDate, kind: K, title: String, description: Option<String>) -> Self {
        Self { date, kind: kind.into(), title, description, time: None }
    }

    pub fn with_time(mut self, time: String) -> Self {
        self.time = Some(time);
        self
    }

    pub fn date(&self) -> NaiveDate     { self.date }
    pub fn kind(&self) -> &ItemKind     { &self.kind }
    pub fn title(&self) -> &str         { &self.title }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn time(&self) -> Option<&str>  { self.time.as_deref() }
}


/// A course, as described by the student-data service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCourse")]
pub struct Course {
    #[serde(rename = "course_name")]
    name: String,
    #[serde(rename = "instructor_name")]
    instructor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    grade: Option<String>,
    /// Category -> weight, in percent of the final grade
    marks_distribution: BTreeMap<String, f64>,
    /// Category -> obtained mark, in percent of that category
    current_marks: BTreeMap<String, f64>,
    schedule: Vec<ScheduleItem>,
}

/// The wire shape of a course.
/// Depending on the endpoint version, the course name comes as `course_name` or as `name`.
#[derive(Deserialize)]
struct RawCourse {
    #[serde(default)]
    course_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    instructor_name: Option<String>,
    #[serde(default)]
    grade: Option<String>,
    #[serde(default)]
    marks_distribution: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    current_marks: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    schedule: Option<Vec<ScheduleItem>>,
}

impl TryFrom<RawCourse> for Course {
    type Error = String;

    fn try_from(raw: RawCourse) -> Result<Self, Self::Error> {
        let name = raw.course_name.or(raw.name)
            .filter(|name| name.is_empty() == false)
            .ok_or_else(|| "course has no name".to_string())?;

        Ok(Self {
            name,
            instructor: raw.instructor_name.unwrap_or_default(),
            grade: raw.grade.filter(|g| g.is_empty() == false),
            marks_distribution: raw.marks_distribution.unwrap_or_default(),
            current_marks: raw.current_marks.unwrap_or_default(),
            schedule: raw.schedule.unwrap_or_default(),
        })
    }
}

impl Course {
    pub fn new(name: String, instructor: String, grade: Option<String>,
               marks_distribution: BTreeMap<String, f64>, current_marks: BTreeMap<String, f64>,
               schedule: Vec<ScheduleItem>,
    ) -> Self
    {
        Self { name, instructor, grade, marks_distribution, current_marks, schedule }
    }

    pub fn name(&self) -> &str                  { &self.name }
    pub fn instructor(&self) -> &str            { &self.instructor }
    /// The letter grade reported by the school, if any
    pub fn grade(&self) -> Option<&str>         { self.grade.as_deref() }
    pub fn marks_distribution(&self) -> &BTreeMap<String, f64> { &self.marks_distribution }
    pub fn current_marks(&self) -> &BTreeMap<String, f64>      { &self.current_marks }
    pub fn schedule(&self) -> &[ScheduleItem]   { &self.schedule }

    /// The schedule items that are tasks, along with their category
    pub fn task_items(&self) -> impl Iterator<Item = (TaskCategory, &ScheduleItem)> {
        self.schedule.iter()
            .filter_map(|item| item.kind().task_category().map(|cat| (cat, item)))
    }
}


/// The courses of a semester
#[derive(Clone, Debug, PartialEq)]
pub struct Semester {
    key: String,
    courses: Vec<Course>,
}

impl Semester {
    pub fn new(key: String, courses: Vec<Course>) -> Self {
        Self { key, courses }
    }

    /// The record key of this semester, e.g. `semester_1`
    pub fn key(&self) -> &str { &self.key }
    pub fn courses(&self) -> &[Course] { &self.courses }
}


/// A student record, as returned by `GET /api/get_student_data`
#[derive(Clone, Debug, PartialEq)]
pub struct StudentRecord {
    name: String,
    email: String,
    semesters: Vec<Semester>,
}

impl StudentRecord {
    pub fn new(name: String, email: String, semesters: Vec<Semester>) -> Self {
        Self { name, email, semesters }
    }

    /// Parse a student record.
    ///
    /// Returns an error in case the record itself is malformed. Courses that cannot be parsed are skipped (and logged).
    pub fn from_json(value: Value) -> Result<Self, Box<dyn Error>> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(format!("Student record must be a JSON object, got {}", json_type_name(&other)).into()),
        };

        let name = required_str(&map, "name")?;
        let email = required_str(&map, "email")?;

        let mut semesters = Vec::new();
        for (key, semester) in map.iter() {
            if key.starts_with(SEMESTER_KEY_PREFIX) == false {
                continue;
            }

            let courses = match semester.get("courses") {
                None | Some(Value::Null) => {
                    log::debug!("Semester {} has no courses", key);
                    continue;
                },
                Some(Value::Array(courses)) => courses,
                Some(other) => {
                    return Err(format!("Courses of {} must be an array, got {}", key, json_type_name(other)).into());
                },
            };

            let mut parsed = Vec::with_capacity(courses.len());
            for (index, course) in courses.iter().enumerate() {
                match serde_json::from_value::<Course>(course.clone()) {
                    Ok(c) => parsed.push(c),
                    Err(err) => {
                        log::warn!("Course #{} of {} is invalid ({}). Ignoring it.", index, key, err);
                    },
                }
            }
            semesters.push(Semester::new(key.clone(), parsed));
        }

        Ok(Self { name, email, semesters })
    }

    pub fn from_json_str(text: &str) -> Result<Self, Box<dyn Error>> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(value)
    }

    pub fn name(&self) -> &str  { &self.name }
    pub fn email(&self) -> &str { &self.email }
    pub fn semesters(&self) -> &[Semester] { &self.semesters }

    /// Every course of every semester
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.semesters.iter().flat_map(|sem| sem.courses.iter())
    }

    pub fn all_courses(&self) -> Vec<Course> {
        self.courses().cloned().collect()
    }
}

fn required_str(map: &serde_json::Map<String, Value>, field: &str) -> Result<String, Box<dyn Error>> {
    match map.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(format!("Field '{}' must be a string, got {}", field, json_type_name(other)).into()),
        None => Err(format!("Missing field '{}' in student record", field).into()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> Value {
        json!({
            "name": "Ada",
            "email": "ada@example.edu",
            "gpa": 3.9,
            "semester_1": {
                "courses": [
                    {
                        "course_name": "Data Structures",
                        "instructor_name": "Dr. Knuth",
                        "grade": "A-",
                        "marks_distribution": { "assignment": 40, "exam": 60 },
                        "current_marks": { "assignment": 90 },
                        "schedule": [
                            { "date": "2026-10-20", "type": "assignment", "title": "Linked lists" },
                            { "date": "2026-10-21", "type": "lecture", "title": "Trees", "time": "10:00 AM" }
                        ]
                    },
                    { "name": "Compilers", "schedule": [] },
                    { "instructor_name": "Nobody" }
                ]
            },
            "semester_2": {}
        })
    }

    #[test]
    fn parse_student_record() {
        let record = StudentRecord::from_json(sample_record()).unwrap();
        assert_eq!(record.name(), "Ada");
        assert_eq!(record.email(), "ada@example.edu");
        assert_eq!(record.semesters().len(), 1);

        let courses = record.all_courses();
        // The nameless course is skipped
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].name(), "Data Structures");
        assert_eq!(courses[0].grade(), Some("A-"));
        assert_eq!(courses[0].marks_distribution().get("exam"), Some(&60.0));
        assert_eq!(courses[1].name(), "Compilers");
        assert_eq!(courses[1].instructor(), "");
    }

    #[test]
    fn only_task_kinds_are_task_items() {
        let record = StudentRecord::from_json(sample_record()).unwrap();
        let courses = record.all_courses();
        let course = &courses[0];
        assert_eq!(course.schedule().len(), 2);

        let tasks: Vec<_> = course.task_items().collect();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].0, TaskCategory::Assignment);
        assert_eq!(course.schedule()[1].kind(), &ItemKind::Other("lecture".to_string()));
        assert_eq!(course.schedule()[1].time(), Some("10:00 AM"));
    }

    #[test]
    fn semesters_keep_the_record_order() {
        let record = StudentRecord::from_json_str(r#"{
            "name": "Ada",
            "email": "ada@example.edu",
            "semester_2": { "courses": [ { "course_name": "Networks" } ] },
            "semester_10": { "courses": [ { "course_name": "Thesis" } ] },
            "semester_1": { "courses": [ { "course_name": "Calculus" } ] }
        }"#).unwrap();

        let keys: Vec<&str> = record.semesters().iter().map(|s| s.key()).collect();
        assert_eq!(keys, vec!["semester_2", "semester_10", "semester_1"]);
        let names: Vec<&str> = record.courses().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Networks", "Thesis", "Calculus"]);
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert!(StudentRecord::from_json(json!([1, 2, 3])).is_err());
        assert!(StudentRecord::from_json(json!({ "email": "a@b.c" })).is_err());
        assert!(StudentRecord::from_json(json!({ "name": "A", "email": "a@b.c", "semester_1": { "courses": 12 } })).is_err());
        assert!(StudentRecord::from_json_str("not json").is_err());
    }

    #[test]
    fn item_kind_serde() {
        let kind: ItemKind = serde_json::from_str("\"exam\"").unwrap();
        assert_eq!(kind, ItemKind::Task(TaskCategory::Exam));
        let kind: ItemKind = serde_json::from_str("\"Exam\"").unwrap();
        assert_eq!(kind, ItemKind::Other("Exam".to_string()));
        assert_eq!(serde_json::to_string(&ItemKind::Task(TaskCategory::Quiz)).unwrap(), "\"quiz\"");
    }
}
