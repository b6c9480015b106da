//! Course data extracted from a syllabus document
//!
//! The assistant service reads a syllabus PDF and returns the course it describes.
//! The student may edit it before it is saved back to the student record.

use std::collections::BTreeMap;
use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::course::{Course, ScheduleItem};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyllabusData {
    pub course_name: String,
    #[serde(default)]
    pub instructor_name: String,
    #[serde(default)]
    pub schedule: Vec<ScheduleItem>,
    /// Category -> weight, in percent
    #[serde(default)]
    pub marks_distribution: BTreeMap<String, f64>,
}

impl SyllabusData {
    /// Parse the raw text answered by a language model.
    ///
    /// Models tend to wrap JSON in a Markdown code block even when asked not to, so it is stripped first.
    pub fn from_model_text(text: &str) -> Result<Self, Box<dyn Error>> {
        let json = strip_code_fences(text);
        match serde_json::from_str(json) {
            Ok(data) => Ok(data),
            Err(err) => Err(format!("Invalid syllabus data: {}", err).into()),
        }
    }

    /// The course this syllabus describes. It has no marks yet
    pub fn into_course(self) -> Course {
        Course::new(self.course_name, self.instructor_name, None, self.marks_distribution, BTreeMap::new(), self.schedule)
    }
}

/// Remove a surrounding ```` ```json ```` (or plain ```` ``` ````) block, if any
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}
