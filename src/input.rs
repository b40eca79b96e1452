//! JSON problem documents.
//!
//! A problem document bundles configuration, course records, and student
//! enrollments:
//!
//! ```json
//! {
//!   "config": { "day_start": "07:30", "days": ["Monday", "Tuesday"] },
//!   "courses": { "MK01": { "credits": 3, "lecturer": "D01", "room": "R01" } },
//!   "students": { "S1": ["MK01"] }
//! }
//! ```
//!
//! `config` and every field in it are optional. Maps are ordered by key,
//! so a document always converts to the same request.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::TimetableConfig;
use crate::error::{Result, TimetableError};
use crate::models::{Course, Student};
use crate::scheduler::TimetableRequest;

/// One course entry, keyed by course ID in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Credit count.
    pub credits: i32,
    /// Lecturer identifier.
    pub lecturer: String,
    /// Required room identifier.
    pub room: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// A complete problem description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemDocument {
    /// Run configuration.
    #[serde(default)]
    pub config: TimetableConfig,
    /// Courses by ID.
    pub courses: BTreeMap<String, CourseRecord>,
    /// Enrolled course IDs by student ID.
    #[serde(default)]
    pub students: BTreeMap<String, BTreeSet<String>>,
}

impl ProblemDocument {
    /// Parses a document from JSON text.
    ///
    /// # Errors
    /// `Document` if the text is not a valid problem document (including
    /// malformed `HH:MM` times).
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| TimetableError::Document(e.to_string()))
    }

    /// Serializes the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TimetableError::Document(e.to_string()))
    }

    /// Course models in ID order.
    pub fn courses(&self) -> Vec<Course> {
        self.courses
            .iter()
            .map(|(id, record)| {
                Course::new(id.as_str())
                    .with_name(record.name.as_str())
                    .with_credits(record.credits)
                    .with_lecturer(record.lecturer.as_str())
                    .with_room(record.room.as_str())
            })
            .collect()
    }

    /// Student models in ID order.
    pub fn students(&self) -> Vec<Student> {
        self.students
            .iter()
            .map(|(id, courses)| Student::new(id.as_str()).with_courses(courses.iter().cloned()))
            .collect()
    }

    /// Converts the document into a solver request.
    pub fn into_request(self) -> TimetableRequest {
        let courses = self.courses();
        let students = self.students();
        TimetableRequest::new(courses, students).with_config(self.config)
    }

    /// Builds a document from a request.
    ///
    /// Later duplicates of a course or student ID replace earlier ones.
    pub fn from_request(request: &TimetableRequest) -> Self {
        let courses = request
            .courses
            .iter()
            .map(|c| {
                let record = CourseRecord {
                    credits: c.credits,
                    lecturer: c.lecturer.clone(),
                    room: c.room.clone(),
                    name: c.name.clone(),
                };
                (c.id.clone(), record)
            })
            .collect();
        let students = request
            .students
            .iter()
            .map(|s| (s.id.clone(), s.courses.clone()))
            .collect();
        Self {
            config: request.config.clone(),
            courses,
            students,
        }
    }
}
