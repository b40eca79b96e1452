//! Student (or cohort) model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A student or cohort and the courses it is enrolled in.
///
/// Two courses sharing any student become a conflict edge: they must be
/// taught on different days. Enrollment is kept ordered so iteration is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student/cohort identifier.
    pub id: String,
    /// Enrolled course identifiers.
    pub courses: BTreeSet<String>,
}

impl Student {
    /// Creates a student with no enrollments.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            courses: BTreeSet::new(),
        }
    }

    /// Enrolls the student in a course.
    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.courses.insert(course_id.into());
        self
    }

    /// Enrolls the student in several courses.
    pub fn with_courses<I, S>(mut self, course_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.courses.extend(course_ids.into_iter().map(Into::into));
        self
    }

    /// Whether the student takes the given course.
    pub fn enrolls(&self, course_id: &str) -> bool {
        self.courses.contains(course_id)
    }
}
