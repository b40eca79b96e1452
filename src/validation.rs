//! Input validation for timetabling problems.
//!
//! Checks the loaded records and configuration before the conflict graph
//! is built. Detects:
//! - Duplicate course or student IDs
//! - Non-positive credit counts
//! - Enrollments naming unknown courses
//! - Invalid configuration values (empty or duplicate days, negative weight)
//!
//! All problems are collected and reported together so one run surfaces
//! every offending course.
//!
//! Courses longer than the teaching day are not fatal: [`oversized_courses`]
//! reports them as diagnostics and the greedy assigner lists them as
//! unplaced.

use crate::config::TimetableConfig;
use crate::error::TimetableError;
use crate::models::{Course, Student};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A course has a non-positive credit count.
    InvalidCredits,
    /// A course is longer than the whole teaching day.
    CourseTooLong,
    /// A student is enrolled in a course that doesn't exist.
    UnknownCourse,
    /// A configuration value is out of range.
    InvalidConfig,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a timetabling problem.
///
/// Checks:
/// 1. No duplicate course IDs
/// 2. No duplicate student IDs
/// 3. Every course has a positive credit count
/// 4. Every enrollment references an existing course
/// 5. The day list is non-empty and has no duplicates
/// 6. The student weight is finite and non-negative
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    courses: &[Course],
    students: &[Student],
    config: &TimetableConfig,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut course_ids = HashSet::new();
    for course in courses {
        if !course_ids.insert(course.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course ID: {}", course.id),
            ));
        }

        if course.credits <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCredits,
                format!(
                    "Course '{}' has non-positive credit count {}",
                    course.id, course.credits
                ),
            ));
        }
    }

    let mut student_ids = HashSet::new();
    for student in students {
        if !student_ids.insert(student.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate student ID: {}", student.id),
            ));
        }

        for course_id in &student.courses {
            if !course_ids.contains(course_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownCourse,
                    format!(
                        "Student '{}' enrolls in unknown course '{}'",
                        student.id, course_id
                    ),
                ));
            }
        }
    }

    errors.extend(validate_config(config));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Converts a validation result into the crate error type.
pub fn ensure_valid(
    courses: &[Course],
    students: &[Student],
    config: &TimetableConfig,
) -> crate::error::Result<()> {
    validate_input(courses, students, config).map_err(TimetableError::Validation)
}

/// Lists courses with positive credits that are longer than the day window.
///
/// These can never be placed; the result is diagnostic only.
pub fn oversized_courses(courses: &[Course], config: &TimetableConfig) -> Vec<ValidationError> {
    let window = config
        .day_end
        .minutes()
        .saturating_sub(config.day_start.minutes());

    courses
        .iter()
        .filter(|c| {
            c.credits > 0
                && (c.credits as u64) * (config.slot_duration_minutes as u64) > window as u64
        })
        .map(|c| {
            ValidationError::new(
                ValidationErrorKind::CourseTooLong,
                format!(
                    "Course '{}' ({} credits) does not fit between {} and {}",
                    c.id, c.credits, config.day_start, config.day_end
                ),
            )
        })
        .collect()
}

/// Checks configuration values (day list, student weight).
pub fn validate_config(config: &TimetableConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.days.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidConfig,
            "Day list is empty",
        ));
    }

    let mut seen = HashSet::new();
    for day in &config.days {
        if !seen.insert(day.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate day: {day}"),
            ));
        }
    }

    if !config.student_weight.is_finite() || config.student_weight < 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidConfig,
            format!(
                "Student weight must be non-negative, got {}",
                config.student_weight
            ),
        ));
    }

    errors
}
