//! Course model.
//!
//! A course is the unit being placed on the weekly grid. Its credit count
//! is the number of consecutive grid steps it occupies; its lecturer and
//! room are the shared resources checked for same-day overlap.

use serde::{Deserialize, Serialize};

/// A course to be timetabled.
///
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Human-readable name (optional).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Credit count: duration in base slots. Must be positive.
    pub credits: i32,
    /// Lecturer identifier.
    pub lecturer: String,
    /// Required room identifier.
    pub room: String,
}

impl Course {
    /// Creates a course with one credit and no lecturer or room.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            credits: 1,
            lecturer: String::new(),
            room: String::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the credit count.
    pub fn with_credits(mut self, credits: i32) -> Self {
        self.credits = credits;
        self
    }

    /// Sets the lecturer.
    pub fn with_lecturer(mut self, lecturer: impl Into<String>) -> Self {
        self.lecturer = lecturer.into();
        self
    }

    /// Sets the required room.
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    /// Whether two courses compete for the same lecturer or room.
    pub fn shares_resource(&self, other: &Course) -> bool {
        self.lecturer == other.lecturer || self.room == other.room
    }
}
