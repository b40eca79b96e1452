//! Timetabling domain models.
//!
//! Provides the data types shared by every phase of a run: the records
//! loaded from input, the weekly grid, and the assignment being built.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | Meaning |
//! |-------------|------------|---------|
//! | Course | Class section | Unit placed on the grid |
//! | Student | Student / cohort | Enrollment set driving conflict edges |
//! | Slot | (day, start time) | Grid cell |
//! | Timetable | Weekly schedule | Course → slot assignment |

mod course;
mod grid;
mod student;
mod timetable;

pub use course::Course;
pub use grid::{Interval, Slot, TimeGrid, TimeOfDay};
pub use student::Student;
pub use timetable::Timetable;
