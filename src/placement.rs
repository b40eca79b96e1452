//! Placement validation.
//!
//! Decides whether a course may legally occupy a grid cell given the
//! courses already placed. This is the only place constraint logic lives:
//! the greedy assigner, the optimizer, and [`PlacementValidator::audit`]
//! all go through [`PlacementValidator::rejection`].
//!
//! # Rules (checked in order)
//!
//! 1. **Bounds**: the course must end by the day-end bound.
//! 2. **Conflict edge**: no graph neighbor may already sit on the same day.
//! 3. **Resource**: no other placed course sharing the lecturer or the room
//!    may overlap in time on the same day, whether or not the two are
//!    adjacent in the graph.

use serde::{Deserialize, Serialize};

use crate::graph::ConflictGraph;
use crate::models::{Slot, TimeGrid, Timetable};

/// Why a placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The course would run past the day-end bound (or the cell is off the grid).
    OutOfBounds,
    /// A conflicting course is already on the same day.
    SameDayConflict {
        /// Index of the conflicting course.
        with: usize,
    },
    /// A course sharing the lecturer or room overlaps in time.
    ResourceOverlap {
        /// Index of the overlapping course.
        with: usize,
    },
}

/// A constraint violation found in a finished timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Offending course.
    pub course_id: String,
    /// Other course involved, if any.
    pub other_id: Option<String>,
    /// Human-readable description.
    pub message: String,
}

/// Classification of timetable violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Course has no slot.
    Unplaced,
    /// Course runs past the day-end bound.
    OutOfBounds,
    /// Two adjacent courses share a day.
    SameDayConflict,
    /// Two courses sharing a lecturer or room overlap.
    ResourceOverlap,
}

/// Placement validator over a conflict graph and time grid.
#[derive(Debug, Clone, Copy)]
pub struct PlacementValidator<'a> {
    graph: &'a ConflictGraph,
    grid: &'a TimeGrid,
}

impl<'a> PlacementValidator<'a> {
    /// Creates a validator.
    pub fn new(graph: &'a ConflictGraph, grid: &'a TimeGrid) -> Self {
        Self { graph, grid }
    }

    /// Whether `course` may be placed at `slot`.
    ///
    /// The course's own current placement, if any, is ignored.
    pub fn is_safe(&self, course: usize, slot: Slot, timetable: &Timetable) -> bool {
        self.rejection(course, slot, timetable, None).is_none()
    }

    /// Like [`is_safe`](Self::is_safe) but treats `excluded` as unplaced.
    ///
    /// Used when exchanging two courses, so neither is checked against the
    /// other's former slot.
    pub fn is_safe_without(
        &self,
        course: usize,
        slot: Slot,
        timetable: &Timetable,
        excluded: usize,
    ) -> bool {
        self.rejection(course, slot, timetable, Some(excluded))
            .is_none()
    }

    /// First rule that refuses the placement, or `None` if it is legal.
    pub fn rejection(
        &self,
        course: usize,
        slot: Slot,
        timetable: &Timetable,
        excluded: Option<usize>,
    ) -> Option<Rejection> {
        let candidate = self.graph.course(course);

        let interval = match self.grid.interval(slot, candidate.credits) {
            Some(interval) if self.grid.within_bounds(interval.start, candidate.credits) => {
                interval
            }
            _ => return Some(Rejection::OutOfBounds),
        };

        let skip = |other: usize| other == course || Some(other) == excluded;

        for neighbor in self.graph.neighbors(course) {
            if skip(neighbor) {
                continue;
            }
            if let Some(placed) = timetable.slot(neighbor) {
                if placed.day == slot.day {
                    return Some(Rejection::SameDayConflict { with: neighbor });
                }
            }
        }

        for (other, placed) in timetable.on_day(slot.day) {
            if skip(other) {
                continue;
            }
            let other_course = self.graph.course(other);
            if !candidate.shares_resource(other_course) {
                continue;
            }
            let overlaps = self
                .grid
                .interval(placed, other_course.credits)
                .is_some_and(|other_interval| other_interval.overlaps(&interval));
            if overlaps {
                return Some(Rejection::ResourceOverlap { with: other });
            }
        }

        None
    }

    /// Re-validates a timetable, reporting every unplaced or illegally
    /// placed course.
    ///
    /// Each placed course is checked against all the others exactly as it
    /// would be at placement time, so a conflicting pair is reported from
    /// both sides.
    pub fn audit(&self, timetable: &Timetable) -> Vec<Violation> {
        let mut violations = Vec::new();

        for course in 0..self.graph.course_count() {
            let id = &self.graph.course(course).id;
            let Some(slot) = timetable.slot(course) else {
                violations.push(Violation {
                    violation_type: ViolationType::Unplaced,
                    course_id: id.clone(),
                    other_id: None,
                    message: format!("Course '{id}' has no slot"),
                });
                continue;
            };

            let violation = match self.rejection(course, slot, timetable, None) {
                None => continue,
                Some(Rejection::OutOfBounds) => Violation {
                    violation_type: ViolationType::OutOfBounds,
                    course_id: id.clone(),
                    other_id: None,
                    message: format!("Course '{id}' ends after {}", self.grid.day_end()),
                },
                Some(Rejection::SameDayConflict { with }) => {
                    let other = &self.graph.course(with).id;
                    Violation {
                        violation_type: ViolationType::SameDayConflict,
                        course_id: id.clone(),
                        other_id: Some(other.clone()),
                        message: format!("Courses '{id}' and '{other}' conflict on the same day"),
                    }
                }
                Some(Rejection::ResourceOverlap { with }) => {
                    let other = &self.graph.course(with).id;
                    Violation {
                        violation_type: ViolationType::ResourceOverlap,
                        course_id: id.clone(),
                        other_id: Some(other.clone()),
                        message: format!(
                            "Courses '{id}' and '{other}' share a lecturer or room and overlap"
                        ),
                    }
                }
            };
            violations.push(violation);
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimetableConfig;
    use crate::graph::EdgePolicy;
    use crate::models::{Course, Student};

    // Grid: Mon/Tue × 08:00, 09:00, 10:00, 11:00 (60-minute slots, end 12:00)
    fn grid() -> TimeGrid {
        let config = TimetableConfig::default()
            .with_bounds("08:00".parse().unwrap(), "12:00".parse().unwrap())
            .with_slot_duration(60)
            .with_days(vec!["Mon".into(), "Tue".into()]);
        TimeGrid::new(&config).unwrap()
    }

    fn course(id: &str, credits: i32, lecturer: &str, room: &str) -> Course {
        Course::new(id)
            .with_credits(credits)
            .with_lecturer(lecturer)
            .with_room(room)
    }

    // A–B share a student; A–C share a lecturer; D is independent.
    fn graph() -> ConflictGraph {
        let courses = vec![
            course("A", 2, "L1", "R1"),
            course("B", 1, "L2", "R2"),
            course("C", 2, "L1", "R3"),
            course("D", 1, "L4", "R4"),
        ];
        let students = vec![Student::new("S").with_courses(["A", "B"])];
        ConflictGraph::build(&courses, &students, EdgePolicy::SharedStudent)
    }

    #[test]
    fn test_bounds() {
        let (g, grid) = (graph(), grid());
        let v = PlacementValidator::new(&g, &grid);
        let t = Timetable::empty(4);
        assert!(v.is_safe(0, Slot::new(0, 2), &t)); // 10:00–12:00
        assert!(!v.is_safe(0, Slot::new(0, 3), &t)); // 11:00–13:00
        assert_eq!(v.rejection(0, Slot::new(0, 3), &t, None), Some(Rejection::OutOfBounds));
        assert!(!v.is_safe(0, Slot::new(2, 0), &t)); // off-grid day
    }

    #[test]
    fn test_conflict_edge_forbids_same_day() {
        let (g, grid) = (graph(), grid());
        let v = PlacementValidator::new(&g, &grid);
        let mut t = Timetable::empty(4);
        t.place(0, Slot::new(0, 0)); // A Mon 08:00–10:00

        // B is adjacent to A: refused anywhere on Monday, even without overlap
        assert_eq!(
            v.rejection(1, Slot::new(0, 3), &t, None),
            Some(Rejection::SameDayConflict { with: 0 })
        );
        assert!(v.is_safe(1, Slot::new(1, 0), &t));
    }

    #[test]
    fn test_resource_overlap_without_edge() {
        let (g, grid) = (graph(), grid());
        let v = PlacementValidator::new(&g, &grid);
        let mut t = Timetable::empty(4);
        t.place(0, Slot::new(0, 0)); // A Mon 08:00–10:00, lecturer L1

        // C shares L1: overlapping start refused, adjacent start allowed
        assert_eq!(
            v.rejection(2, Slot::new(0, 1), &t, None),
            Some(Rejection::ResourceOverlap { with: 0 })
        );
        assert!(v.is_safe(2, Slot::new(0, 2), &t)); // 10:00, touches A's end
        // D shares nothing: simultaneous placement is fine
        assert!(v.is_safe(3, Slot::new(0, 0), &t));
    }

    #[test]
    fn test_own_slot_ignored() {
        let (g, grid) = (graph(), grid());
        let v = PlacementValidator::new(&g, &grid);
        let mut t = Timetable::empty(4);
        t.place(0, Slot::new(0, 0));
        // Re-checking A at an overlapping cell must not collide with itself
        assert!(v.is_safe(0, Slot::new(0, 1), &t));
    }

    #[test]
    fn test_excluded_course_ignored() {
        let (g, grid) = (graph(), grid());
        let v = PlacementValidator::new(&g, &grid);
        let mut t = Timetable::empty(4);
        t.place(0, Slot::new(0, 0));
        t.place(1, Slot::new(1, 0));

        assert!(!v.is_safe(1, Slot::new(0, 2), &t));
        assert!(v.is_safe_without(1, Slot::new(0, 2), &t, 0));
    }

    #[test]
    fn test_audit() {
        let (g, grid) = (graph(), grid());
        let v = PlacementValidator::new(&g, &grid);

        let mut t = Timetable::empty(4);
        t.place(0, Slot::new(0, 0));
        t.place(1, Slot::new(1, 0));
        t.place(2, Slot::new(0, 2));
        assert_eq!(v.audit(&t).len(), 1); // D unplaced
        assert_eq!(v.audit(&t)[0].violation_type, ViolationType::Unplaced);

        t.place(3, Slot::new(1, 3));
        assert!(v.audit(&t).is_empty());

        // Force B onto Monday next to A
        t.place(1, Slot::new(0, 3));
        let violations = v.audit(&t);
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|x| x.violation_type == ViolationType::SameDayConflict));
    }
}
