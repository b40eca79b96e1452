//! Degree-ordered greedy initial assignment.
//!
//! # Algorithm
//!
//! 1. Order courses by descending conflict degree (ties: course ID).
//! 2. For each course, collect every grid cell the placement validator
//!    accepts.
//! 3. Pick the accepted cell with the lowest usage count; ties go to the
//!    cell whose day holds the fewest courses so far, then to grid order.
//! 4. Increment the chosen cell's usage. A course with no accepted cell is
//!    recorded as unplaced and the run continues.
//!
//! # Complexity
//! O(n · c · n) where n = courses and c = grid cells (each safety check
//! scans the courses already placed).
//!
//! # Reference
//! Welsh & Powell (1967), "An upper bound for the chromatic number of a
//! graph and its application to timetabling problems"

use tracing::{debug, warn};

use crate::error::{Result, TimetableError};
use crate::graph::ConflictGraph;
use crate::models::{TimeGrid, Timetable};
use crate::placement::PlacementValidator;

/// Result of the greedy phase.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyOutcome {
    /// Assignment produced (partial if `unplaced` is non-empty).
    pub timetable: Timetable,
    /// IDs of courses that found no legal cell, in placement order.
    pub unplaced: Vec<String>,
}

impl GreedyOutcome {
    /// Whether every course was placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Returns the timetable if complete.
    ///
    /// # Errors
    /// `PartialAssignmentFailure` listing the unplaced courses.
    pub fn into_complete(self) -> Result<Timetable> {
        if self.unplaced.is_empty() {
            Ok(self.timetable)
        } else {
            Err(TimetableError::PartialAssignmentFailure {
                unplaced: self.unplaced,
            })
        }
    }
}

/// Greedy initial assigner.
///
/// # Example
///
/// ```
/// use u_timetable::config::TimetableConfig;
/// use u_timetable::graph::{ConflictGraph, EdgePolicy};
/// use u_timetable::models::{Course, Slot, TimeGrid};
/// use u_timetable::scheduler::GreedyAssigner;
///
/// let courses = vec![
///     Course::new("MK01").with_credits(2).with_lecturer("D01").with_room("R01"),
///     Course::new("MK02").with_credits(3).with_lecturer("D02").with_room("R02"),
/// ];
/// let graph = ConflictGraph::build(&courses, &[], EdgePolicy::SharedStudent);
/// let grid = TimeGrid::new(&TimetableConfig::default()).unwrap();
///
/// let outcome = GreedyAssigner::new(&graph, &grid).assign();
/// assert!(outcome.is_complete());
/// // Usage tie-break spreads unrelated courses across days
/// assert_eq!(outcome.timetable.slot(0), Some(Slot::new(0, 0)));
/// assert_eq!(outcome.timetable.slot(1), Some(Slot::new(1, 0)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GreedyAssigner<'a> {
    graph: &'a ConflictGraph,
    grid: &'a TimeGrid,
}

impl<'a> GreedyAssigner<'a> {
    /// Creates an assigner.
    pub fn new(graph: &'a ConflictGraph, grid: &'a TimeGrid) -> Self {
        Self { graph, grid }
    }

    /// Course indices in placement order: degree descending, then ID.
    pub fn placement_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.graph.course_count()).collect();
        order.sort_by(|&a, &b| {
            self.graph
                .degree(b)
                .cmp(&self.graph.degree(a))
                .then_with(|| self.graph.course(a).id.cmp(&self.graph.course(b).id))
        });
        order
    }

    /// Runs the greedy assignment.
    pub fn assign(&self) -> GreedyOutcome {
        let validator = PlacementValidator::new(self.graph, self.grid);
        let mut timetable = Timetable::empty(self.graph.course_count());
        let mut cell_usage = vec![0usize; self.grid.cell_count()];
        let mut day_usage = vec![0usize; self.grid.day_count()];
        let mut unplaced = Vec::new();

        for course in self.placement_order() {
            let best = self
                .grid
                .cells()
                .filter(|&slot| validator.is_safe(course, slot, &timetable))
                .min_by_key(|&slot| {
                    let position = self.grid.cell_position(slot);
                    (cell_usage[position], day_usage[slot.day], position)
                });

            let id = &self.graph.course(course).id;
            match best {
                Some(slot) => {
                    timetable.place(course, slot);
                    cell_usage[self.grid.cell_position(slot)] += 1;
                    day_usage[slot.day] += 1;
                    debug!(course = %id, day = slot.day, start = slot.start, "placed");
                }
                None => {
                    warn!(course = %id, "no legal slot, leaving course unplaced");
                    unplaced.push(id.clone());
                }
            }
        }

        GreedyOutcome {
            timetable,
            unplaced,
        }
    }
}
