//! Equitable local-search optimizer.
//!
//! Improves a complete timetable by relocating single courses (MOVE) or
//! exchanging two courses on different days (SWAP), accepting only edits
//! that strictly lower the imbalance score.
//!
//! # Algorithm
//!
//! Each iteration while `Searching`:
//! 1. Compute the current score.
//! 2. MOVE pass: courses in visit order, every cell on another day in grid
//!    order. The first legal move that improves the score is committed.
//! 3. SWAP pass (only if no move improved): pairs `(i, j)`, `i` before `j`
//!    in visit order, on different days. Each endpoint is checked against
//!    the timetable with the other endpoint removed. The first legal
//!    improving swap is committed.
//! 4. No improving edit: `Converged`.
//!
//! Hitting `max_iterations` first ends in `IterationLimitReached`.
//!
//! Cells on a course's current day are never tried: the score only
//! depends on which day each course sits on.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", §4 (local search)

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::metrics::{DailyLoad, LoadMetrics};
use crate::error::{Result, TimetableError};
use crate::graph::ConflictGraph;
use crate::models::{Slot, TimeGrid, Timetable};
use crate::placement::PlacementValidator;

/// Minimum score decrease that counts as an improvement.
const EPSILON: f64 = 1e-9;

/// Order in which courses are visited by the MOVE and SWAP scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitOrder {
    /// Highest conflict degree first (ties: course ID).
    #[default]
    DegreeDescending,
    /// Courses on the most loaded day first (ties: course ID).
    /// Recomputed at the start of every iteration.
    DayLoadDescending,
}

/// Optimizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchState {
    /// Still looking for improving edits.
    Searching,
    /// No improving edit exists.
    Converged,
    /// Stopped by the iteration cap.
    IterationLimitReached,
}

/// A committed edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Edit {
    /// One course relocated.
    Move {
        /// Course ID.
        course: String,
        /// Previous slot.
        from: Slot,
        /// New slot.
        to: Slot,
    },
    /// Two courses exchanged slots.
    Swap {
        /// First course ID.
        first: String,
        /// Second course ID.
        second: String,
        /// First course's previous slot (now the second's).
        first_from: Slot,
        /// Second course's previous slot (now the first's).
        second_from: Slot,
    },
}

/// Log entry for one committed edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    /// Iteration (1-based) in which the edit was committed.
    pub iteration: usize,
    /// The edit.
    pub edit: Edit,
    /// Score before the edit.
    pub score_before: f64,
    /// Score after the edit.
    pub score_after: f64,
}

/// Result of an optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationReport {
    /// Final timetable.
    pub timetable: Timetable,
    /// Final daily load.
    pub daily_load: DailyLoad,
    /// Terminal state.
    pub status: SearchState,
    /// Iterations run.
    pub iterations: usize,
    /// Score of the input timetable.
    pub initial_score: f64,
    /// Score of the final timetable.
    pub final_score: f64,
    /// Committed edits, in order.
    pub edits: Vec<EditRecord>,
}

impl OptimizationReport {
    /// Score decrease achieved.
    pub fn improvement(&self) -> f64 {
        self.initial_score - self.final_score
    }
}

/// Equitable optimizer.
///
/// # Example
///
/// ```
/// use u_timetable::config::TimetableConfig;
/// use u_timetable::graph::{ConflictGraph, EdgePolicy};
/// use u_timetable::models::{Course, Slot, TimeGrid, Timetable};
/// use u_timetable::scheduler::{EquitableOptimizer, LoadMetrics, SearchState};
///
/// let courses = vec![
///     Course::new("A").with_credits(2).with_lecturer("L1").with_room("R1"),
///     Course::new("B").with_credits(2).with_lecturer("L2").with_room("R2"),
/// ];
/// let config = TimetableConfig::default().with_days(vec!["Mon".into(), "Tue".into()]);
/// let graph = ConflictGraph::build(&courses, &[], EdgePolicy::SharedStudent);
/// let grid = TimeGrid::new(&config).unwrap();
/// let metrics = LoadMetrics::new(&graph, &[], &grid, 0.5).unwrap();
///
/// // Both on Monday: one gets moved to Tuesday
/// let mut initial = Timetable::empty(2);
/// initial.place(0, Slot::new(0, 0));
/// initial.place(1, Slot::new(0, 3));
///
/// let report = EquitableOptimizer::new(&graph, &grid, &metrics)
///     .optimize(&initial)
///     .unwrap();
/// assert_eq!(report.status, SearchState::Converged);
/// assert_eq!(report.daily_load.credits, vec![2, 2]);
/// assert_eq!(report.final_score, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EquitableOptimizer<'a> {
    graph: &'a ConflictGraph,
    grid: &'a TimeGrid,
    metrics: &'a LoadMetrics,
    max_iterations: usize,
    visit_order: VisitOrder,
}

impl<'a> EquitableOptimizer<'a> {
    /// Creates an optimizer with a cap of 50 iterations and degree order.
    pub fn new(graph: &'a ConflictGraph, grid: &'a TimeGrid, metrics: &'a LoadMetrics) -> Self {
        Self {
            graph,
            grid,
            metrics,
            max_iterations: 50,
            visit_order: VisitOrder::default(),
        }
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the visit order.
    pub fn with_visit_order(mut self, visit_order: VisitOrder) -> Self {
        self.visit_order = visit_order;
        self
    }

    /// Course indices in the current visit order.
    pub fn visit_sequence(&self, timetable: &Timetable) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.graph.course_count()).collect();
        match self.visit_order {
            VisitOrder::DegreeDescending => {
                order.sort_by_key(|&c| (Reverse(self.graph.degree(c)), c));
            }
            VisitOrder::DayLoadDescending => {
                let load = self.metrics.daily_load(timetable);
                let day_load = |c: usize| {
                    timetable
                        .slot(c)
                        .and_then(|s| load.credits.get(s.day).copied())
                        .unwrap_or(0)
                };
                order.sort_by_key(|&c| (Reverse(day_load(c)), c));
            }
        }
        order
    }

    /// Runs the search on a copy of `initial`.
    ///
    /// # Errors
    /// `PartialAssignmentFailure` if any course in the graph is unplaced.
    pub fn optimize(&self, initial: &Timetable) -> Result<OptimizationReport> {
        let unplaced: Vec<String> = (0..self.graph.course_count())
            .filter(|&c| initial.slot(c).is_none())
            .map(|c| self.graph.course(c).id.clone())
            .collect();
        if !unplaced.is_empty() {
            return Err(TimetableError::PartialAssignmentFailure { unplaced });
        }

        let validator = PlacementValidator::new(self.graph, self.grid);
        let mut timetable = initial.clone();
        let initial_score = self.metrics.imbalance(&timetable);
        let mut score = initial_score;
        let mut iterations = 0;
        let mut edits = Vec::new();

        info!(
            courses = self.graph.course_count(),
            score = initial_score,
            max_iterations = self.max_iterations,
            "optimizer started"
        );

        let mut state = SearchState::Searching;
        while state == SearchState::Searching {
            if iterations >= self.max_iterations {
                state = SearchState::IterationLimitReached;
                break;
            }
            iterations += 1;

            let order = self.visit_sequence(&timetable);
            let found = self
                .try_move(&validator, &mut timetable, &order, score)
                .or_else(|| self.try_swap(&validator, &mut timetable, &order, score));

            match found {
                Some((edit, new_score)) => {
                    debug!(
                        iteration = iterations,
                        ?edit,
                        before = score,
                        after = new_score,
                        "edit committed"
                    );
                    edits.push(EditRecord {
                        iteration: iterations,
                        edit,
                        score_before: score,
                        score_after: new_score,
                    });
                    score = new_score;
                }
                None => state = SearchState::Converged,
            }
        }

        info!(
            ?state,
            iterations,
            edits = edits.len(),
            score,
            "optimizer finished"
        );

        Ok(OptimizationReport {
            daily_load: self.metrics.daily_load(&timetable),
            timetable,
            status: state,
            iterations,
            initial_score,
            final_score: score,
            edits,
        })
    }

    fn try_move(
        &self,
        validator: &PlacementValidator<'_>,
        timetable: &mut Timetable,
        order: &[usize],
        score: f64,
    ) -> Option<(Edit, f64)> {
        for &course in order {
            let Some(from) = timetable.slot(course) else {
                continue;
            };
            for to in self.grid.cells().filter(|s| s.day != from.day) {
                if !validator.is_safe(course, to, timetable) {
                    continue;
                }
                timetable.place(course, to);
                let candidate = self.metrics.imbalance(timetable);
                if candidate < score - EPSILON {
                    let edit = Edit::Move {
                        course: self.graph.course(course).id.clone(),
                        from,
                        to,
                    };
                    return Some((edit, candidate));
                }
                timetable.place(course, from);
            }
        }
        None
    }

    fn try_swap(
        &self,
        validator: &PlacementValidator<'_>,
        timetable: &mut Timetable,
        order: &[usize],
        score: f64,
    ) -> Option<(Edit, f64)> {
        for (i, &first) in order.iter().enumerate() {
            for &second in &order[i + 1..] {
                let (Some(first_from), Some(second_from)) =
                    (timetable.slot(first), timetable.slot(second))
                else {
                    continue;
                };
                if first_from.day == second_from.day {
                    continue;
                }
                if !validator.is_safe_without(first, second_from, timetable, second)
                    || !validator.is_safe_without(second, first_from, timetable, first)
                {
                    continue;
                }

                timetable.swap(first, second);
                let candidate = self.metrics.imbalance(timetable);
                if candidate < score - EPSILON {
                    let edit = Edit::Swap {
                        first: self.graph.course(first).id.clone(),
                        second: self.graph.course(second).id.clone(),
                        first_from,
                        second_from,
                    };
                    return Some((edit, candidate));
                }
                timetable.swap(first, second);
            }
        }
        None
    }
}
