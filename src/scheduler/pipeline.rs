//! End-to-end timetabling pipeline.
//!
//! validate → time grid → conflict graph → greedy assignment → (if
//! complete) equitable optimization.
//!
//! A partial greedy result is not an error here: the outcome carries the
//! unplaced list and no optimization report. Callers that need a full
//! timetable use [`TimetableOutcome::require_complete`].

use tracing::{info, warn};

use super::greedy::GreedyAssigner;
use super::metrics::{DailyLoad, LoadMetrics};
use super::optimizer::{EquitableOptimizer, OptimizationReport};
use crate::config::TimetableConfig;
use crate::error::{Result, TimetableError};
use crate::graph::ConflictGraph;
use crate::models::{Course, Student, TimeGrid, Timetable};
use crate::placement::{PlacementValidator, Violation};
use crate::validation::{ensure_valid, oversized_courses};

/// Input container for one timetabling run.
#[derive(Debug, Clone, Default)]
pub struct TimetableRequest {
    /// Run configuration.
    pub config: TimetableConfig,
    /// Courses to place.
    pub courses: Vec<Course>,
    /// Student enrollments.
    pub students: Vec<Student>,
}

impl TimetableRequest {
    /// Creates a request with the default configuration.
    pub fn new(courses: Vec<Course>, students: Vec<Student>) -> Self {
        Self {
            config: TimetableConfig::default(),
            courses,
            students,
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: TimetableConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a course.
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    /// Adds a student.
    pub fn with_student(mut self, student: Student) -> Self {
        self.students.push(student);
        self
    }
}

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct TimetableOutcome {
    /// Configuration used.
    pub config: TimetableConfig,
    /// Time grid.
    pub grid: TimeGrid,
    /// Conflict graph.
    pub graph: ConflictGraph,
    /// Student enrollments (input order).
    pub students: Vec<Student>,
    /// Load calculator for this problem.
    pub metrics: LoadMetrics,
    /// Greedy timetable.
    pub initial: Timetable,
    /// Daily load of the greedy timetable.
    pub initial_load: DailyLoad,
    /// Imbalance score of the greedy timetable.
    pub initial_score: f64,
    /// Courses the greedy phase could not place.
    pub unplaced: Vec<String>,
    /// Optimizer result (absent when the greedy timetable is partial).
    pub optimization: Option<OptimizationReport>,
}

impl TimetableOutcome {
    /// Optimized timetable if available, else the greedy one.
    pub fn final_timetable(&self) -> &Timetable {
        self.optimization
            .as_ref()
            .map_or(&self.initial, |report| &report.timetable)
    }

    /// Daily load of the final timetable.
    pub fn final_load(&self) -> &DailyLoad {
        self.optimization
            .as_ref()
            .map_or(&self.initial_load, |report| &report.daily_load)
    }

    /// Imbalance score of the final timetable.
    pub fn final_score(&self) -> f64 {
        self.optimization
            .as_ref()
            .map_or(self.initial_score, |report| report.final_score)
    }

    /// Whether every course was placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Re-validates the final timetable.
    pub fn audit(&self) -> Vec<Violation> {
        PlacementValidator::new(&self.graph, &self.grid).audit(self.final_timetable())
    }

    /// Returns the outcome if complete.
    ///
    /// # Errors
    /// `PartialAssignmentFailure` listing the unplaced courses.
    pub fn require_complete(self) -> Result<Self> {
        if self.unplaced.is_empty() {
            Ok(self)
        } else {
            Err(TimetableError::PartialAssignmentFailure {
                unplaced: self.unplaced,
            })
        }
    }
}

/// Runs the full pipeline.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Course, Student};
/// use u_timetable::scheduler::TimetableSolver;
///
/// let courses = vec![
///     Course::new("MK01").with_credits(3).with_lecturer("D01").with_room("R01"),
///     Course::new("MK02").with_credits(3).with_lecturer("D02").with_room("R02"),
///     Course::new("MK03").with_credits(2).with_lecturer("D01").with_room("R03"),
/// ];
/// let students = vec![Student::new("S1").with_courses(["MK01", "MK02"])];
///
/// let outcome = TimetableSolver::default().solve(&courses, &students).unwrap();
/// assert!(outcome.is_complete());
/// assert!(outcome.audit().is_empty());
/// assert!(outcome.final_score() <= outcome.initial_score);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableSolver {
    config: TimetableConfig,
}

impl TimetableSolver {
    /// Creates a solver.
    pub fn new(config: TimetableConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    /// Solves one problem.
    ///
    /// # Errors
    /// - `Validation` for bad records or configuration
    /// - `InfeasibleGrid` if the bounds admit no start time
    pub fn solve(&self, courses: &[Course], students: &[Student]) -> Result<TimetableOutcome> {
        let config = &self.config;
        ensure_valid(courses, students, config)?;
        for diagnostic in oversized_courses(courses, config) {
            warn!("{}", diagnostic.message);
        }

        let grid = TimeGrid::new(config)?;
        let graph = ConflictGraph::build(courses, students, config.edge_policy);
        info!(
            courses = graph.course_count(),
            edges = graph.edge_count(),
            students = students.len(),
            cells = grid.cell_count(),
            "conflict graph built"
        );

        let metrics = LoadMetrics::new(&graph, students, &grid, config.student_weight)?;

        let greedy = GreedyAssigner::new(&graph, &grid).assign();
        let initial_load = metrics.daily_load(&greedy.timetable);
        let initial_score = metrics.imbalance(&greedy.timetable);
        info!(
            placed = greedy.timetable.placed_count(),
            unplaced = greedy.unplaced.len(),
            score = initial_score,
            "greedy assignment finished"
        );

        let optimization = if greedy.is_complete() {
            let report = EquitableOptimizer::new(&graph, &grid, &metrics)
                .with_max_iterations(config.max_iterations)
                .with_visit_order(config.visit_order)
                .optimize(&greedy.timetable)?;
            Some(report)
        } else {
            warn!(
                unplaced = greedy.unplaced.len(),
                "skipping optimization of a partial timetable"
            );
            None
        };

        Ok(TimetableOutcome {
            config: config.clone(),
            grid,
            graph,
            students: students.to_vec(),
            metrics,
            initial: greedy.timetable,
            initial_load,
            initial_score,
            unplaced: greedy.unplaced,
            optimization,
        })
    }

    /// Solves a request, using the request's configuration.
    pub fn solve_request(&self, request: &TimetableRequest) -> Result<TimetableOutcome> {
        let solver = Self::new(request.config.clone());
        solver.solve(&request.courses, &request.students)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{InstanceGenerator, InstanceGeneratorConfig};
    use crate::graph::EdgePolicy;
    use crate::placement::ViolationType;
    use crate::scheduler::SearchState;

    fn course(id: &str, credits: i32, lecturer: &str, room: &str) -> Course {
        Course::new(id)
            .with_credits(credits)
            .with_lecturer(lecturer)
            .with_room(room)
    }

    fn generated(seed: u64) -> TimetableRequest {
        InstanceGenerator::new(InstanceGeneratorConfig::default().with_seed(seed)).generate()
    }

    #[test]
    fn test_request_builder() {
        let request = TimetableRequest::default()
            .with_course(course("A", 2, "L1", "R1"))
            .with_student(Student::new("S").with_course("A"))
            .with_config(TimetableConfig::default().with_max_iterations(3));
        assert_eq!(request.courses.len(), 1);
        assert_eq!(request.students.len(), 1);
        assert_eq!(request.config.max_iterations, 3);
    }

    #[test]
    fn test_solve_two_unrelated_courses() {
        let request = TimetableRequest::new(
            vec![course("A", 2, "L1", "R1"), course("B", 2, "L2", "R2")],
            Vec::new(),
        );
        let outcome = TimetableSolver::default().solve_request(&request).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(outcome.final_load().credits, vec![2, 2, 0, 0, 0]);
        let report = outcome.optimization.as_ref().unwrap();
        assert!(report.edits.is_empty());
    }

    #[test]
    fn test_partial_outcome_skips_optimizer() {
        let config = TimetableConfig::default().with_days(vec!["Monday".into()]);
        let request = TimetableRequest::new(
            vec![course("A", 3, "L1", "R1"), course("B", 3, "L2", "R2")],
            vec![Student::new("S").with_courses(["A", "B"])],
        )
        .with_config(config);

        let outcome = TimetableSolver::default().solve_request(&request).unwrap();
        assert!(!outcome.is_complete());
        assert!(outcome.optimization.is_none());
        assert_eq!(outcome.final_timetable(), &outcome.initial);
        assert_eq!(outcome.audit().len(), 1);

        let err = outcome.require_complete().unwrap_err();
        assert_eq!(
            err,
            TimetableError::PartialAssignmentFailure {
                unplaced: vec!["B".into()]
            }
        );
    }

    #[test]
    fn test_oversized_course_is_unplaced() {
        // 07:30–16:40 holds at most 11 slots of 50 minutes
        let courses = vec![course("OK", 2, "L1", "R1"), course("LONG", 12, "L2", "R2")];
        let outcome = TimetableSolver::default().solve(&courses, &[]).unwrap();

        assert_eq!(outcome.unplaced, vec!["LONG".to_string()]);
        assert!(outcome.optimization.is_none());
        assert_eq!(outcome.initial.placed_count(), 1);
        assert_eq!(outcome.initial_load.total(), 2);
        assert!(matches!(
            outcome.require_complete(),
            Err(TimetableError::PartialAssignmentFailure { .. })
        ));
    }

    #[test]
    fn test_invalid_input_aborts() {
        let courses = vec![course("A", 0, "L1", "R1")];
        let err = TimetableSolver::default().solve(&courses, &[]).unwrap_err();
        assert!(matches!(err, TimetableError::Validation(_)));
    }

    #[test]
    fn test_infeasible_grid_aborts() {
        let config = TimetableConfig::default()
            .with_bounds("12:00".parse().unwrap(), "08:00".parse().unwrap());
        let err = TimetableSolver::new(config).solve(&[], &[]).unwrap_err();
        assert!(matches!(err, TimetableError::InfeasibleGrid(_)));
    }

    #[test]
    fn test_any_cause_policy_from_config() {
        let config = TimetableConfig::default().with_edge_policy(EdgePolicy::AnyCause);
        let courses = vec![course("A", 2, "L1", "R1"), course("B", 2, "L1", "R2")];
        let outcome = TimetableSolver::new(config).solve(&courses, &[]).unwrap();
        assert_eq!(outcome.graph.edge_count(), 1);
        let t = outcome.final_timetable();
        assert_ne!(t.slot(0).unwrap().day, t.slot(1).unwrap().day);
    }

    #[test]
    fn test_generated_instances_hold_invariants() {
        for seed in 0..8 {
            let request = generated(seed);
            let outcome = TimetableSolver::default().solve_request(&request).unwrap();

            // Only unplaced courses may show up in the audit
            let violations = outcome.audit();
            assert!(violations
                .iter()
                .all(|v| v.violation_type == ViolationType::Unplaced));
            assert_eq!(violations.len(), outcome.unplaced.len());

            // Conflict edges never share a day
            let t = outcome.final_timetable();
            for a in 0..outcome.graph.course_count() {
                for b in outcome.graph.neighbors(a) {
                    if let (Some(x), Some(y)) = (t.slot(a), t.slot(b)) {
                        assert_ne!(x.day, y.day, "seed {seed}");
                    }
                }
            }

            if let Some(report) = &outcome.optimization {
                assert!(report.final_score <= report.initial_score + 1e-9);
                let mut previous = report.initial_score;
                for record in &report.edits {
                    assert!(record.score_after < previous);
                    previous = record.score_after;
                }
            }
        }
    }

    #[test]
    fn test_converged_output_is_stable() {
        let request = generated(7).with_config(TimetableConfig::default().with_max_iterations(500));
        let outcome = TimetableSolver::default().solve_request(&request).unwrap();
        let Some(report) = &outcome.optimization else {
            return;
        };
        if report.status != SearchState::Converged {
            return;
        }

        let again = EquitableOptimizer::new(&outcome.graph, &outcome.grid, &outcome.metrics)
            .with_max_iterations(500)
            .optimize(&report.timetable)
            .unwrap();
        assert!(again.edits.is_empty());
        assert_eq!(again.timetable, report.timetable);
        assert_eq!(again.final_score, report.final_score);
    }

    #[test]
    fn test_deterministic_output() {
        let request = generated(3);
        let solver = TimetableSolver::default();
        let a = solver.solve_request(&request).unwrap();
        let b = solver.solve_request(&request).unwrap();
        assert_eq!(
            serde_json::to_string(a.final_timetable()).unwrap(),
            serde_json::to_string(b.final_timetable()).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&a.optimization).unwrap(),
            serde_json::to_string(&b.optimization).unwrap()
        );
    }
}
