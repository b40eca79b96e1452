//! Load metrics and the imbalance objective.
//!
//! Aggregates credit load per day and per student from a timetable.
//! Everything is recomputed from the timetable on each call; nothing is
//! cached across edits.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Daily load | Σ credits of courses placed on each day |
//! | Day variance | Population variance of the daily load |
//! | Student variance | Σ over students of the population variance of their own daily load |
//! | Imbalance | day variance + weight × student variance |
//!
//! Population variance divides by the number of days, never by n − 1.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::graph::ConflictGraph;
use crate::models::{Student, TimeGrid, Timetable};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Credit load per day, in grid day order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLoad {
    /// Day names.
    pub days: Vec<String>,
    /// Credits per day (parallel to `days`).
    pub credits: Vec<i64>,
}

impl DailyLoad {
    /// Load of one day by name.
    pub fn get(&self, day: &str) -> Option<i64> {
        self.days
            .iter()
            .position(|d| d == day)
            .and_then(|i| self.credits.get(i).copied())
    }

    /// `(day, credits)` pairs in day order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.days
            .iter()
            .map(|d| d.as_str())
            .zip(self.credits.iter().copied())
    }

    /// Total credits placed.
    pub fn total(&self) -> i64 {
        self.credits.iter().sum()
    }

    /// Population variance of the per-day credits.
    pub fn variance(&self) -> f64 {
        population_variance(&self.credits)
    }
}

/// Summary statistics of a daily load table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Total credits placed.
    pub total_credits: i64,
    /// Mean credits per day.
    pub mean: f64,
    /// Population variance of daily credits.
    pub day_variance: f64,
    /// Sum of per-student daily-load variances, before weighting.
    pub student_variance: f64,
    /// Imbalance score.
    pub imbalance: f64,
    /// Most loaded day (first in day order on ties).
    pub busiest_day: Option<String>,
    /// Least loaded day (first in day order on ties).
    pub lightest_day: Option<String>,
}

/// Population variance: Σ(x − mean)² / n. Zero for an empty slice.
pub fn population_variance(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<i64>() as f64 / n;
    values
        .iter()
        .map(|&x| {
            let d = x as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Load calculator bound to one problem.
///
/// Holds only immutable problem data (credits, enrollments, day count);
/// the timetable is passed to every call.
#[derive(Debug, Clone)]
pub struct LoadMetrics {
    credits: Vec<i64>,
    days: Vec<String>,
    cohorts: Vec<Vec<usize>>,
    student_weight: f64,
}

impl LoadMetrics {
    /// Creates a calculator.
    ///
    /// Enrollments naming courses absent from the graph are ignored.
    ///
    /// # Errors
    /// `Validation` if `student_weight` is negative or not finite.
    pub fn new(
        graph: &ConflictGraph,
        students: &[Student],
        grid: &TimeGrid,
        student_weight: f64,
    ) -> Result<Self> {
        if !student_weight.is_finite() || student_weight < 0.0 {
            return Err(TimetableError::Validation(vec![ValidationError::new(
                ValidationErrorKind::InvalidConfig,
                format!("Student weight must be non-negative, got {student_weight}"),
            )]));
        }

        let credits = graph.courses().map(|c| c.credits as i64).collect();
        let cohorts = students
            .iter()
            .map(|s| {
                s.courses
                    .iter()
                    .filter_map(|id| graph.index_of(id))
                    .collect()
            })
            .collect();
        Ok(Self {
            credits,
            days: grid.days().to_vec(),
            cohorts,
            student_weight,
        })
    }

    /// Weight applied to the student term.
    pub fn student_weight(&self) -> f64 {
        self.student_weight
    }

    /// Credits placed on each day.
    pub fn daily_load(&self, timetable: &Timetable) -> DailyLoad {
        let mut credits = vec![0i64; self.days.len()];
        for (course, slot) in timetable.placed() {
            if let Some(day) = credits.get_mut(slot.day) {
                *day += self.credits[course];
            }
        }
        DailyLoad {
            days: self.days.clone(),
            credits,
        }
    }

    /// Per-student daily credit loads (students in input order).
    pub fn student_daily_loads(&self, timetable: &Timetable) -> Vec<Vec<i64>> {
        self.cohorts
            .iter()
            .map(|courses| {
                let mut daily = vec![0i64; self.days.len()];
                for &course in courses {
                    if let Some(slot) = timetable.slot(course) {
                        if let Some(day) = daily.get_mut(slot.day) {
                            *day += self.credits[course];
                        }
                    }
                }
                daily
            })
            .collect()
    }

    /// Population variance of the daily load.
    pub fn day_variance(&self, timetable: &Timetable) -> f64 {
        self.daily_load(timetable).variance()
    }

    /// Sum over students of each student's daily-load variance.
    pub fn student_variance(&self, timetable: &Timetable) -> f64 {
        self.student_daily_loads(timetable)
            .iter()
            .map(|daily| population_variance(daily))
            .sum()
    }

    /// Imbalance score: day variance + weight × student variance.
    pub fn imbalance(&self, timetable: &Timetable) -> f64 {
        let day = self.day_variance(timetable);
        if self.student_weight == 0.0 {
            return day;
        }
        day + self.student_weight * self.student_variance(timetable)
    }

    /// Summary statistics for reporting.
    pub fn summary(&self, timetable: &Timetable) -> LoadSummary {
        let load = self.daily_load(timetable);
        let total_credits = load.total();
        let mean = if load.days.is_empty() {
            0.0
        } else {
            total_credits as f64 / load.days.len() as f64
        };
        let day_variance = load.variance();
        let student_variance = self.student_variance(timetable);

        let mut busiest: Option<(&str, i64)> = None;
        let mut lightest: Option<(&str, i64)> = None;
        for (day, credits) in load.iter() {
            if busiest.map_or(true, |(_, c)| credits > c) {
                busiest = Some((day, credits));
            }
            if lightest.map_or(true, |(_, c)| credits < c) {
                lightest = Some((day, credits));
            }
        }

        LoadSummary {
            total_credits,
            mean,
            day_variance,
            student_variance,
            imbalance: day_variance + self.student_weight * student_variance,
            busiest_day: busiest.map(|(d, _)| d.to_string()),
            lightest_day: lightest.map(|(d, _)| d.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimetableConfig;
    use crate::graph::EdgePolicy;
    use crate::models::{Course, Slot};

    fn setup(weight: f64) -> (ConflictGraph, TimeGrid, LoadMetrics) {
        let courses = vec![
            Course::new("A").with_credits(3).with_lecturer("L1").with_room("R1"),
            Course::new("B").with_credits(2).with_lecturer("L2").with_room("R2"),
            Course::new("C").with_credits(1).with_lecturer("L3").with_room("R3"),
        ];
        let students = vec![
            Student::new("S1").with_courses(["A", "B"]),
            Student::new("S2").with_courses(["C"]),
        ];
        let config = TimetableConfig::default()
            .with_days(vec!["Mon".into(), "Tue".into()]);
        let graph = ConflictGraph::build(&courses, &students, EdgePolicy::SharedStudent);
        let grid = TimeGrid::new(&config).unwrap();
        let metrics = LoadMetrics::new(&graph, &students, &grid, weight).unwrap();
        (graph, grid, metrics)
    }

    #[test]
    fn test_population_variance() {
        assert_eq!(population_variance(&[]), 0.0);
        assert_eq!(population_variance(&[4, 4, 4]), 0.0);
        // mean 3.6: (6.4² + 4 × 1.6²) / 5
        assert!((population_variance(&[10, 2, 2, 2, 2]) - 10.24).abs() < 1e-10);
        assert!((population_variance(&[1, 3]) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_daily_load() {
        let (_, _, m) = setup(0.5);
        let mut t = Timetable::empty(3);
        t.place(0, Slot::new(0, 0));
        t.place(1, Slot::new(1, 0));
        t.place(2, Slot::new(0, 3));

        let load = m.daily_load(&t);
        assert_eq!(load.get("Mon"), Some(4));
        assert_eq!(load.get("Tue"), Some(2));
        assert_eq!(load.get("Wed"), None);
        assert_eq!(load.total(), 6);
        assert!((load.variance() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_partial_timetable_counts_placed_only() {
        let (_, _, m) = setup(0.5);
        let mut t = Timetable::empty(3);
        t.place(1, Slot::new(1, 0));
        assert_eq!(m.daily_load(&t).credits, vec![0, 2]);
    }

    #[test]
    fn test_student_variance() {
        let (_, _, m) = setup(0.5);
        let mut t = Timetable::empty(3);
        t.place(0, Slot::new(0, 0)); // S1: Mon 3
        t.place(1, Slot::new(1, 0)); // S1: Tue 2
        t.place(2, Slot::new(0, 3)); // S2: Mon 1

        let loads = m.student_daily_loads(&t);
        assert_eq!(loads, vec![vec![3, 2], vec![1, 0]]);
        // S1: mean 2.5, var 0.25; S2: mean 0.5, var 0.25
        assert!((m.student_variance(&t) - 0.5).abs() < 1e-10);
        // day var 1.0 + 0.5 × 0.5
        assert!((m.imbalance(&t) - 1.25).abs() < 1e-10);
    }

    #[test]
    fn test_zero_weight_is_pure_day_balance() {
        let (_, _, m) = setup(0.0);
        let mut t = Timetable::empty(3);
        t.place(0, Slot::new(0, 0));
        t.place(1, Slot::new(1, 0));
        t.place(2, Slot::new(0, 3));
        assert!((m.imbalance(&t) - m.day_variance(&t)).abs() < 1e-12);
    }

    #[test]
    fn test_summary() {
        let (_, _, m) = setup(0.5);
        let mut t = Timetable::empty(3);
        t.place(0, Slot::new(0, 0));
        t.place(1, Slot::new(1, 0));
        t.place(2, Slot::new(0, 3));

        let s = m.summary(&t);
        assert_eq!(s.total_credits, 6);
        assert!((s.mean - 3.0).abs() < 1e-10);
        assert_eq!(s.busiest_day.as_deref(), Some("Mon"));
        assert_eq!(s.lightest_day.as_deref(), Some("Tue"));
        assert!((s.imbalance - m.imbalance(&t)).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_weight() {
        let courses = vec![Course::new("A").with_credits(2)];
        let graph = ConflictGraph::build(&courses, &[], EdgePolicy::SharedStudent);
        let grid = TimeGrid::new(&TimetableConfig::default()).unwrap();
        for weight in [-0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                LoadMetrics::new(&graph, &[], &grid, weight),
                Err(TimetableError::Validation(_))
            ));
        }
        assert!(LoadMetrics::new(&graph, &[], &grid, 0.0).is_ok());
    }

    #[test]
    fn test_daily_load_mismatched_lengths() {
        let load: DailyLoad =
            serde_json::from_str(r#"{"days": ["Mon", "Tue"], "credits": [4]}"#).unwrap();
        assert_eq!(load.get("Mon"), Some(4));
        assert_eq!(load.get("Tue"), None);
    }
}
