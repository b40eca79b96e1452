//! Timetabling configuration.
//!
//! One explicit struct carries every tunable the grid, graph builder,
//! and optimizer need. Loaded from the `config` section of a problem
//! document; every field is optional and falls back to [`Default`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::graph::EdgePolicy;
use crate::models::TimeOfDay;
use crate::scheduler::VisitOrder;
use crate::validation::validate_config;

/// Configuration for one timetabling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    /// Earliest start time of any course.
    pub day_start: TimeOfDay,
    /// Latest end time of any course. Never itself a start time.
    pub day_end: TimeOfDay,
    /// Base slot duration in minutes; a course of `k` credits lasts `k` slots.
    pub slot_duration_minutes: u32,
    /// Ordered teaching days.
    pub days: Vec<String>,
    /// Weight of the per-student variance term in the imbalance score (>= 0).
    pub student_weight: f64,
    /// Iteration cap for the equitable optimizer.
    pub max_iterations: usize,
    /// Which conflict causes become graph edges.
    pub edge_policy: EdgePolicy,
    /// Course visit order for the optimizer's MOVE/SWAP scans.
    pub visit_order: VisitOrder,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            day_start: TimeOfDay::from_minutes(7 * 60 + 30),
            day_end: TimeOfDay::from_minutes(16 * 60 + 40),
            slot_duration_minutes: 50,
            days: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            student_weight: 0.5,
            max_iterations: 50,
            edge_policy: EdgePolicy::default(),
            visit_order: VisitOrder::default(),
        }
    }
}

impl TimetableConfig {
    /// Sets the day-start and day-end bounds.
    pub fn with_bounds(mut self, day_start: TimeOfDay, day_end: TimeOfDay) -> Self {
        self.day_start = day_start;
        self.day_end = day_end;
        self
    }

    /// Sets the base slot duration (minutes).
    pub fn with_slot_duration(mut self, minutes: u32) -> Self {
        self.slot_duration_minutes = minutes;
        self
    }

    /// Sets the ordered day list.
    pub fn with_days(mut self, days: Vec<String>) -> Self {
        self.days = days;
        self
    }

    /// Sets the student-variance weight.
    pub fn with_student_weight(mut self, weight: f64) -> Self {
        self.student_weight = weight;
        self
    }

    /// Sets the optimizer iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the conflict-edge policy.
    pub fn with_edge_policy(mut self, policy: EdgePolicy) -> Self {
        self.edge_policy = policy;
        self
    }

    /// Sets the optimizer visit order.
    pub fn with_visit_order(mut self, order: VisitOrder) -> Self {
        self.visit_order = order;
        self
    }

    /// Checks the configuration on its own.
    ///
    /// # Errors
    /// `Validation` listing every problem found.
    pub fn validate(&self) -> Result<()> {
        let errors = validate_config(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TimetableError::Validation(errors))
        }
    }
}
