//! Timetable construction and load balancing.
//!
//! # Phases
//!
//! | Phase | Type | Output |
//! |-------|------|--------|
//! | Greedy assignment | [`GreedyAssigner`] | initial (possibly partial) timetable |
//! | Equitable optimization | [`EquitableOptimizer`] | balanced timetable + edit log |
//! | Evaluation | [`LoadMetrics`] | daily load, imbalance score |
//!
//! [`TimetableSolver`] chains the phases after input validation.
//!
//! # References
//!
//! - Welsh & Powell (1967), "An upper bound for the chromatic number of a graph"
//! - Meyer (1973), "Equitable coloring", American Mathematical Monthly 80(8)

mod greedy;
mod metrics;
mod optimizer;
mod pipeline;

pub use greedy::{GreedyAssigner, GreedyOutcome};
pub use metrics::{population_variance, DailyLoad, LoadMetrics, LoadSummary};
pub use optimizer::{
    Edit, EditRecord, EquitableOptimizer, OptimizationReport, SearchState, VisitOrder,
};
pub use pipeline::{TimetableOutcome, TimetableRequest, TimetableSolver};
