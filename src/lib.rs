//! Course timetabling for the U-Engine ecosystem.
//!
//! Places university courses on a weekly grid of (day, start time) cells so
//! that conflicting courses never collide, then balances credit load across
//! days with a deterministic local search.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Course`, `Student`, `TimeGrid`, `Slot`,
//!   `Timetable`, `TimeOfDay`
//! - **`graph`**: Conflict graph over courses (`petgraph`), with edge causes
//! - **`placement`**: The single placement-legality check and timetable audit
//! - **`scheduler`**: Greedy assignment, equitable optimization, load metrics,
//!   and the end-to-end solver
//! - **`validation`**: Input integrity checks (duplicate IDs, credits, enrollments)
//! - **`config`**, **`error`**: Run configuration and error taxonomy
//! - **`input`**, **`report`**, **`generator`**: JSON problem documents,
//!   report tables, synthetic instances
//!
//! # Pipeline
//!
//! ```text
//! courses + enrollments → ConflictGraph → GreedyAssigner → EquitableOptimizer
//!                                         (both phases consult PlacementValidator
//!                                          and LoadMetrics)
//! ```
//!
//! # References
//!
//! - Welsh & Powell (1967), "An upper bound for the chromatic number of a graph
//!   and its application to timetabling problems"
//! - de Werra (1985), "An introduction to timetabling"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod input;
pub mod models;
pub mod placement;
pub mod report;
pub mod scheduler;
pub mod validation;
