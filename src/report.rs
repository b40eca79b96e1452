//! Reporting over a finished run.
//!
//! Turns a [`TimetableOutcome`] into serializable tables:
//!
//! | Table | Rows |
//! |-------|------|
//! | Master schedule | one per placed course, sorted by day then start |
//! | Student timetables | start time × day grid per student |
//! | Lecturer timetables | start time × day grid per lecturer |
//! | Load comparison | greedy vs. final credits per day |
//!
//! Multi-credit courses occupy consecutive grid rows: the first row holds
//! the course label, later rows hold a continuation marker.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::graph::ConflictCause;
use crate::models::{Slot, TimeGrid, TimeOfDay};
use crate::placement::Violation;
use crate::scheduler::{DailyLoad, Edit, LoadSummary, SearchState, TimetableOutcome};

/// One placed course in the master schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    /// Course ID.
    pub course: String,
    /// Day name.
    pub day: String,
    /// Start time.
    pub start: TimeOfDay,
    /// End time.
    pub end: TimeOfDay,
    /// Lecturer.
    pub lecturer: String,
    /// Room.
    pub room: String,
    /// Credits.
    pub credits: i32,
}

/// A start-time × day grid for one student or lecturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalTimetable {
    /// Student or lecturer ID.
    pub owner: String,
    /// Column headers (day names).
    pub days: Vec<String>,
    /// One row per grid start time: `(start, cell per day)`.
    pub rows: Vec<(TimeOfDay, Vec<String>)>,
}

impl PersonalTimetable {
    fn blank(owner: &str, grid: &TimeGrid) -> Self {
        Self {
            owner: owner.to_string(),
            days: grid.days().to_vec(),
            rows: grid
                .slots_for_day()
                .iter()
                .map(|&t| (t, vec![String::new(); grid.day_count()]))
                .collect(),
        }
    }

    fn mark(&mut self, slot: Slot, credits: i32, course: &str, room: &str, tag: &str) {
        for step in 0..credits.max(0) as usize {
            let Some((_, cells)) = self.rows.get_mut(slot.start + step) else {
                break;
            };
            if let Some(cell) = cells.get_mut(slot.day) {
                *cell = if step == 0 {
                    format!("[{tag}] {course} ({room})")
                } else {
                    format!("[{course} Cont.]")
                };
            }
        }
    }

    /// Renders the grid as aligned text.
    pub fn render(&self) -> String {
        let width = self
            .rows
            .iter()
            .flat_map(|(_, cells)| cells.iter().map(|c| c.len()))
            .chain(self.days.iter().map(|d| d.len()))
            .max()
            .unwrap_or(0);

        let mut out = format!("{}\n{:<6}", self.owner, "Time");
        for day in &self.days {
            let _ = write!(out, " | {day:<width$}");
        }
        out.push('\n');
        for (time, cells) in &self.rows {
            let _ = write!(out, "{:<6}", time.to_string());
            for cell in cells {
                let _ = write!(out, " | {cell:<width$}");
            }
            out.push('\n');
        }
        out
    }
}

/// One conflict edge, labeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeEntry {
    /// Lower course ID.
    pub first: String,
    /// Higher course ID.
    pub second: String,
    /// Causes, e.g. `"Lecturer, Student"`.
    pub label: String,
}

/// One committed optimizer edit, described with day names and times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditEntry {
    /// Iteration of the edit.
    pub iteration: usize,
    /// Human-readable description.
    pub description: String,
    /// Score before.
    pub score_before: f64,
    /// Score after.
    pub score_after: f64,
}

/// Full report of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimetableReport {
    /// Greedy daily load.
    pub initial_load: DailyLoad,
    /// Final daily load.
    pub final_load: DailyLoad,
    /// Greedy summary statistics.
    pub initial_summary: LoadSummary,
    /// Final summary statistics.
    pub final_summary: LoadSummary,
    /// Optimizer terminal state (absent if the optimizer did not run).
    pub status: Option<SearchState>,
    /// Optimizer iterations.
    pub iterations: usize,
    /// Courses left unplaced.
    pub unplaced: Vec<String>,
    /// Committed optimizer edits.
    pub edits: Vec<EditEntry>,
    /// Conflict edges.
    pub edges: Vec<EdgeEntry>,
    /// Master schedule.
    pub master: Vec<ScheduleEntry>,
    /// Per-student timetables (input order).
    pub students: Vec<PersonalTimetable>,
    /// Per-lecturer timetables (lecturer ID order).
    pub lecturers: Vec<PersonalTimetable>,
    /// Constraint violations in the final timetable.
    pub violations: Vec<Violation>,
}

impl TimetableReport {
    /// Builds the report.
    pub fn from_outcome(outcome: &TimetableOutcome) -> Self {
        let grid = &outcome.grid;
        let graph = &outcome.graph;
        let timetable = outcome.final_timetable();

        let mut master: Vec<(Slot, ScheduleEntry)> = timetable
            .placed()
            .filter_map(|(index, slot)| {
                let course = graph.course(index);
                let interval = grid.interval(slot, course.credits)?;
                let entry = ScheduleEntry {
                    course: course.id.clone(),
                    day: grid.day_name(slot.day)?.to_string(),
                    start: interval.start,
                    end: interval.end,
                    lecturer: course.lecturer.clone(),
                    room: course.room.clone(),
                    credits: course.credits,
                };
                Some((slot, entry))
            })
            .collect();
        master.sort_by(|(a, x), (b, y)| a.cmp(b).then_with(|| x.course.cmp(&y.course)));
        let master = master.into_iter().map(|(_, entry)| entry).collect();

        let students = outcome
            .students
            .iter()
            .map(|student| {
                let mut view = PersonalTimetable::blank(&student.id, grid);
                for id in &student.courses {
                    let Some(index) = graph.index_of(id) else {
                        continue;
                    };
                    if let Some(slot) = timetable.slot(index) {
                        let course = graph.course(index);
                        view.mark(slot, course.credits, &course.id, &course.room, "START");
                    }
                }
                view
            })
            .collect();

        let mut by_lecturer: BTreeMap<&str, PersonalTimetable> = BTreeMap::new();
        for (index, slot) in timetable.placed() {
            let course = graph.course(index);
            by_lecturer
                .entry(course.lecturer.as_str())
                .or_insert_with(|| PersonalTimetable::blank(&course.lecturer, grid))
                .mark(slot, course.credits, &course.id, &course.room, "CLASS");
        }

        let edges = graph
            .edges()
            .into_iter()
            .map(|e| EdgeEntry {
                first: e.first.to_string(),
                second: e.second.to_string(),
                label: e
                    .causes
                    .iter()
                    .map(ConflictCause::label)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();

        let (status, iterations, edits) = match &outcome.optimization {
            Some(report) => (
                Some(report.status),
                report.iterations,
                report
                    .edits
                    .iter()
                    .map(|r| EditEntry {
                        iteration: r.iteration,
                        description: describe_edit(grid, &r.edit),
                        score_before: r.score_before,
                        score_after: r.score_after,
                    })
                    .collect(),
            ),
            None => (None, 0, Vec::new()),
        };

        Self {
            initial_load: outcome.initial_load.clone(),
            final_load: outcome.final_load().clone(),
            initial_summary: outcome.metrics.summary(&outcome.initial),
            final_summary: outcome.metrics.summary(timetable),
            status,
            iterations,
            unplaced: outcome.unplaced.clone(),
            edits,
            edges,
            master,
            students,
            lecturers: by_lecturer.into_values().collect(),
            violations: outcome.audit(),
        }
    }

    /// Greedy vs. final load per day, with scores.
    pub fn render_load_comparison(&self) -> String {
        let mut out = format!("{:<12} {:>8} {:>8}\n", "Day", "Initial", "Final");
        for ((day, before), (_, after)) in self.initial_load.iter().zip(self.final_load.iter()) {
            let _ = writeln!(out, "{day:<12} {before:>8} {after:>8}");
        }
        let _ = writeln!(
            out,
            "{:<12} {:>8.2} {:>8.2}",
            "Variance", self.initial_summary.day_variance, self.final_summary.day_variance
        );
        let _ = writeln!(
            out,
            "{:<12} {:>8.2} {:>8.2}",
            "Imbalance", self.initial_summary.imbalance, self.final_summary.imbalance
        );
        out
    }

    /// Master schedule as aligned text.
    pub fn render_master(&self) -> String {
        let mut out = format!(
            "{:<10} {:<10} {:<5} {:<5} {:<8} {:<6} {:>3}\n",
            "Course", "Day", "Start", "End", "Lecturer", "Room", "SKS"
        );
        for e in &self.master {
            let _ = writeln!(
                out,
                "{:<10} {:<10} {:<5} {:<5} {:<8} {:<6} {:>3}",
                e.course,
                e.day,
                e.start.to_string(),
                e.end.to_string(),
                e.lecturer,
                e.room,
                e.credits
            );
        }
        out
    }
}

/// Describes an edit with day names and start times.
pub fn describe_edit(grid: &TimeGrid, edit: &Edit) -> String {
    let place = |slot: Slot| match (grid.day_name(slot.day), grid.start_at(slot.start)) {
        (Some(day), Some(start)) => format!("{day} {start}"),
        _ => format!("({}, {})", slot.day, slot.start),
    };
    match edit {
        Edit::Move { course, from, to } => {
            format!("MOVE {course}: {} -> {}", place(*from), place(*to))
        }
        Edit::Swap {
            first,
            second,
            first_from,
            second_from,
        } => format!(
            "SWAP {first} ({}) <-> {second} ({})",
            place(*first_from),
            place(*second_from)
        ),
    }
}
