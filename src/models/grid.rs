//! Weekly time grid and time-of-day arithmetic.
//!
//! The grid is a fixed ordered list of days crossed with a fixed ordered
//! list of start times. Start times are generated by stepping the slot
//! duration from the day-start bound while strictly below the day-end
//! bound, so the end bound itself is never a valid start.
//!
//! # Time Model
//! Times are minutes since midnight of one representative day. There is
//! no calendar-date semantics: a course always starts and ends on the
//! same day.
//!
//! # Intervals
//! Occupied intervals are half-open `[start, end)`. Two courses where one
//! ends exactly when the other starts do not overlap.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::TimetableConfig;
use crate::error::{Result, TimetableError};

/// A time of day, stored as minutes since midnight.
///
/// Parses from and formats as `HH:MM`.
///
/// # Example
/// ```
/// use u_timetable::models::TimeOfDay;
///
/// let t: TimeOfDay = "07:30".parse().unwrap();
/// assert_eq!(t.minutes(), 450);
/// assert_eq!(t.add_minutes(50).to_string(), "08:20");
/// assert!("7h30".parse::<TimeOfDay>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// Creates a time from minutes since midnight.
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Creates a time from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        if hour >= 24 || minute >= 60 {
            return Err(TimetableError::InvalidTimeFormat(format!(
                "{hour:02}:{minute:02}"
            )));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> u32 {
        self.0
    }

    /// Returns this time shifted later by `minutes`, saturating at `u32::MAX`.
    #[inline]
    pub fn add_minutes(self, minutes: u32) -> Self {
        Self(self.0.saturating_add(minutes))
    }

    /// Returns this time shifted later by `minutes`, or `None` on overflow.
    #[inline]
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        self.0.checked_add(minutes).map(Self)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TimetableError::InvalidTimeFormat(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(hour) || hour.len() > 2 || !digits(minute) || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimetableError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// A half-open occupied interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Interval start (inclusive).
    pub start: TimeOfDay,
    /// Interval end (exclusive).
    pub end: TimeOfDay,
}

impl Interval {
    /// Creates a new interval.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Whether two intervals overlap.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        TimeGrid::overlap(self.start, self.end, other.start, other.end)
    }
}

/// A grid cell: `(day index, start-time index)`.
///
/// The derived ordering is grid order: day order first, then start-time
/// order within the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Index into the grid's day list.
    pub day: usize,
    /// Index into the grid's start-time list.
    pub start: usize,
}

impl Slot {
    /// Creates a new slot.
    pub fn new(day: usize, start: usize) -> Self {
        Self { day, start }
    }
}

/// The weekly grid of candidate slots.
///
/// # Example
/// ```
/// use u_timetable::config::TimetableConfig;
/// use u_timetable::models::{TimeGrid, TimeOfDay};
///
/// let config = TimetableConfig::default()
///     .with_bounds("08:00".parse().unwrap(), "10:00".parse().unwrap())
///     .with_slot_duration(50);
/// let grid = TimeGrid::new(&config).unwrap();
///
/// // 08:00, 08:50, 09:40 — 10:00 itself is never a start time
/// assert_eq!(grid.slots_for_day().len(), 3);
/// assert!(grid.within_bounds(TimeOfDay::from_minutes(8 * 60), 2));
/// assert!(!grid.within_bounds(TimeOfDay::from_minutes(8 * 60 + 50), 2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    days: Vec<String>,
    start_times: Vec<TimeOfDay>,
    day_start: TimeOfDay,
    day_end: TimeOfDay,
    slot_minutes: u32,
}

impl TimeGrid {
    /// Generates the grid from a configuration.
    ///
    /// # Errors
    /// `InfeasibleGrid` if the day list is empty, the slot duration is zero,
    /// or one slot is longer than the whole day window.
    pub fn new(config: &TimetableConfig) -> Result<Self> {
        if config.days.is_empty() {
            return Err(TimetableError::InfeasibleGrid(
                "day list is empty".to_string(),
            ));
        }
        if config.slot_duration_minutes == 0 {
            return Err(TimetableError::InfeasibleGrid(
                "slot duration must be positive".to_string(),
            ));
        }

        let window = config
            .day_end
            .minutes()
            .saturating_sub(config.day_start.minutes());
        if config.slot_duration_minutes > window {
            return Err(TimetableError::InfeasibleGrid(format!(
                "a {}-minute slot does not fit between {} and {}",
                config.slot_duration_minutes, config.day_start, config.day_end
            )));
        }

        let mut start_times = Vec::new();
        let mut current = config.day_start;
        while current < config.day_end {
            start_times.push(current);
            current = current.add_minutes(config.slot_duration_minutes);
        }

        if start_times.is_empty() {
            return Err(TimetableError::InfeasibleGrid(format!(
                "no start time between {} and {}",
                config.day_start, config.day_end
            )));
        }

        Ok(Self {
            days: config.days.clone(),
            start_times,
            day_start: config.day_start,
            day_end: config.day_end,
            slot_minutes: config.slot_duration_minutes,
        })
    }

    /// Ordered start times of one day (identical for every day).
    pub fn slots_for_day(&self) -> &[TimeOfDay] {
        &self.start_times
    }

    /// Ordered day names.
    pub fn days(&self) -> &[String] {
        &self.days
    }

    /// Number of days.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Total number of cells (days × start times).
    pub fn cell_count(&self) -> usize {
        self.days.len() * self.start_times.len()
    }

    /// Name of the day at `index`.
    pub fn day_name(&self, index: usize) -> Option<&str> {
        self.days.get(index).map(|d| d.as_str())
    }

    /// Index of the day named `name`.
    pub fn day_index(&self, name: &str) -> Option<usize> {
        self.days.iter().position(|d| d == name)
    }

    /// Start time at `index`.
    pub fn start_at(&self, index: usize) -> Option<TimeOfDay> {
        self.start_times.get(index).copied()
    }

    /// Index of a start time, if it is on the grid.
    pub fn start_index(&self, time: TimeOfDay) -> Option<usize> {
        self.start_times.iter().position(|&t| t == time)
    }

    /// Day-start bound.
    pub fn day_start(&self) -> TimeOfDay {
        self.day_start
    }

    /// Day-end bound.
    pub fn day_end(&self) -> TimeOfDay {
        self.day_end
    }

    /// Base slot duration in minutes.
    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    /// Flat position of a cell in grid order.
    #[inline]
    pub fn cell_position(&self, slot: Slot) -> usize {
        slot.day * self.start_times.len() + slot.start
    }

    /// All cells in grid order (day order, then start-time order).
    pub fn cells(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.days.len())
            .flat_map(move |day| (0..self.start_times.len()).map(move |start| Slot::new(day, start)))
    }

    /// End time of a course of `credits` starting at `start`.
    ///
    /// # Errors
    /// `InvalidCredits` if `credits <= 0` or the end time overflows.
    pub fn end_time(&self, start: TimeOfDay, credits: i32) -> Result<TimeOfDay> {
        let invalid = || TimetableError::InvalidCredits {
            context: format!("a course starting at {start}"),
            credits,
        };
        if credits <= 0 {
            return Err(invalid());
        }
        (credits as u32)
            .checked_mul(self.slot_minutes)
            .and_then(|length| start.checked_add_minutes(length))
            .ok_or_else(invalid)
    }

    /// Whether a course of `credits` starting at `start` ends by the day-end bound.
    pub fn within_bounds(&self, start: TimeOfDay, credits: i32) -> bool {
        self.end_time(start, credits)
            .map(|end| end <= self.day_end)
            .unwrap_or(false)
    }

    /// Strict half-open overlap test: `max(starts) < min(ends)`.
    #[inline]
    pub fn overlap(
        start_a: TimeOfDay,
        end_a: TimeOfDay,
        start_b: TimeOfDay,
        end_b: TimeOfDay,
    ) -> bool {
        start_a.max(start_b) < end_a.min(end_b)
    }

    /// Occupied interval of a course of `credits` placed at `slot`.
    ///
    /// Returns `None` if the slot is off the grid or the credit count is invalid.
    pub fn interval(&self, slot: Slot, credits: i32) -> Option<Interval> {
        if slot.day >= self.days.len() {
            return None;
        }
        let start = self.start_at(slot.start)?;
        let end = self.end_time(start, credits).ok()?;
        Some(Interval::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn grid(start: &str, end: &str, minutes: u32, days: &[&str]) -> Result<TimeGrid> {
        let config = TimetableConfig::default()
            .with_bounds(t(start), t(end))
            .with_slot_duration(minutes)
            .with_days(days.iter().map(|d| d.to_string()).collect());
        TimeGrid::new(&config)
    }

    #[test]
    fn test_parse_and_format() {
        assert_eq!(t("07:30").minutes(), 450);
        assert_eq!(t("7:05").to_string(), "07:05");
        assert_eq!(t("23:59").minutes(), 23 * 60 + 59);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "0730", "24:00", "12:60", "12:5", "ab:cd", "-1:30", "123:00"] {
            assert!(
                matches!(bad.parse::<TimeOfDay>(), Err(TimetableError::InvalidTimeFormat(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_default_grid_start_times() {
        let g = grid("07:30", "16:40", 50, &["Monday"]).unwrap();
        let times: Vec<String> = g.slots_for_day().iter().map(|t| t.to_string()).collect();
        assert_eq!(
            times,
            vec![
                "07:30", "08:20", "09:10", "10:00", "10:50", "11:40", "12:30", "13:20", "14:10",
                "15:00", "15:50"
            ]
        );
    }

    #[test]
    fn test_end_bound_is_exclusive() {
        // 08:00 + 2 × 60 = 10:00 lands exactly on the end bound
        let g = grid("08:00", "10:00", 60, &["Monday"]).unwrap();
        assert_eq!(g.slots_for_day(), &[t("08:00"), t("09:00")]);
    }

    #[test]
    fn test_infeasible_grid() {
        assert!(matches!(
            grid("10:00", "10:00", 50, &["Monday"]),
            Err(TimetableError::InfeasibleGrid(_))
        ));
        assert!(matches!(
            grid("08:00", "10:00", 0, &["Monday"]),
            Err(TimetableError::InfeasibleGrid(_))
        ));
        assert!(matches!(
            grid("08:00", "10:00", 50, &[]),
            Err(TimetableError::InfeasibleGrid(_))
        ));
    }

    #[test]
    fn test_slot_longer_than_window() {
        assert!(matches!(
            grid("08:00", "08:30", 50, &["Monday"]),
            Err(TimetableError::InfeasibleGrid(_))
        ));
        // exactly one slot wide
        let g = grid("08:00", "08:50", 50, &["Monday"]).unwrap();
        assert_eq!(g.slots_for_day(), &[t("08:00")]);
        assert!(g.within_bounds(t("08:00"), 1));
    }

    #[test]
    fn test_end_time_overflow() {
        let g = grid("07:30", "16:40", 50, &["Monday"]).unwrap();
        assert!(matches!(
            g.end_time(t("07:30"), i32::MAX),
            Err(TimetableError::InvalidCredits { credits: i32::MAX, .. })
        ));
        assert!(!g.within_bounds(t("07:30"), i32::MAX));
        assert_eq!(
            TimeOfDay::from_minutes(u32::MAX).checked_add_minutes(1),
            None
        );
    }

    #[test]
    fn test_end_time() {
        let g = grid("07:30", "16:40", 50, &["Monday"]).unwrap();
        assert_eq!(g.end_time(t("07:30"), 3).unwrap(), t("10:00"));
        assert!(matches!(
            g.end_time(t("07:30"), 0),
            Err(TimetableError::InvalidCredits { credits: 0, .. })
        ));
        assert!(g.end_time(t("07:30"), -2).is_err());
    }

    #[test]
    fn test_within_bounds() {
        let g = grid("07:30", "16:40", 50, &["Monday"]).unwrap();
        assert!(g.within_bounds(t("15:50"), 1)); // ends 16:40 exactly
        assert!(!g.within_bounds(t("15:50"), 2));
        assert!(!g.within_bounds(t("07:30"), 0));
    }

    #[test]
    fn test_overlap_half_open() {
        assert!(TimeGrid::overlap(t("08:00"), t("09:00"), t("08:30"), t("09:30")));
        assert!(!TimeGrid::overlap(t("08:00"), t("09:00"), t("09:00"), t("10:00")));
        assert!(TimeGrid::overlap(t("08:00"), t("12:00"), t("09:00"), t("10:00")));

        let a = Interval::new(t("10:00"), t("11:00"));
        let b = Interval::new(t("09:00"), t("10:00"));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_cells_in_grid_order() {
        let g = grid("08:00", "10:00", 60, &["Mon", "Tue"]).unwrap();
        let cells: Vec<Slot> = g.cells().collect();
        assert_eq!(
            cells,
            vec![Slot::new(0, 0), Slot::new(0, 1), Slot::new(1, 0), Slot::new(1, 1)]
        );
        assert!(cells.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(g.cell_position(Slot::new(1, 1)), 3);
    }

    #[test]
    fn test_interval_off_grid() {
        let g = grid("08:00", "10:00", 60, &["Mon"]).unwrap();
        assert_eq!(
            g.interval(Slot::new(0, 1), 1),
            Some(Interval::new(t("09:00"), t("10:00")))
        );
        assert_eq!(g.interval(Slot::new(1, 0), 1), None);
        assert_eq!(g.interval(Slot::new(0, 5), 1), None);
    }

    #[test]
    fn test_time_of_day_serde() {
        let json = serde_json::to_string(&t("09:05")).unwrap();
        assert_eq!(json, "\"09:05\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t("09:05"));
        assert!(serde_json::from_str::<TimeOfDay>("\"nine\"").is_err());
    }
}
