//! Timetable (assignment) model.
//!
//! A timetable maps every course to at most one grid [`Slot`]. It is
//! indexed by the course's position in the conflict graph, which orders
//! courses by identifier. Partial while the greedy assigner runs; total
//! once every course is placed.
//!
//! The timetable is the only mutable structure in a run and has exactly
//! one writer at a time.

use serde::{Deserialize, Serialize};

use super::Slot;

/// A (possibly partial) assignment of courses to grid slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    slots: Vec<Option<Slot>>,
}

impl Timetable {
    /// Creates a timetable for `course_count` courses with nothing placed.
    pub fn empty(course_count: usize) -> Self {
        Self {
            slots: vec![None; course_count],
        }
    }

    /// Number of courses tracked (placed or not).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the timetable tracks no courses.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot of a course, if placed.
    #[inline]
    pub fn slot(&self, course: usize) -> Option<Slot> {
        self.slots.get(course).copied().flatten()
    }

    /// Places a course, returning its previous slot.
    ///
    /// # Panics
    /// Panics if `course` is out of range.
    pub fn place(&mut self, course: usize, slot: Slot) -> Option<Slot> {
        self.slots[course].replace(slot)
    }

    /// Removes a course from the grid, returning its previous slot.
    pub fn unplace(&mut self, course: usize) -> Option<Slot> {
        self.slots.get_mut(course).and_then(Option::take)
    }

    /// Exchanges the slots of two courses.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
    }

    /// Placed courses with their slots, in course order.
    pub fn placed(&self) -> impl Iterator<Item = (usize, Slot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(course, slot)| slot.map(|s| (course, s)))
    }

    /// Placed courses on one day.
    pub fn on_day(&self, day: usize) -> impl Iterator<Item = (usize, Slot)> + '_ {
        self.placed().filter(move |(_, slot)| slot.day == day)
    }

    /// Indices of unplaced courses.
    pub fn unplaced(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(course, _)| course)
            .collect()
    }

    /// Number of placed courses.
    pub fn placed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether every course has a slot.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_timetable() {
        let t = Timetable::empty(3);
        assert_eq!(t.len(), 3);
        assert_eq!(t.placed_count(), 0);
        assert!(!t.is_complete());
        assert_eq!(t.unplaced(), vec![0, 1, 2]);
        assert!(Timetable::empty(0).is_complete());
    }

    #[test]
    fn test_place_and_unplace() {
        let mut t = Timetable::empty(2);
        assert_eq!(t.place(0, Slot::new(1, 2)), None);
        assert_eq!(t.place(0, Slot::new(0, 0)), Some(Slot::new(1, 2)));
        assert_eq!(t.slot(0), Some(Slot::new(0, 0)));
        assert_eq!(t.slot(1), None);
        assert_eq!(t.slot(7), None);

        t.place(1, Slot::new(2, 0));
        assert!(t.is_complete());
        assert_eq!(t.unplace(1), Some(Slot::new(2, 0)));
        assert_eq!(t.unplaced(), vec![1]);
    }

    #[test]
    fn test_swap_and_day_filter() {
        let mut t = Timetable::empty(3);
        t.place(0, Slot::new(0, 0));
        t.place(1, Slot::new(1, 3));
        t.place(2, Slot::new(0, 4));

        let monday: Vec<usize> = t.on_day(0).map(|(c, _)| c).collect();
        assert_eq!(monday, vec![0, 2]);

        t.swap(0, 1);
        assert_eq!(t.slot(0), Some(Slot::new(1, 3)));
        assert_eq!(t.slot(1), Some(Slot::new(0, 0)));
    }
}
