//! Conflict graph construction.
//!
//! Nodes are courses; an undirected edge between two courses means they
//! must be taught on different days. Every edge carries the full set of
//! causes detected for the pair (diagnostic only: the label never affects
//! placement).
//!
//! # Edge Policy
//!
//! | Policy | Edge iff | Lecturer/room sharing enforced by |
//! |--------|----------|-----------------------------------|
//! | `SharedStudent` (default) | a student takes both courses | same-day overlap check at placement |
//! | `AnyCause` | any cause detected | graph edge (different days) |
//!
//! The policy is chosen once per run in the configuration. The placement
//! validator runs the same-day resource check under both policies.
//!
//! # Complexity
//! O(n² · s) for n courses and s students: a plain pairwise scan. Course
//! counts are in the tens to low hundreds.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::models::{Course, Student};

/// Why two courses conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConflictCause {
    /// Both courses are taught by the same lecturer.
    SharedLecturer,
    /// Both courses require the same room.
    SharedRoom,
    /// At least one student is enrolled in both courses.
    SharedStudent,
}

impl ConflictCause {
    /// Short label used in edge descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            ConflictCause::SharedLecturer => "Lecturer",
            ConflictCause::SharedRoom => "Room",
            ConflictCause::SharedStudent => "Student",
        }
    }
}

/// Which conflict causes become graph edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Only shared enrollment creates an edge.
    #[default]
    SharedStudent,
    /// Any detected cause creates an edge.
    AnyCause,
}

impl EdgePolicy {
    /// Whether a pair with these causes gets an edge.
    pub fn admits(&self, causes: &[ConflictCause]) -> bool {
        match self {
            EdgePolicy::SharedStudent => causes.contains(&ConflictCause::SharedStudent),
            EdgePolicy::AnyCause => !causes.is_empty(),
        }
    }
}

/// Edge payload: every cause detected for the pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictEdge {
    /// Detected causes, in declaration order.
    pub causes: Vec<ConflictCause>,
}

impl ConflictEdge {
    /// Joined cause labels, e.g. `"Lecturer, Student"`.
    pub fn label(&self) -> String {
        self.causes
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Read-only view of one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeView<'a> {
    /// Lower-indexed endpoint.
    pub first: &'a str,
    /// Higher-indexed endpoint.
    pub second: &'a str,
    /// Edge causes.
    pub causes: &'a [ConflictCause],
}

/// Course conflict graph.
///
/// Course indices are positions in identifier order and are shared with
/// [`Timetable`](crate::models::Timetable).
///
/// # Example
/// ```
/// use u_timetable::graph::{ConflictGraph, EdgePolicy};
/// use u_timetable::models::{Course, Student};
///
/// let courses = vec![
///     Course::new("A").with_lecturer("D1").with_room("R1"),
///     Course::new("B").with_lecturer("D1").with_room("R2"),
///     Course::new("C").with_lecturer("D2").with_room("R3"),
/// ];
/// let students = vec![Student::new("S1").with_courses(["A", "C"])];
///
/// let g = ConflictGraph::build(&courses, &students, EdgePolicy::SharedStudent);
/// assert_eq!(g.edge_count(), 1); // A–C via student; A–B only shares a lecturer
///
/// let g = ConflictGraph::build(&courses, &students, EdgePolicy::AnyCause);
/// assert_eq!(g.edge_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ConflictGraph {
    graph: UnGraph<Course, ConflictEdge>,
    index: HashMap<String, usize>,
    policy: EdgePolicy,
}

impl ConflictGraph {
    /// Builds the graph from course records and enrollments.
    ///
    /// Courses are sorted by identifier so node order, and everything
    /// derived from it, is reproducible.
    pub fn build(courses: &[Course], students: &[Student], policy: EdgePolicy) -> Self {
        let mut sorted: Vec<&Course> = courses.iter().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let mut graph: UnGraph<Course, ConflictEdge> = UnGraph::with_capacity(sorted.len(), 0);
        let mut index = HashMap::with_capacity(sorted.len());
        for course in sorted {
            let node = graph.add_node(course.clone());
            index.insert(course.id.clone(), node.index());
        }

        let n = graph.node_count();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (NodeIndex::new(i), NodeIndex::new(j));
                let causes = conflict_causes(&graph[a], &graph[b], students);
                if policy.admits(&causes) {
                    graph.add_edge(a, b, ConflictEdge { causes });
                }
            }
        }

        Self {
            graph,
            index,
            policy,
        }
    }

    /// Edge policy the graph was built with.
    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    /// Number of courses.
    pub fn course_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of conflict edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Course at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    #[inline]
    pub fn course(&self, index: usize) -> &Course {
        &self.graph[NodeIndex::new(index)]
    }

    /// All courses in index order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> + '_ {
        self.graph.raw_nodes().iter().map(|n| &n.weight)
    }

    /// Index of the course with identifier `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Adjacent course indices.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors(NodeIndex::new(index))
            .map(|n| n.index())
    }

    /// Number of adjacent courses.
    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).count()
    }

    /// Whether two courses share an edge.
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .is_some()
    }

    /// Edge payload between two courses, if any.
    pub fn edge_between(&self, a: usize, b: usize) -> Option<&ConflictEdge> {
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .map(|e| &self.graph[e])
    }

    /// All edges, lower-indexed endpoint first, sorted by endpoints.
    pub fn edges(&self) -> Vec<EdgeView<'_>> {
        let mut edges: Vec<(usize, usize, &ConflictEdge)> = self
            .graph
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source().index(), e.target().index());
                (a.min(b), a.max(b), e.weight())
            })
            .collect();
        edges.sort_by_key(|&(a, b, _)| (a, b));
        edges
            .into_iter()
            .map(|(a, b, edge)| EdgeView {
                first: &self.course(a).id,
                second: &self.course(b).id,
                causes: &edge.causes,
            })
            .collect()
    }
}

/// Causes linking two courses. The student scan stops at the first
/// student enrolled in both.
fn conflict_causes(a: &Course, b: &Course, students: &[Student]) -> Vec<ConflictCause> {
    let mut causes = Vec::new();
    if a.lecturer == b.lecturer {
        causes.push(ConflictCause::SharedLecturer);
    }
    if a.room == b.room {
        causes.push(ConflictCause::SharedRoom);
    }
    if students.iter().any(|s| s.enrolls(&a.id) && s.enrolls(&b.id)) {
        causes.push(ConflictCause::SharedStudent);
    }
    causes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, lecturer: &str, room: &str) -> Course {
        Course::new(id)
            .with_credits(2)
            .with_lecturer(lecturer)
            .with_room(room)
    }

    fn sample() -> (Vec<Course>, Vec<Student>) {
        let courses = vec![
            course("MK03", "D2", "R3"),
            course("MK01", "D1", "R1"),
            course("MK02", "D1", "R2"),
            course("MK04", "D4", "R1"),
        ];
        let students = vec![
            Student::new("S1").with_courses(["MK01", "MK03"]),
            Student::new("S2").with_courses(["MK02", "MK03", "MK01"]),
        ];
        (courses, students)
    }

    #[test]
    fn test_nodes_sorted_by_id() {
        let (courses, students) = sample();
        let g = ConflictGraph::build(&courses, &students, EdgePolicy::SharedStudent);
        let ids: Vec<&str> = g.courses().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["MK01", "MK02", "MK03", "MK04"]);
        assert_eq!(g.index_of("MK03"), Some(2));
        assert_eq!(g.index_of("MK99"), None);
    }

    #[test]
    fn test_shared_student_policy() {
        let (courses, students) = sample();
        let g = ConflictGraph::build(&courses, &students, EdgePolicy::SharedStudent);
        // MK01–MK03 (S1, S2), MK02–MK03 (S2), MK01–MK02 (S2)
        assert_eq!(g.edge_count(), 3);
        assert!(g.are_adjacent(0, 2));
        assert!(g.are_adjacent(2, 0));
        assert!(!g.are_adjacent(0, 3)); // shares only a room
        assert_eq!(g.degree(3), 0);
        assert_eq!(g.degree(0), 2);
    }

    #[test]
    fn test_any_cause_policy() {
        let (courses, students) = sample();
        let g = ConflictGraph::build(&courses, &students, EdgePolicy::AnyCause);
        assert_eq!(g.edge_count(), 4);
        assert!(g.are_adjacent(0, 3));
        assert_eq!(
            g.edge_between(0, 3).unwrap().causes,
            vec![ConflictCause::SharedRoom]
        );
        assert_eq!(g.policy(), EdgePolicy::AnyCause);
    }

    #[test]
    fn test_edge_label_lists_all_causes() {
        let (courses, students) = sample();
        let g = ConflictGraph::build(&courses, &students, EdgePolicy::SharedStudent);
        // MK01 and MK02 share lecturer D1 and student S2
        let edge = g.edge_between(0, 1).unwrap();
        assert_eq!(
            edge.causes,
            vec![ConflictCause::SharedLecturer, ConflictCause::SharedStudent]
        );
        assert_eq!(edge.label(), "Lecturer, Student");
    }

    #[test]
    fn test_edges_sorted() {
        let (courses, students) = sample();
        let g = ConflictGraph::build(&courses, &students, EdgePolicy::SharedStudent);
        let pairs: Vec<(&str, &str)> = g.edges().iter().map(|e| (e.first, e.second)).collect();
        assert_eq!(
            pairs,
            vec![("MK01", "MK02"), ("MK01", "MK03"), ("MK02", "MK03")]
        );
    }

    #[test]
    fn test_empty_graph() {
        let g = ConflictGraph::build(&[], &[], EdgePolicy::SharedStudent);
        assert_eq!(g.course_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.edges().is_empty());
    }
}
