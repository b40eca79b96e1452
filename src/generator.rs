//! Synthetic problem generator.
//!
//! Produces reproducible instances shaped like a small faculty: courses
//! offered in parallel sections that share a lecturer and room, a pool of
//! lecturers and rooms reused across courses, and students taking a few
//! courses each. Used by the `generate` command and by property tests.

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::config::TimetableConfig;
use crate::models::{Course, Student};
use crate::scheduler::TimetableRequest;

/// Generator parameters.
#[derive(Debug, Clone)]
pub struct InstanceGeneratorConfig {
    /// Number of courses.
    pub courses: usize,
    /// Number of students.
    pub students: usize,
    /// Size of the lecturer pool.
    pub lecturers: usize,
    /// Size of the room pool.
    pub rooms: usize,
    /// Smallest credit count.
    pub min_credits: i32,
    /// Largest credit count.
    pub max_credits: i32,
    /// Fewest courses per student.
    pub min_enrollments: usize,
    /// Most courses per student (capped at the number of days).
    pub max_enrollments: usize,
    /// Random seed (None for a fresh one).
    pub seed: Option<u64>,
    /// Configuration embedded in the generated request.
    pub timetable: TimetableConfig,
}

impl Default for InstanceGeneratorConfig {
    fn default() -> Self {
        Self {
            courses: 24,
            students: 12,
            lecturers: 10,
            rooms: 8,
            min_credits: 2,
            max_credits: 4,
            min_enrollments: 2,
            max_enrollments: 4,
            seed: Some(42),
            timetable: TimetableConfig::default(),
        }
    }
}

impl InstanceGeneratorConfig {
    /// Sets the course count.
    pub fn with_courses(mut self, courses: usize) -> Self {
        self.courses = courses;
        self
    }

    /// Sets the student count.
    pub fn with_students(mut self, students: usize) -> Self {
        self.students = students;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the embedded timetable configuration.
    pub fn with_timetable(mut self, config: TimetableConfig) -> Self {
        self.timetable = config;
        self
    }
}

/// Random instance generator.
pub struct InstanceGenerator {
    config: InstanceGeneratorConfig,
}

impl InstanceGenerator {
    /// Creates a generator.
    pub fn new(config: InstanceGeneratorConfig) -> Self {
        Self { config }
    }

    /// Generates one instance.
    pub fn generate(&self) -> TimetableRequest {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let courses = self.generate_courses(&mut rng);
        let students = self.generate_students(&mut rng, &courses);
        TimetableRequest::new(courses, students).with_config(self.config.timetable.clone())
    }

    fn generate_courses(&self, rng: &mut SmallRng) -> Vec<Course> {
        let cfg = &self.config;
        let lecturers = cfg.lecturers.max(1);
        let rooms = cfg.rooms.max(1);
        let (lo, hi) = (cfg.min_credits.max(1), cfg.max_credits.max(cfg.min_credits.max(1)));

        let mut courses = Vec::with_capacity(cfg.courses);
        let mut number = 0;
        while courses.len() < cfg.courses {
            number += 1;
            let credits = rng.random_range(lo..=hi);
            let lecturer = format!("D{:02}", rng.random_range(1..=lecturers));
            let room = format!("R{:02}", rng.random_range(1..=rooms));

            // Roughly a third of the courses run as two parallel sections
            let sections: &[&str] = if rng.random_bool(0.35) && courses.len() + 1 < cfg.courses {
                &["-A", "-B"]
            } else {
                &[""]
            };
            for suffix in sections {
                courses.push(
                    Course::new(format!("MK{number:02}{suffix}"))
                        .with_credits(credits)
                        .with_lecturer(lecturer.as_str())
                        .with_room(room.as_str()),
                );
            }
        }
        courses
    }

    fn generate_students(&self, rng: &mut SmallRng, courses: &[Course]) -> Vec<Student> {
        let cfg = &self.config;
        if courses.is_empty() {
            return (1..=cfg.students)
                .map(|i| Student::new(format!("S{i:03}")))
                .collect();
        }

        let day_count = cfg.timetable.days.len().max(1);
        let hi = cfg.max_enrollments.min(day_count).min(courses.len()).max(1);
        let lo = cfg.min_enrollments.clamp(1, hi);

        (1..=cfg.students)
            .map(|i| {
                let amount = rng.random_range(lo..=hi);
                let picked = index::sample(rng, courses.len(), amount);
                Student::new(format!("S{i:03}"))
                    .with_courses(picked.into_iter().map(|c| courses[c].id.clone()))
            })
            .collect()
    }
}
