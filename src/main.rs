//! Course timetabling CLI.
//!
//! Solves a JSON problem document or generates a synthetic one.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_timetable::generator::{InstanceGenerator, InstanceGeneratorConfig};
use u_timetable::graph::EdgePolicy;
use u_timetable::input::ProblemDocument;
use u_timetable::report::TimetableReport;
use u_timetable::scheduler::TimetableSolver;

#[derive(Parser)]
#[command(name = "u-timetable")]
#[command(about = "Course timetabling with conflict graphs and equitable load balancing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and balance a timetable.
    Solve {
        /// Problem document (JSON)
        #[arg(short, long)]
        input: PathBuf,
        /// Output file for the full report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the optimizer iteration cap
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Override the student-variance weight
        #[arg(long)]
        student_weight: Option<f64>,
        /// Turn every shared lecturer or room into a different-day edge
        #[arg(long)]
        any_cause_edges: bool,
        /// Also print per-student and per-lecturer timetables
        #[arg(long)]
        timetables: bool,
    },

    /// Write a synthetic problem document.
    Generate {
        /// Number of courses
        #[arg(short, long, default_value = "24")]
        courses: usize,
        /// Number of students
        #[arg(short = 'n', long, default_value = "12")]
        students: usize,
        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Output file (stdout if absent)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Solve {
            input,
            output,
            max_iterations,
            student_weight,
            any_cause_edges,
            timetables,
        } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let mut document = ProblemDocument::from_json(&text)
                .with_context(|| format!("parsing {}", input.display()))?;

            if let Some(n) = max_iterations {
                document.config.max_iterations = n;
            }
            if let Some(w) = student_weight {
                document.config.student_weight = w;
            }
            if any_cause_edges {
                document.config.edge_policy = EdgePolicy::AnyCause;
            }

            let request = document.into_request();
            info!(
                courses = request.courses.len(),
                students = request.students.len(),
                "problem loaded"
            );

            let outcome = TimetableSolver::default().solve_request(&request)?;
            let report = TimetableReport::from_outcome(&outcome);

            println!("=== Daily Load ===");
            print!("{}", report.render_load_comparison());
            println!("\n=== Master Schedule ===");
            print!("{}", report.render_master());

            if !report.edits.is_empty() {
                println!("\n=== Optimizer Edits ===");
                for edit in &report.edits {
                    println!(
                        "[{}] {} ({:.3} -> {:.3})",
                        edit.iteration, edit.description, edit.score_before, edit.score_after
                    );
                }
            }

            if timetables {
                for view in report.students.iter().chain(&report.lecturers) {
                    println!();
                    print!("{}", view.render());
                }
            }

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "report written");
            }

            if !report.unplaced.is_empty() {
                bail!(
                    "{} course(s) could not be placed: {}",
                    report.unplaced.len(),
                    report.unplaced.join(", ")
                );
            }
        }

        Commands::Generate {
            courses,
            students,
            seed,
            output,
        } => {
            let config = InstanceGeneratorConfig::default()
                .with_courses(courses)
                .with_students(students)
                .with_seed(seed);
            let request = InstanceGenerator::new(config).generate();
            let json = ProblemDocument::from_request(&request).to_json()?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), courses, students, "problem written");
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}
