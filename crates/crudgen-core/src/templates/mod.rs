//! Skeleton loading, rendering and plan execution
//!
//! This module provides:
//! - Embedded skeletons with optional local overrides (`Skeletons`)
//! - The `RenderExecutor` boundary and its minijinja-backed implementation
//! - Plan execution in job order, plus a plain-text plan listing

pub mod renderer;
pub mod skeleton;

use crate::plan::{Job, Plan};
use colored::Colorize;
use std::path::Path;

pub use renderer::{execute_plan, RenderExecutor, SkeletonRenderer};
pub use skeleton::{SkeletonSource, Skeletons};

/// Print every job of a plan, paths shown relative to `base` when possible
pub fn print_plan(plan: &Plan, base: &Path) {
    println!(
        "{}",
        format!("{} job(s), {} format", plan.len(), plan.format)
            .cyan()
            .bold()
    );
    if plan.format_fell_back {
        eprintln!(
            "{} unknown format requested, using {}",
            "Warning:".yellow(),
            plan.format
        );
    }
    println!();

    for job in &plan.jobs {
        let path = display_path(job.path(), base);
        match job {
            Job::EnsureDirectory { .. } => println!("  {} {}", "mkdir".blue(), path),
            Job::Render(render) => println!(
                "  {} {} {}",
                "->".blue(),
                path,
                format!("({}, {})", render.artifact, render.template_id).dimmed()
            ),
        }
    }
}

fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
