//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to name itself and to say where its
//! configuration comes from. The library reads environment overrides through
//! it instead of hard-coding variable names.

use crate::plan::{Artifact, Plan};
use crate::project::manifest::MANIFEST_FILE;

/// Configuration trait for a generator front-end
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable overriding the project manifest path
    fn manifest_env(&self) -> &'static str;

    /// Manifest path used when neither flag nor environment names one
    fn default_manifest(&self) -> &'static str {
        MANIFEST_FILE
    }

    /// Environment variable naming a skeleton override directory
    fn skeleton_dir_env(&self) -> &'static str;

    /// Follow-up instructions after a plan has been executed
    fn next_steps(&self, plan: &Plan) -> Vec<String> {
        let mut steps = Vec::new();
        for job in plan.render_jobs() {
            match job.artifact {
                Artifact::Routing => steps.push(format!(
                    "Import the routing resource {} from your application routing",
                    job.output_path.display()
                )),
                Artifact::ModuleClass => {
                    steps.push("Register the new module in your application kernel".to_string())
                }
                Artifact::Test | Artifact::DefaultTest => steps.push(format!(
                    "Run the generated functional test {}",
                    job.output_path.display()
                )),
                _ => {}
            }
        }
        steps
    }
}
