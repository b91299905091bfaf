//! Plan building
//!
//! A plan is the ordered list of jobs one generation run needs. Building it
//! performs every validation and existence check up front and touches
//! nothing on disk; executing it is the renderer's job.

pub mod builder;
pub mod job;
pub mod module;
pub mod module_kind;
pub mod request;

pub use builder::{check_identifier, PlanBuilder};
pub use job::{Artifact, Job, Parameters, Plan, RenderJob};
pub use module::{ModulePlanBuilder, ModuleRequest};
pub use module_kind::{specialization_jobs, ModuleKind};
pub use request::GenerationRequest;

use crate::naming::identifier::SEPARATORS;

/// Namespace in the `\`-separated form used inside generated sources
pub(crate) fn qualified_namespace(namespace: &str) -> String {
    namespace
        .split(SEPARATORS)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("\\")
}
