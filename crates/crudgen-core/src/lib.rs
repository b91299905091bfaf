//! Crudgen Core - CRUD and module scaffolding engine
//!
//! This library turns an entity reference plus a handful of answers into an
//! ordered plan of artifacts (controller, views, functional test, routing
//! resource) and executes that plan through a pluggable renderer.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Naming** - Pure functions for identifier parsing and the derived naming surface
//! - **Layer 2: Planning** - `GenerationRequest` / `ModuleRequest` in, immutable `Plan` out
//! - **Layer 3: Execution** - `RenderExecutor` trait and the minijinja-backed `SkeletonRenderer`
//! - **Layer 4: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! Planning never touches the filesystem except through the [`project::Filesystem`]
//! trait, so the same request always produces the same plan.
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use crudgen_core::{plan::PlanBuilder, project::*, templates::*, GenerationRequest, EntityRef};
//!
//! let manifest = ProjectManifest::load(Path::new("crudgen.yaml"))?;
//! let entity = EntityRef::parse("BlogModule:Post")?;
//! let request = GenerationRequest::resolve(entity, None, &manifest, &manifest)?
//!     .with_format("yml")
//!     .with_write_actions(true);
//!
//! let plan = PlanBuilder::new(&LocalFilesystem).build(&request)?;
//! let mut renderer = SkeletonRenderer::new(Skeletons::embedded());
//! execute_plan(&plan, &mut renderer)?;
//! ```

pub mod actions;
pub mod error;
pub mod format;
pub mod naming;
pub mod plan;
pub mod product;
pub mod project;
pub mod routing;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use actions::{resolve_actions, Action, ActionSet};
pub use error::{GenerationError, Result};
pub use format::ConfigFormat;
pub use naming::{EntityRef, NamingSurface};
pub use plan::{GenerationRequest, ModuleRequest, Plan};
pub use product::ProductConfig;

#[cfg(feature = "tui")]
pub use tui::{run_crud, run_module, CrudArgs, ModuleArgs};
