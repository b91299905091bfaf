//! Module-kind specialization selected by module name

use super::job::{parameters, Artifact, Job, RenderJob};
use crate::format::ConfigFormat;
use crate::naming::{is_admin_module, is_core_module, MODULE_SUFFIX};
use crate::project::ModuleReference;
use convert_case::{Case, Casing};
use serde_json::json;

/// Kind of module, derived purely from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// `...CoreModule`: gets the shared data-access and transaction artifacts
    Core,
    /// `...AdminModule`: gets admin-prefixed templates
    Admin,
    Standard,
}

impl ModuleKind {
    pub fn of(name: &str) -> Self {
        if is_core_module(name) {
            ModuleKind::Core
        } else if is_admin_module(name) {
            ModuleKind::Admin
        } else {
            ModuleKind::Standard
        }
    }
}

/// Jobs appended once the baseline jobs for `module` are in place.
///
/// Only core modules get any. The parameters depend on the module alone,
/// so the artifacts are the same however many entities are generated.
pub fn specialization_jobs(module: &ModuleReference, format: ConfigFormat) -> Vec<Job> {
    match module.kind() {
        ModuleKind::Core => core_module_jobs(module, format),
        ModuleKind::Admin | ModuleKind::Standard => Vec::new(),
    }
}

fn core_module_jobs(module: &ModuleReference, format: ConfigFormat) -> Vec<Job> {
    let basename = module
        .name
        .strip_suffix(MODULE_SUFFIX)
        .unwrap_or(&module.name);
    let params = parameters(json!({
        "php_namespace": super::qualified_namespace(&module.namespace),
        "module": module.name,
        "format": format,
        "module_basename": basename,
        "extension_alias": basename.to_case(Case::Snake),
    }));

    vec![
        Job::Render(RenderJob::new(
            Artifact::BaseRepository,
            "module/BaseRepository.php",
            module.root_path.join("Repository").join("BaseRepository.php"),
            params.clone(),
        )),
        Job::Render(RenderJob::new(
            Artifact::TransactionalService,
            "module/TransactionalService.php",
            module.root_path.join("Services").join("TransactionalService.php"),
            params,
        )),
    ]
}
