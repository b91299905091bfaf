//! Module scaffolding plan: the skeleton of a brand-new module

use super::job::{join_segments, parameters, Artifact, Job, Plan, RenderJob};
use super::module_kind::specialization_jobs;
use crate::error::{GenerationError, Result};
use crate::format::ConfigFormat;
use crate::naming::{parse_module_namespace, MODULE_SUFFIX};
use crate::project::{Filesystem, ModuleReference};
use convert_case::{Case, Casing};
use serde_json::json;
use std::path::PathBuf;

/// Input of one module scaffolding run
#[derive(Debug, Clone)]
pub struct ModuleRequest {
    /// `Vendor/NameModule`
    pub namespace: String,
    /// Directory the namespace path is created under
    pub root_dir: PathBuf,
    /// Raw format answer; normalized like CRUD requests
    pub format: String,
    /// Also create the optional resource directories
    pub structure: bool,
}

impl ModuleRequest {
    pub fn new(namespace: impl Into<String>, root_dir: impl Into<PathBuf>) -> Self {
        Self {
            namespace: namespace.into(),
            root_dir: root_dir.into(),
            format: "annotation".to_string(),
            structure: false,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_structure(mut self, structure: bool) -> Self {
        self.structure = structure;
        self
    }

    /// Validate the namespace and derive the module it describes
    pub fn module(&self) -> Result<ModuleReference> {
        let (vendor, rest) = parse_module_namespace(&self.namespace)?;
        let name = rest.rsplit('/').next().unwrap_or(&rest).to_string();
        if name.len() <= MODULE_SUFFIX.len() || !name.ends_with(MODULE_SUFFIX) {
            return Err(GenerationError::invalid(
                &self.namespace,
                format!("the module name must end with '{}' (e.g. Acme/BlogModule)", MODULE_SUFFIX),
            ));
        }

        let segments = std::iter::once(vendor.as_str()).chain(rest.split('/'));
        let root_path = join_segments(&self.root_dir, segments);
        Ok(ModuleReference::new(
            name,
            format!("{}/{}", vendor, rest),
            root_path,
        ))
    }
}

/// Builds module scaffolding plans
pub struct ModulePlanBuilder<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> ModulePlanBuilder<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    pub fn build(&self, request: &ModuleRequest) -> Result<Plan> {
        let module = request.module()?;
        if self.fs.has_entries(&module.root_path) {
            return Err(GenerationError::Conflict {
                path: module.root_path,
            });
        }

        let (format, format_fell_back) = ConfigFormat::normalize(&request.format);
        if format_fell_back {
            tracing::warn!(
                requested = %request.format,
                "unknown configuration format, falling back to yml"
            );
        }

        let basename = module
            .name
            .strip_suffix(MODULE_SUFFIX)
            .unwrap_or(&module.name)
            .to_string();
        let params = parameters(json!({
            "php_namespace": super::qualified_namespace(&module.namespace),
            "module": module.name,
            "format": format,
            "module_basename": basename,
            "extension_alias": basename.to_case(Case::Snake),
        }));
        let root = &module.root_path;
        let render = |artifact, template: &str, path: PathBuf| {
            Job::Render(RenderJob::new(artifact, template, path, params.clone()))
        };

        let services_ext = match format {
            ConfigFormat::Annotation => "xml",
            other => other.as_str(),
        };

        let mut jobs = vec![
            render(
                Artifact::ModuleClass,
                "module/Module.php",
                root.join(format!("{}.php", module.name)),
            ),
            render(
                Artifact::Extension,
                "module/Extension.php",
                root.join("DependencyInjection")
                    .join(format!("{}Extension.php", basename)),
            ),
            render(
                Artifact::Configuration,
                "module/Configuration.php",
                root.join("DependencyInjection").join("Configuration.php"),
            ),
            render(
                Artifact::DefaultController,
                "module/DefaultController.php",
                root.join("Controller").join("DefaultController.php"),
            ),
            render(
                Artifact::DefaultTest,
                "module/DefaultControllerTest.php",
                root.join("Tests")
                    .join("Controller")
                    .join("DefaultControllerTest.php"),
            ),
            render(
                Artifact::DefaultView,
                "module/index.html.twig",
                root.join("Resources")
                    .join("views")
                    .join("Default")
                    .join("index.html.twig"),
            ),
            render(
                Artifact::Services,
                &format!("module/services.{}", services_ext),
                root.join("Resources")
                    .join("config")
                    .join(format!("services.{}", services_ext)),
            ),
        ];

        if let Some(extension) = format.resource_extension() {
            jobs.push(render(
                Artifact::ModuleRouting,
                &format!("module/routing.{}", extension),
                root.join("Resources")
                    .join("config")
                    .join(format!("routing.{}", extension)),
            ));
        }

        if request.structure {
            for dir in ["doc", "public/css", "public/images", "public/js", "translations"] {
                jobs.push(Job::EnsureDirectory {
                    path: join_segments(&root.join("Resources"), dir.split('/')),
                });
            }
        }

        jobs.extend(specialization_jobs(&module, format));

        tracing::debug!(module = %module.name, jobs = jobs.len(), "built module plan");

        Ok(Plan {
            format,
            format_fell_back,
            jobs,
        })
    }
}
