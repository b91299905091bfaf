//! CRUD plan builder
//!
//! Turns a [`GenerationRequest`] into an ordered [`Plan`]: controller,
//! view directory, views, functional test, routing resource, then any
//! module-kind extras. Every check runs before the first job is emitted, so
//! a failed build never yields a partial job list.

use super::job::{join_segments, parameters, Artifact, Job, Plan, RenderJob};
use super::module_kind::specialization_jobs;
use super::request::GenerationRequest;
use crate::actions::{resolve_actions, Action, ActionSet};
use crate::error::{GenerationError, Result};
use crate::format::ConfigFormat;
use crate::naming::{EntityRef, NamingSurface};
use crate::project::{EntityMetadata, Filesystem};
use crate::routing::routing_entries;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// The only identifier field the skeletons know how to address
const IDENTIFIER_FIELD: &str = "id";

/// Reject entities whose identifier is anything but a single `id` field
pub fn check_identifier(entity: &EntityRef, metadata: &EntityMetadata) -> Result<()> {
    let reason = match metadata.identifier.as_slice() {
        [single] if single == IDENTIFIER_FIELD => return Ok(()),
        [] => "the entity declares no primary key".to_string(),
        [_] => format!(
            "the primary key field must be named \"{}\"",
            IDENTIFIER_FIELD
        ),
        many => format!(
            "entities with multiple primary keys ({}) are not supported",
            many.join(", ")
        ),
    };
    Err(GenerationError::UnsupportedIdentifier {
        entity: entity.to_string(),
        reason,
    })
}

/// Builds CRUD plans against a filesystem used only for existence checks
pub struct PlanBuilder<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    pub fn build(&self, request: &GenerationRequest) -> Result<Plan> {
        check_identifier(request.entity(), request.metadata())?;

        let (format, format_fell_back) = ConfigFormat::normalize(request.format());
        if format_fell_back {
            tracing::warn!(
                requested = %request.format(),
                "unknown configuration format, falling back to yml"
            );
        }

        let naming = NamingSurface::compute(
            request.entity(),
            format,
            request.route_prefix(),
            request.source_module(),
            request.target_module(),
        )?;
        let actions = resolve_actions(request.write_actions_enabled());
        let crud = CrudContext {
            request,
            naming,
            actions,
            format,
        };

        let controller_path = crud.controller_path();
        if !request.overwrite_allowed() && self.fs.exists(&controller_path) {
            return Err(GenerationError::Conflict {
                path: controller_path,
            });
        }

        let mut jobs = vec![Job::Render(crud.controller_job(controller_path))];

        let view_dir = crud.view_dir();
        jobs.push(Job::EnsureDirectory {
            path: view_dir.clone(),
        });
        jobs.extend(
            crud.actions
                .with_views()
                .map(|action| Job::Render(crud.view_job(&view_dir, action))),
        );

        jobs.push(Job::Render(crud.test_job()));

        if let Some(extension) = format.resource_extension() {
            jobs.push(Job::Render(crud.routing_job(extension)));
        }

        // Module-owned extras are written once; later runs leave them alone
        jobs.extend(
            specialization_jobs(request.target_module(), format)
                .into_iter()
                .filter(|job| !self.fs.exists(job.path())),
        );

        tracing::debug!(
            entity = %request.entity(),
            target = %request.target_module().name,
            jobs = jobs.len(),
            "built crud plan"
        );

        Ok(Plan {
            format,
            format_fell_back,
            jobs,
        })
    }
}

/// Derived data shared by every job of one CRUD plan
struct CrudContext<'r> {
    request: &'r GenerationRequest,
    naming: NamingSurface,
    actions: ActionSet,
    format: ConfigFormat,
}

impl CrudContext<'_> {
    fn entity(&self) -> &EntityRef {
        self.request.entity()
    }

    fn target_root(&self) -> &Path {
        &self.request.target_module().root_path
    }

    fn controller_path(&self) -> PathBuf {
        join_segments(
            &self.target_root().join("Controller"),
            self.entity().sub_namespace(),
        )
        .join(format!("{}Controller.php", self.entity().leaf()))
    }

    /// View directory relative to `Resources/views`, as the controller
    /// references it (`admin_Post` for admin targets)
    fn template_dir(&self) -> String {
        format!(
            "{}{}",
            self.naming.template_path_prefix,
            self.entity().entity_path()
        )
    }

    fn view_dir(&self) -> PathBuf {
        join_segments(
            &self.target_root().join("Resources").join("views"),
            self.template_dir().split('/'),
        )
    }

    fn test_path(&self) -> PathBuf {
        join_segments(
            &self.target_root().join("Tests").join("Controller"),
            self.entity().sub_namespace(),
        )
        .join(format!("{}ControllerTest.php", self.entity().leaf()))
    }

    fn routing_path(&self, extension: &str) -> PathBuf {
        self.target_root()
            .join("Resources")
            .join("config")
            .join("routing")
            .join(format!("{}.{}", self.naming.link_name, extension))
    }

    /// Field mappings as an ordered list of `{name, type, nullable, length}`
    fn fields(&self) -> Value {
        self.request
            .metadata()
            .fields
            .iter()
            .map(|(name, field)| {
                json!({
                    "name": name,
                    "type": field.field_type,
                    "nullable": field.nullable,
                    "length": field.length,
                })
            })
            .collect()
    }

    fn entity_namespace(&self) -> String {
        self.entity().sub_namespace().join("\\")
    }

    /// Parameters every artifact of the run receives
    fn common(&self) -> serde_json::Map<String, Value> {
        let source = self.request.source_module();
        let target = self.request.target_module();
        let mut common = serde_json::Map::new();
        common.insert("module".into(), json!(source.name));
        common.insert("to_module".into(), json!(target.name));
        common.insert("php_namespace".into(), json!(super::qualified_namespace(&source.namespace)));
        common.insert("to_php_namespace".into(), json!(super::qualified_namespace(&target.namespace)));
        common.insert("entity".into(), json!(self.entity().entity_path()));
        common.insert("entity_class".into(), json!(self.entity().leaf()));
        common.insert("entity_namespace".into(), json!(self.entity_namespace()));
        common.insert("actions".into(), json!(self.actions));
        common.insert("route_prefix".into(), json!(self.naming.route_prefix));
        common.insert("route_name_prefix".into(), json!(self.naming.route_name_prefix));
        common
    }

    fn with_common(&self, extra: Value) -> super::job::Parameters {
        let mut params = parameters(Value::Object(self.common()));
        params.extend(parameters(extra));
        params
    }

    fn controller_job(&self, path: PathBuf) -> RenderJob {
        let params = self.with_common(json!({
            "template_prefix": self.naming.template_path_prefix,
            "template_dir": self.template_dir(),
            "module_service": self.naming.service_name,
            "to_module_service": self.naming.target_service_name,
            "entity_link": self.naming.link_name,
            "identifier": IDENTIFIER_FIELD,
            "fields": self.fields(),
            "routes": routing_entries(&self.naming, &self.actions),
            "format": self.format,
        }));
        RenderJob::new(Artifact::Controller, "crud/controller.php", path, params)
    }

    fn view_job(&self, dir: &Path, action: Action) -> RenderJob {
        let mut extra = json!({});
        if matches!(action, Action::Index | Action::Show) {
            extra["fields"] = self.fields();
        }
        if action == Action::Index {
            extra["record_actions"] = json!(self.actions.record_actions());
        }

        RenderJob::new(
            Artifact::View(action),
            &format!("crud/views/{}.html.twig", action),
            dir.join(format!("{}.html.twig", action)),
            self.with_common(extra),
        )
    }

    fn test_job(&self) -> RenderJob {
        let params = self.with_common(json!({
            "form_type_name": self.naming.form_type_name,
            "fields": self.fields(),
        }));
        RenderJob::new(Artifact::Test, "crud/tests/test.php", self.test_path(), params)
    }

    fn routing_job(&self, extension: &str) -> RenderJob {
        let params = self.with_common(json!({
            "routes": routing_entries(&self.naming, &self.actions),
            "format": self.format,
        }));
        RenderJob::new(
            Artifact::Routing,
            &format!("crud/config/routing.{}", extension),
            self.routing_path(extension),
            params,
        )
    }
}
