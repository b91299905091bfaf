//! Plan execution: rendering jobs to disk in order

use super::skeleton::Skeletons;
use crate::error::{GenerationError, Result};
use crate::plan::{Job, Plan, RenderJob};
use std::path::{Path, PathBuf};

/// Side-effecting half of generation
pub trait RenderExecutor {
    /// Create `path` and its parents if missing
    fn ensure_directory(&mut self, path: &Path) -> Result<()>;

    /// Render one job to its output path, creating parent directories
    fn render(&mut self, job: &RenderJob) -> Result<()>;
}

/// Execute every job of `plan` in order and return the paths touched.
///
/// Stops at the first failing job. Files written by earlier jobs stay on
/// disk: there is no rollback, and re-running a failed plan with
/// `--overwrite` rewrites them.
pub fn execute_plan(plan: &Plan, executor: &mut dyn RenderExecutor) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(plan.len());
    for job in &plan.jobs {
        match job {
            Job::EnsureDirectory { path } => executor.ensure_directory(path)?,
            Job::Render(render) => executor.render(render)?,
        }
        written.push(job.path().to_path_buf());
    }
    Ok(written)
}

/// Renders skeletons with minijinja and writes the result as UTF-8
pub struct SkeletonRenderer {
    skeletons: Skeletons,
}

impl SkeletonRenderer {
    pub fn new(skeletons: Skeletons) -> Self {
        Self { skeletons }
    }

    pub fn skeletons(&self) -> &Skeletons {
        &self.skeletons
    }
}

impl RenderExecutor for SkeletonRenderer {
    fn ensure_directory(&mut self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| GenerationError::filesystem(path, e))
    }

    fn render(&mut self, job: &RenderJob) -> Result<()> {
        let path = &job.output_path;
        let mut content = self
            .skeletons
            .render(&job.template_id, &job.parameters)
            .map_err(|e| GenerationError::render(path, format!("{:#}", e)))?;

        if let Some(parent) = path.parent() {
            self.ensure_directory(parent)?;
        }

        let is_yaml = path.extension().and_then(|e| e.to_str()) == Some("yml");
        if job.artifact.is_routing() && is_yaml && path.is_file() {
            let existing =
                std::fs::read_to_string(path).map_err(|e| GenerationError::filesystem(path, e))?;
            content = merge_yaml_routes(&existing, &content)
                .map_err(|cause| GenerationError::render(path, cause))?;
            tracing::debug!(path = %path.display(), "merged routing resource");
        }

        std::fs::write(path, content).map_err(|e| GenerationError::filesystem(path, e))?;
        tracing::debug!(artifact = %job.artifact, path = %path.display(), "rendered");
        Ok(())
    }
}

/// Merge generated YAML routes into an existing resource.
///
/// Existing keys (and their definitions) win; new keys are appended in order.
fn merge_yaml_routes(existing: &str, generated: &str) -> std::result::Result<String, String> {
    let parse = |source: &str, what: &str| -> std::result::Result<serde_yaml::Mapping, String> {
        if source.trim().is_empty() {
            return Ok(serde_yaml::Mapping::new());
        }
        match serde_yaml::from_str::<serde_yaml::Value>(source) {
            Ok(serde_yaml::Value::Mapping(map)) => Ok(map),
            Ok(serde_yaml::Value::Null) => Ok(serde_yaml::Mapping::new()),
            Ok(_) => Err(format!("{} routing resource is not a mapping", what)),
            Err(e) => Err(format!("{} routing resource is not valid YAML: {}", what, e)),
        }
    };

    let mut merged = parse(existing, "existing")?;
    for (key, route) in parse(generated, "generated")? {
        if !merged.contains_key(&key) {
            merged.insert(key, route);
        }
    }
    serde_yaml::to_string(&merged).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::naming::EntityRef;
    use crate::plan::{Artifact, GenerationRequest, ModulePlanBuilder, ModuleRequest, PlanBuilder};
    use crate::project::{EntityMetadata, LocalFilesystem, ModuleReference};

    fn request(root: &Path, format: &str) -> GenerationRequest {
        let blog = ModuleReference::new("BlogModule", "Acme/BlogModule", root.join("BlogModule"));
        let admin = ModuleReference::new("AdminModule", "Acme/AdminModule", root.join("AdminModule"));
        let metadata = EntityMetadata::new(vec!["id".to_string()])
            .with_field("id", "integer")
            .with_field("title", "string")
            .with_field("published_at", "datetime");
        GenerationRequest::new(EntityRef::parse("BlogModule:Post").unwrap(), blog, admin, metadata)
            .with_format(format)
            .with_write_actions(true)
    }

    fn renderer() -> SkeletonRenderer {
        SkeletonRenderer::new(Skeletons::embedded())
    }

    #[test]
    fn test_execute_full_yml_plan() {
        let dir = tempfile::tempdir().unwrap();
        let plan = PlanBuilder::new(&LocalFilesystem)
            .build(&request(dir.path(), "yml"))
            .unwrap();

        let written = execute_plan(&plan, &mut renderer()).unwrap();
        assert_eq!(written.len(), plan.len());

        let root = dir.path().join("AdminModule");
        let controller =
            std::fs::read_to_string(root.join("Controller/PostController.php")).unwrap();
        assert!(controller.contains("namespace Acme\\AdminModule\\Controller;"));
        assert!(controller.contains("public function deleteAction(Request $request, $id)"));
        assert!(controller.contains("'AdminModule:admin_Post:index.html.twig'"));
        assert!(controller.contains("use Acme\\BlogModule\\Entity\\Post;"));
        assert!(!controller.contains("@Route"));

        let index =
            std::fs::read_to_string(root.join("Resources/views/admin_Post/index.html.twig")).unwrap();
        assert!(index.contains("{{ path('post_show', { 'id': entity.id }) }}"));
        assert!(index.contains("entity.published_at|date('Y-m-d H:i:s')"));
        assert!(index.contains("{% for entity in entities %}"));
        assert!(!root.join("Resources/views/admin_Post/delete.html.twig").exists());

        let test = std::fs::read_to_string(root.join("Tests/Controller/PostControllerTest.php"))
            .unwrap();
        assert!(test.contains("'acme_blogmodule_posttype[title]' => 'Test'"));

        let routing: serde_yaml::Mapping = serde_yaml::from_str(
            &std::fs::read_to_string(root.join("Resources/config/routing/post.yml")).unwrap(),
        )
        .unwrap();
        let keys: Vec<&str> = routing.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["post_index", "post_show", "post_new", "post_edit", "post_delete"]
        );
        assert_eq!(routing["post_show"]["path"].as_str(), Some("/post/{id}"));
    }

    #[test]
    fn test_annotation_controller_carries_routes() {
        let dir = tempfile::tempdir().unwrap();
        let plan = PlanBuilder::new(&LocalFilesystem)
            .build(&request(dir.path(), "annotation").with_write_actions(false))
            .unwrap();
        execute_plan(&plan, &mut renderer()).unwrap();

        let controller = std::fs::read_to_string(
            dir.path().join("AdminModule/Controller/PostController.php"),
        )
        .unwrap();
        assert!(controller.contains("@Route(\"/post\")"));
        assert!(controller.contains("@Route(\"/{id}\", name=\"post_show\")"));
        assert!(controller.contains("@Method(\"GET\")"));
        assert!(!controller.contains("newAction"));
        assert!(!dir.path().join("AdminModule/Resources/config/routing").exists());
    }

    #[test]
    fn test_xml_and_php_routing_render() {
        for format in ["xml", "php"] {
            let dir = tempfile::tempdir().unwrap();
            let plan = PlanBuilder::new(&LocalFilesystem)
                .build(&request(dir.path(), format))
                .unwrap();
            execute_plan(&plan, &mut renderer()).unwrap();

            let routing = std::fs::read_to_string(
                dir.path()
                    .join("AdminModule/Resources/config/routing")
                    .join(format!("post.{}", format)),
            )
            .unwrap();
            assert!(routing.contains("post_edit"));
            assert!(routing.contains("/post/{id}"));
        }
    }

    #[test]
    fn test_yaml_routing_merges_into_existing_resource() {
        let dir = tempfile::tempdir().unwrap();
        let routing_dir = dir.path().join("AdminModule/Resources/config/routing");
        std::fs::create_dir_all(&routing_dir).unwrap();
        std::fs::write(
            routing_dir.join("post.yml"),
            "post_index:\n    path: /custom\nlegacy_route:\n    path: /legacy\n",
        )
        .unwrap();

        let plan = PlanBuilder::new(&LocalFilesystem)
            .build(&request(dir.path(), "yml"))
            .unwrap();
        execute_plan(&plan, &mut renderer()).unwrap();

        let routing: serde_yaml::Mapping = serde_yaml::from_str(
            &std::fs::read_to_string(routing_dir.join("post.yml")).unwrap(),
        )
        .unwrap();
        assert_eq!(routing["post_index"]["path"].as_str(), Some("/custom"));
        assert!(routing.contains_key("legacy_route"));
        assert!(routing.contains_key("post_delete"));
    }

    #[test]
    fn test_merge_rejects_non_mapping() {
        assert!(merge_yaml_routes("- a\n- b\n", "x: 1\n").is_err());
        assert_eq!(merge_yaml_routes("", "x: 1\n").unwrap(), "x: 1\n");
    }

    #[test]
    fn test_module_plan_renders() {
        let dir = tempfile::tempdir().unwrap();
        let request = ModuleRequest::new("Acme/ShopCoreModule", dir.path())
            .with_format("yml")
            .with_structure(true);
        let plan = ModulePlanBuilder::new(&LocalFilesystem).build(&request).unwrap();
        execute_plan(&plan, &mut renderer()).unwrap();

        let root = dir.path().join("Acme/ShopCoreModule");
        assert!(root.join("ShopCoreModule.php").is_file());
        assert!(root.join("Resources/public/js").is_dir());
        let extension =
            std::fs::read_to_string(root.join("DependencyInjection/ShopCoreExtension.php")).unwrap();
        assert!(extension.contains("YamlFileLoader"));
        assert!(extension.contains("return 'shop_core';"));
        let service = std::fs::read_to_string(root.join("Services/TransactionalService.php")).unwrap();
        assert!(service.contains("namespace Acme\\ShopCoreModule\\Services;"));
    }

    /// Template references of the form `'Module:dir:file'` passed to `$this->render`
    fn rendered_templates(controller: &str) -> Vec<(String, String, String)> {
        controller
            .split("$this->render('")
            .skip(1)
            .filter_map(|rest| rest.split('\'').next())
            .filter_map(|reference| {
                let mut parts = reference.splitn(3, ':');
                Some((
                    parts.next()?.to_string(),
                    parts.next()?.to_string(),
                    parts.next()?.to_string(),
                ))
            })
            .collect()
    }

    #[test]
    fn test_controller_references_rendered_views() {
        for entity in ["BlogModule:Post", "BlogModule:Admin/Post"] {
            let dir = tempfile::tempdir().unwrap();
            let blog = ModuleReference::new("BlogModule", "Acme/BlogModule", dir.path().join("BlogModule"));
            let admin =
                ModuleReference::new("AdminModule", "Acme/AdminModule", dir.path().join("AdminModule"));
            let metadata = EntityMetadata::new(vec!["id".to_string()]).with_field("id", "integer");

            for target in [blog.clone(), admin] {
                let request =
                    GenerationRequest::new(EntityRef::parse(entity).unwrap(), blog.clone(), target.clone(), metadata.clone())
                        .with_format("yml")
                        .with_write_actions(true)
                        .force_overwrite(true);
                let plan = PlanBuilder::new(&LocalFilesystem).build(&request).unwrap();
                execute_plan(&plan, &mut renderer()).unwrap();

                let controller_path = plan.jobs[0].path();
                let references =
                    rendered_templates(&std::fs::read_to_string(controller_path).unwrap());
                assert_eq!(references.len(), 4, "{} into {}", entity, target.name);
                for (module, template_dir, file) in references {
                    assert_eq!(module, target.name);
                    let view = target
                        .root_path
                        .join("Resources/views")
                        .join(&template_dir)
                        .join(&file);
                    assert!(view.is_file(), "{} is referenced but was not rendered", view.display());
                }
            }
        }
    }

    #[test]
    fn test_core_module_files_survive_later_crud_runs() {
        let dir = tempfile::tempdir().unwrap();
        let module_plan = ModulePlanBuilder::new(&LocalFilesystem)
            .build(&ModuleRequest::new("Acme/ShopCoreModule", dir.path()).with_format("yml"))
            .unwrap();
        execute_plan(&module_plan, &mut renderer()).unwrap();

        let core = ModuleReference::new(
            "ShopCoreModule",
            "Acme/ShopCoreModule",
            dir.path().join("Acme/ShopCoreModule"),
        );
        let repository = core.root_path.join("Repository/BaseRepository.php");
        std::fs::write(&repository, "<?php // customised\n").unwrap();

        let mut extras = 0;
        for entity in ["ShopCoreModule:Order", "ShopCoreModule:Product"] {
            let metadata = EntityMetadata::new(vec!["id".to_string()]).with_field("id", "integer");
            let request =
                GenerationRequest::new(EntityRef::parse(entity).unwrap(), core.clone(), core.clone(), metadata)
                    .with_format("yml");
            let plan = PlanBuilder::new(&LocalFilesystem).build(&request).unwrap();
            extras += plan
                .artifacts()
                .iter()
                .filter(|a| matches!(a, Artifact::BaseRepository | Artifact::TransactionalService))
                .count();
            execute_plan(&plan, &mut renderer()).unwrap();
        }

        assert_eq!(extras, 0);
        assert_eq!(
            std::fs::read_to_string(&repository).unwrap(),
            "<?php // customised\n"
        );
    }

    #[test]
    fn test_nested_and_camel_case_entities_keep_their_routes() {
        let dir = tempfile::tempdir().unwrap();
        let blog = ModuleReference::new("BlogModule", "Acme/BlogModule", dir.path().join("BlogModule"));
        let metadata = EntityMetadata::new(vec!["id".to_string()]).with_field("id", "integer");

        for entity in ["BlogModule:Admin/Post", "BlogModule:AdminPost"] {
            let request = GenerationRequest::new(
                EntityRef::parse(entity).unwrap(),
                blog.clone(),
                blog.clone(),
                metadata.clone(),
            )
            .with_format("yml");
            let plan = PlanBuilder::new(&LocalFilesystem).build(&request).unwrap();
            execute_plan(&plan, &mut renderer()).unwrap();
        }

        let routing_dir = blog.root_path.join("Resources/config/routing");
        let nested = std::fs::read_to_string(routing_dir.join("admin__post.yml")).unwrap();
        let flat = std::fs::read_to_string(routing_dir.join("admin_post.yml")).unwrap();
        assert!(nested.contains("admin__post_index:"));
        assert!(nested.contains("BlogModule:Admin/Post:index"));
        assert!(flat.contains("admin_post_index:"));
        assert!(flat.contains("BlogModule:AdminPost:index"));
    }

    /// Records calls and fails on a chosen job
    struct FailingExecutor {
        fail_at: usize,
        calls: Vec<PathBuf>,
    }

    impl RenderExecutor for FailingExecutor {
        fn ensure_directory(&mut self, path: &Path) -> Result<()> {
            self.calls.push(path.to_path_buf());
            Ok(())
        }

        fn render(&mut self, job: &RenderJob) -> Result<()> {
            if self.calls.len() == self.fail_at {
                return Err(GenerationError::render(&job.output_path, "boom"));
            }
            self.calls.push(job.output_path.clone());
            Ok(())
        }
    }

    #[test]
    fn test_execution_stops_at_first_failure_without_rollback() {
        let plan = PlanBuilder::new(&LocalFilesystem)
            .build(&request(Path::new("/nonexistent/crudgen"), "yml"))
            .unwrap();
        let mut executor = FailingExecutor {
            fail_at: 3,
            calls: Vec::new(),
        };

        let err = execute_plan(&plan, &mut executor).unwrap_err();
        assert!(matches!(err, GenerationError::Render { .. }));
        assert_eq!(executor.calls.len(), 3);
        assert_eq!(executor.calls[0], plan.jobs[0].path());
        assert_eq!(
            plan.jobs[3].as_render().unwrap().artifact,
            Artifact::View(Action::Show)
        );
    }
}
