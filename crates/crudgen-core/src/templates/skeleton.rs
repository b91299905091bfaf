//! Skeleton templates: embedded defaults plus optional local overrides
//!
//! Overrides mirror the embedded layout: `crud/controller.php.jinja` in the
//! override directory replaces the built-in controller skeleton.

use crate::error::{GenerationError, Result};
use crate::plan::Parameters;
use crate::product::ProductConfig;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension carried by skeleton files on disk
pub const TEMPLATE_EXTENSION: &str = "jinja";

macro_rules! embedded {
    ($($id:literal),* $(,)?) => {
        &[$(($id, include_str!(concat!("../../skeleton/", $id, ".jinja")))),*]
    };
}

/// Built-in skeletons, keyed by template id
const EMBEDDED: &[(&str, &str)] = embedded![
    "crud/controller.php",
    "crud/views/index.html.twig",
    "crud/views/show.html.twig",
    "crud/views/new.html.twig",
    "crud/views/edit.html.twig",
    "crud/tests/test.php",
    "crud/config/routing.yml",
    "crud/config/routing.xml",
    "crud/config/routing.php",
    "module/Module.php",
    "module/Extension.php",
    "module/Configuration.php",
    "module/DefaultController.php",
    "module/DefaultControllerTest.php",
    "module/index.html.twig",
    "module/services.yml",
    "module/services.xml",
    "module/services.php",
    "module/routing.yml",
    "module/routing.xml",
    "module/routing.php",
    "module/BaseRepository.php",
    "module/TransactionalService.php",
];

/// Where skeletons come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkeletonSource {
    Embedded,
    /// Embedded skeletons with files from this directory layered on top
    Local(PathBuf),
}

impl SkeletonSource {
    /// An explicit directory wins, then the product's environment variable
    pub fn from_config<C: ProductConfig>(config: &C, explicit: Option<PathBuf>) -> Self {
        explicit
            .or_else(|| std::env::var_os(config.skeleton_dir_env()).map(PathBuf::from))
            .map_or(SkeletonSource::Embedded, SkeletonSource::Local)
    }
}

/// Loaded skeleton set, ready to render
pub struct Skeletons {
    env: Environment<'static>,
    overridden: Vec<String>,
}

impl Skeletons {
    pub fn embedded() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        for &(id, source) in EMBEDDED {
            if let Err(e) = env.add_template(id, source) {
                tracing::error!(template = id, error = %e, "invalid embedded skeleton");
            }
        }
        Self {
            env,
            overridden: Vec::new(),
        }
    }

    pub fn load(source: &SkeletonSource) -> Result<Self> {
        let mut skeletons = Self::embedded();
        if let SkeletonSource::Local(dir) = source {
            skeletons.add_overrides(dir)?;
        }
        Ok(skeletons)
    }

    fn add_overrides(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Err(GenerationError::filesystem(
                dir,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "skeleton directory not found",
                ),
            ));
        }

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| GenerationError::filesystem(dir, e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
            {
                continue;
            }

            let Ok(relative) = path.with_extension("").strip_prefix(dir).map(Path::to_path_buf)
            else {
                continue;
            };
            let id = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let source = std::fs::read_to_string(path)
                .map_err(|e| GenerationError::filesystem(path, e))?;
            self.env
                .add_template_owned(id.clone(), source)
                .map_err(|e| GenerationError::render(path, e))?;

            tracing::debug!(template = %id, path = %path.display(), "skeleton override");
            self.overridden.push(id);
        }
        Ok(())
    }

    /// Template ids replaced by local overrides
    pub fn overridden(&self) -> &[String] {
        &self.overridden
    }

    pub fn has_template(&self, id: &str) -> bool {
        self.env.get_template(id).is_ok()
    }

    pub fn render(&self, id: &str, parameters: &Parameters) -> Result<String, minijinja::Error> {
        self.env.get_template(id)?.render(parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::job::parameters;
    use serde_json::json;

    #[test]
    fn test_all_embedded_templates_parse() {
        let skeletons = Skeletons::embedded();
        for (id, _) in EMBEDDED {
            assert!(skeletons.has_template(id), "{} failed to load", id);
        }
    }

    #[test]
    fn test_render_module_class() {
        let skeletons = Skeletons::embedded();
        let out = skeletons
            .render(
                "module/Module.php",
                &parameters(json!({ "php_namespace": "Acme\\BlogModule", "module": "BlogModule" })),
            )
            .unwrap();
        assert!(out.contains("namespace Acme\\BlogModule;"));
        assert!(out.contains("class BlogModule extends Bundle"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_missing_parameter_is_an_error() {
        let skeletons = Skeletons::embedded();
        assert!(skeletons
            .render("module/Module.php", &parameters(json!({ "module": "BlogModule" })))
            .is_err());
    }

    #[test]
    fn test_local_overrides_replace_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("module")).unwrap();
        std::fs::write(
            dir.path().join("module/Module.php.jinja"),
            "custom {{ module }}\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("module/README.md"), "ignored").unwrap();

        let skeletons = Skeletons::load(&SkeletonSource::Local(dir.path().to_path_buf())).unwrap();
        assert_eq!(skeletons.overridden(), &["module/Module.php".to_string()]);

        let out = skeletons
            .render("module/Module.php", &parameters(json!({ "module": "BlogModule" })))
            .unwrap();
        assert_eq!(out, "custom BlogModule\n");
        assert!(skeletons.has_template("crud/controller.php"));
    }

    #[test]
    fn test_missing_override_directory() {
        let result = Skeletons::load(&SkeletonSource::Local(PathBuf::from(
            "/nonexistent/crudgen/skeleton",
        )));
        assert!(matches!(result, Err(GenerationError::Filesystem { .. })));
    }
}
