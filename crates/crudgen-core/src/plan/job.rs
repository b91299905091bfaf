//! Render jobs and the plan that carries them

use crate::actions::Action;
use crate::format::ConfigFormat;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Template parameters; sorted keys keep serialized plans byte-stable
pub type Parameters = BTreeMap<String, Value>;

/// Convert a `json!({...})` object into [`Parameters`]
pub(crate) fn parameters(value: Value) -> Parameters {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => Parameters::new(),
    }
}

/// What a render job produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Controller,
    View(Action),
    Test,
    Routing,
    BaseRepository,
    TransactionalService,
    ModuleClass,
    Extension,
    Configuration,
    DefaultController,
    DefaultView,
    DefaultTest,
    Services,
    ModuleRouting,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Artifact::Controller => "controller",
            Artifact::View(action) => return write!(f, "{}_view", action),
            Artifact::Test => "test",
            Artifact::Routing => "routing",
            Artifact::BaseRepository => "base_repository",
            Artifact::TransactionalService => "transactional_service",
            Artifact::ModuleClass => "module_class",
            Artifact::Extension => "extension",
            Artifact::Configuration => "configuration",
            Artifact::DefaultController => "default_controller",
            Artifact::DefaultView => "default_view",
            Artifact::DefaultTest => "default_test",
            Artifact::Services => "services",
            Artifact::ModuleRouting => "module_routing",
        };
        f.write_str(name)
    }
}

impl Serialize for Artifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Artifact {
    /// Routing resources are merged into an existing file rather than replaced
    pub fn is_routing(&self) -> bool {
        matches!(self, Artifact::Routing | Artifact::ModuleRouting)
    }
}

/// One artifact to render: template, destination and parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderJob {
    pub artifact: Artifact,
    pub template_id: String,
    pub output_path: PathBuf,
    pub parameters: Parameters,
}

impl RenderJob {
    pub fn new(
        artifact: Artifact,
        template_id: &str,
        output_path: PathBuf,
        parameters: Parameters,
    ) -> Self {
        Self {
            artifact,
            template_id: template_id.to_string(),
            output_path,
            parameters,
        }
    }
}

/// A step of a plan, executed strictly in order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Job {
    /// Create a directory (and parents) if it does not exist yet
    EnsureDirectory { path: PathBuf },
    Render(RenderJob),
}

impl Job {
    pub fn path(&self) -> &Path {
        match self {
            Job::EnsureDirectory { path } => path,
            Job::Render(job) => &job.output_path,
        }
    }

    pub fn as_render(&self) -> Option<&RenderJob> {
        match self {
            Job::Render(job) => Some(job),
            Job::EnsureDirectory { .. } => None,
        }
    }
}

/// Validated, ordered output of a plan builder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub format: ConfigFormat,

    /// True when the requested format was unknown and `yml` was used instead
    pub format_fell_back: bool,

    pub jobs: Vec<Job>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn render_jobs(&self) -> impl Iterator<Item = &RenderJob> {
        self.jobs.iter().filter_map(Job::as_render)
    }

    pub fn artifacts(&self) -> Vec<Artifact> {
        self.render_jobs().map(|job| job.artifact).collect()
    }

    /// YAML dump for dry runs
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// `root` followed by every segment
pub(crate) fn join_segments<'a>(root: &Path, segments: impl IntoIterator<Item = &'a str>) -> PathBuf {
    segments
        .into_iter()
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}
