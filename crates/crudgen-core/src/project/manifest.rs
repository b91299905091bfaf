//! Project manifest (`crudgen.yaml`): modules, their entities and defaults

use super::{EntityMetadata, MetadataSource, ModuleReference, ModuleRegistry};
use crate::error::{GenerationError, Result};
use crate::naming::EntityRef;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default manifest file name looked up in the working directory
pub const MANIFEST_FILE: &str = "crudgen.yaml";

/// Defaults applied when an option is neither passed nor prompted for
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestDefaults {
    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub with_write: Option<bool>,

    /// Directory with skeleton overrides, relative to the manifest
    #[serde(default)]
    pub skeleton_dir: Option<PathBuf>,
}

/// One module entry in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,

    pub namespace: String,

    /// Module directory, relative to the manifest unless absolute
    pub path: PathBuf,

    /// Entity path (`Post`, `Admin/Post`) to metadata
    #[serde(default)]
    pub entities: IndexMap<String, EntityMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    defaults: ManifestDefaults,

    #[serde(default)]
    modules: Vec<ModuleEntry>,
}

/// Parsed project manifest, acting as module registry and metadata source
#[derive(Debug, Clone)]
pub struct ProjectManifest {
    path: PathBuf,
    base_dir: PathBuf,
    defaults: ManifestDefaults,
    modules: Vec<ModuleEntry>,
}

impl ProjectManifest {
    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GenerationError::filesystem(path, e))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let base_dir = std::path::absolute(&base_dir).unwrap_or(base_dir);
        Self::parse(&content, path, base_dir)
    }

    /// Parse manifest content; relative module paths resolve against `base_dir`
    pub fn parse(content: &str, path: &Path, base_dir: PathBuf) -> Result<Self> {
        let file: ManifestFile =
            serde_yaml::from_str(content).map_err(|e| GenerationError::Manifest {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut seen = std::collections::HashSet::new();
        for module in &file.modules {
            if !seen.insert(module.name.as_str()) {
                return Err(GenerationError::Manifest {
                    path: path.to_path_buf(),
                    message: format!("module '{}' is declared more than once", module.name),
                });
            }
        }

        tracing::debug!(
            manifest = %path.display(),
            modules = file.modules.len(),
            "loaded project manifest"
        );

        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            defaults: file.defaults,
            modules: file.modules,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn defaults(&self) -> &ManifestDefaults {
        &self.defaults
    }

    /// Skeleton override directory resolved against the manifest location
    pub fn skeleton_dir(&self) -> Option<PathBuf> {
        self.defaults
            .skeleton_dir
            .as_ref()
            .map(|dir| self.resolve(dir))
    }

    /// Entity paths declared for a module, for prompting
    pub fn entity_names(&self, module: &str) -> Vec<String> {
        self.find(module)
            .map(|m| m.entities.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn find(&self, name: &str) -> Option<&ModuleEntry> {
        self.modules.iter().find(|m| m.name == name)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl ModuleRegistry for ProjectManifest {
    fn module(&self, name: &str) -> Result<ModuleReference> {
        let entry = self
            .find(name)
            .ok_or_else(|| GenerationError::ModuleNotFound(name.to_string()))?;
        Ok(ModuleReference::new(
            &entry.name,
            &entry.namespace,
            self.resolve(&entry.path),
        ))
    }

    fn module_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name.clone()).collect()
    }
}

impl MetadataSource for ProjectManifest {
    fn metadata(&self, entity: &EntityRef) -> Result<EntityMetadata> {
        let not_found = || GenerationError::EntityNotFound(entity.to_string());
        let module = self.find(entity.module_part()).ok_or_else(not_found)?;
        module
            .entities
            .iter()
            .find(|(key, _)| key.replace(['\\', '.', ':'], "/") == entity.entity_path())
            .map(|(_, metadata)| metadata.clone())
            .ok_or_else(not_found)
    }
}
