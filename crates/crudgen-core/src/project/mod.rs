//! Project collaborators: modules, entity metadata and the filesystem
//!
//! The plan builder only talks to the traits defined here. The YAML
//! [`ProjectManifest`] is the stock implementation used by the CLI.

pub mod fs;
pub mod manifest;

use crate::error::Result;
use crate::naming::EntityRef;
use crate::plan::ModuleKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use fs::{Filesystem, LocalFilesystem};
pub use manifest::{ManifestDefaults, ProjectManifest};

/// A module owning a namespace and a directory tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleReference {
    pub name: String,
    /// Path prefix such as `Acme/BlogModule`
    pub namespace: String,
    /// Absolute directory of the module
    pub root_path: PathBuf,
}

impl ModuleReference {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        root_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            root_path: root_path.into(),
        }
    }

    pub fn kind(&self) -> ModuleKind {
        ModuleKind::of(&self.name)
    }
}

/// Persistence-level description of a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

/// Identifier and field mapping of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Identifier field names, in declaration order
    #[serde(default = "default_identifier")]
    pub identifier: Vec<String>,

    /// Field mappings, in declaration order
    #[serde(default)]
    pub fields: IndexMap<String, FieldDescriptor>,
}

fn default_identifier() -> Vec<String> {
    vec!["id".to_string()]
}

impl EntityMetadata {
    pub fn new(identifier: Vec<String>) -> Self {
        Self {
            identifier,
            fields: IndexMap::new(),
        }
    }

    /// Append a field mapping (builder style)
    pub fn with_field(mut self, name: &str, field_type: &str) -> Self {
        self.fields.insert(
            name.to_string(),
            FieldDescriptor {
                field_type: field_type.to_string(),
                nullable: false,
                length: None,
            },
        );
        self
    }
}

/// Resolves module names to module references
pub trait ModuleRegistry {
    fn module(&self, name: &str) -> Result<ModuleReference>;

    /// Names of every known module, for prompting
    fn module_names(&self) -> Vec<String>;
}

/// Resolves entity references to their metadata
pub trait MetadataSource {
    fn metadata(&self, entity: &EntityRef) -> Result<EntityMetadata>;
}
