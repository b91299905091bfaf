//! Generation requests: the full, immutable input of one CRUD run

use crate::error::Result;
use crate::naming::EntityRef;
use crate::project::{EntityMetadata, MetadataSource, ModuleReference, ModuleRegistry};

/// Everything needed to plan one CRUD generation
///
/// Fields are only set through the constructor and the consuming `with_*`
/// setters; planning reads them through the getters.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    entity: EntityRef,
    /// Module declaring the entity
    source_module: ModuleReference,
    /// Module receiving the generated artifacts
    target_module: ModuleReference,
    metadata: EntityMetadata,
    /// Raw format answer; normalized by the plan builder
    format: String,
    /// Raw route prefix answer; empty means "derive from the entity"
    route_prefix: String,
    with_write_actions: bool,
    force_overwrite: bool,
}

impl GenerationRequest {
    pub fn new(
        entity: EntityRef,
        source_module: ModuleReference,
        target_module: ModuleReference,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            entity,
            source_module,
            target_module,
            metadata,
            format: "annotation".to_string(),
            route_prefix: String::new(),
            with_write_actions: false,
            force_overwrite: false,
        }
    }

    /// Look up both modules and the entity metadata.
    ///
    /// Without `target_module` the artifacts go to the module declaring the entity.
    pub fn resolve(
        entity: EntityRef,
        target_module: Option<&str>,
        modules: &dyn ModuleRegistry,
        metadata: &dyn MetadataSource,
    ) -> Result<Self> {
        let source_module = modules.module(entity.module_part())?;
        let target_module = match target_module {
            Some(name) if name != source_module.name => modules.module(name)?,
            _ => source_module.clone(),
        };
        let metadata = metadata.metadata(&entity)?;
        Ok(Self::new(entity, source_module, target_module, metadata))
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_route_prefix(mut self, route_prefix: impl Into<String>) -> Self {
        self.route_prefix = route_prefix.into();
        self
    }

    pub fn with_write_actions(mut self, with_write_actions: bool) -> Self {
        self.with_write_actions = with_write_actions;
        self
    }

    pub fn force_overwrite(mut self, force_overwrite: bool) -> Self {
        self.force_overwrite = force_overwrite;
        self
    }

    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }

    pub fn source_module(&self) -> &ModuleReference {
        &self.source_module
    }

    pub fn target_module(&self) -> &ModuleReference {
        &self.target_module
    }

    pub fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn route_prefix(&self) -> &str {
        &self.route_prefix
    }

    pub fn write_actions_enabled(&self) -> bool {
        self.with_write_actions
    }

    pub fn overwrite_allowed(&self) -> bool {
        self.force_overwrite
    }
}
