//! Identifier normalization: module/entity shorthand parsing and derived names

use crate::error::{GenerationError, Result};
use convert_case::{Case, Casing};
use serde::Serialize;
use std::fmt;

/// Characters accepted between a module identifier and what follows it
pub(crate) const SEPARATORS: &[char] = &[':', '/', '\\', '.'];

/// Suffix every module name is expected to carry (`BlogModule`)
pub const MODULE_SUFFIX: &str = "Module";

/// A single identifier segment: a letter followed by letters, digits or `_`
fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Split `Module:Rest` (or `Vendor/Module`, `Vendor\Module`, `Vendor.Module`)
/// on the first separator.
///
/// The remainder keeps any further segments, normalized to `/`.
pub fn parse_module_namespace(input: &str) -> Result<(String, String)> {
    let input = input.trim();
    let pos = input.find(SEPARATORS).ok_or_else(|| {
        GenerationError::invalid(
            input,
            "expected a separator between the module and the rest (e.g. BlogModule:Post)",
        )
    })?;

    let (module, rest) = (&input[..pos], &input[pos + 1..]);
    if !is_valid_segment(module) {
        return Err(GenerationError::invalid(
            input,
            format!(
                "'{}' is not a valid module identifier (letters, digits and '_', starting with a letter)",
                module
            ),
        ));
    }

    let segments: Vec<&str> = rest.split(SEPARATORS).collect();
    if let Some(bad) = segments.iter().find(|s| !is_valid_segment(s)) {
        let reason = if bad.is_empty() {
            "empty segment after the module identifier".to_string()
        } else {
            format!("'{}' is not a valid identifier segment", bad)
        };
        return Err(GenerationError::invalid(input, reason));
    }

    Ok((module.to_string(), segments.join("/")))
}

/// Canonical reference to an entity: owning module plus entity path
///
/// The entity path may carry sub-namespace segments (`Admin/Post`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntityRef {
    module_part: String,
    entity_path: String,
}

impl EntityRef {
    /// Parse shorthand such as `BlogModule:Post` or `BlogModule:Admin/Post`
    pub fn parse(shorthand: &str) -> Result<Self> {
        let (module_part, entity_path) = parse_module_namespace(shorthand)?;
        Ok(Self {
            module_part,
            entity_path,
        })
    }

    /// Build from separately collected module and entity answers
    pub fn from_parts(module: &str, entity: &str) -> Result<Self> {
        Self::parse(&format!("{}:{}", module.trim(), entity.trim()))
    }

    pub fn module_part(&self) -> &str {
        &self.module_part
    }

    pub fn entity_path(&self) -> &str {
        &self.entity_path
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.entity_path.split('/')
    }

    /// Entity class name without sub-namespace
    pub fn leaf(&self) -> &str {
        self.entity_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.entity_path)
    }

    /// Sub-namespace segments between the module and the leaf
    pub fn sub_namespace(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self.segments().collect();
        segments.pop();
        segments
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module_part, self.entity_path)
    }
}

/// lowerCamel service name for a module identifier (`BlogModule` -> `blog`)
pub fn derive_service_name(module_part: &str) -> String {
    let base = match module_part.strip_suffix(MODULE_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => module_part,
    };
    base.to_case(Case::Camel)
}

/// Joins snake-cased path segments; snake case never yields a double `_`
const LINK_SEGMENT_SEPARATOR: &str = "__";

/// Flat lowercase routing key for an entity (`Admin/BlogPost` -> `admin__blog_post`)
///
/// `Admin/Post` and `AdminPost` get distinct keys (`admin__post`, `admin_post`).
pub fn derive_link_name(entity: &EntityRef) -> String {
    entity
        .segments()
        .map(|segment| segment.to_case(Case::Snake))
        .collect::<Vec<_>>()
        .join(LINK_SEGMENT_SEPARATOR)
}
