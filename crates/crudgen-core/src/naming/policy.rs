//! Naming policy: every derived identifier a skeleton needs, computed once

use super::identifier::{
    derive_link_name, derive_service_name, parse_module_namespace, EntityRef, SEPARATORS,
};
use crate::error::Result;
use crate::format::ConfigFormat;
use crate::project::ModuleReference;
use serde::Serialize;

/// Module names ending with this receive admin-prefixed templates
pub const ADMIN_MODULE_SUFFIX: &str = "AdminModule";

/// Module names ending with this receive the core-module extra artifacts
pub const CORE_MODULE_SUFFIX: &str = "CoreModule";

/// Whether `name` follows the admin module convention (`...AdminModule`)
pub fn is_admin_module(name: &str) -> bool {
    name.ends_with(ADMIN_MODULE_SUFFIX)
}

/// Whether `name` follows the core module convention (`...CoreModule`)
pub fn is_core_module(name: &str) -> bool {
    name.ends_with(CORE_MODULE_SUFFIX)
}

/// Derived names shared by every artifact of one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingSurface {
    /// Always starts with `/`
    pub route_prefix: String,
    pub route_name_prefix: String,
    pub template_path_prefix: String,
    /// Label embedded in generated tests; no form registry is consulted
    pub form_type_name: String,
    pub link_name: String,
    /// Service name of the module owning the entity
    pub service_name: String,
    /// Service name of the module receiving the artifacts
    pub target_service_name: String,
    pub format: ConfigFormat,
}

impl NamingSurface {
    pub fn compute(
        entity: &EntityRef,
        format: ConfigFormat,
        route_prefix_input: &str,
        source: &ModuleReference,
        target: &ModuleReference,
    ) -> Result<Self> {
        let link_name = derive_link_name(entity);
        let route_prefix = normalize_route_prefix(route_prefix_input, &link_name);

        Ok(Self {
            route_name_prefix: route_name_prefix(&route_prefix),
            route_prefix,
            template_path_prefix: if is_admin_module(&target.name) {
                "admin_".to_string()
            } else {
                String::new()
            },
            form_type_name: form_type_name(&source.namespace, entity),
            service_name: module_service_name(source)?,
            target_service_name: module_service_name(target)?,
            link_name,
            format,
        })
    }
}

/// Service name derived from the module half of a module namespace
fn module_service_name(module: &ModuleReference) -> Result<String> {
    let (_, rest) = parse_module_namespace(&module.namespace)?;
    let last = rest.rsplit('/').next().unwrap_or(&rest);
    Ok(derive_service_name(last))
}

/// Route prefix with exactly one leading `/` and no trailing `/`.
///
/// An empty input (or a bare `/`) defaults to the entity link name.
pub fn normalize_route_prefix(input: &str, link_name: &str) -> String {
    let trimmed = input.trim().trim_matches('/');
    if trimmed.is_empty() {
        format!("/{}", link_name)
    } else {
        format!("/{}", trimmed)
    }
}

/// `/admin/post` -> `admin_post`
pub fn route_name_prefix(route_prefix: &str) -> String {
    route_prefix.replace('/', "_").trim_matches('_').to_string()
}

/// Lowercase, fully qualified form type label
/// (`Acme/BlogModule` + `Admin/Post` -> `acme_blogmodule_admin_posttype`)
pub fn form_type_name(source_namespace: &str, entity: &EntityRef) -> String {
    let mut parts: Vec<String> = source_namespace
        .split(SEPARATORS)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    parts.extend(entity.sub_namespace().into_iter().map(str::to_string));
    parts.push(format!("{}Type", entity.leaf()));
    parts.join("_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn module(name: &str, namespace: &str) -> ModuleReference {
        ModuleReference::new(name, namespace, PathBuf::from("/srv/app/src").join(name))
    }

    #[test]
    fn test_admin_module_predicate() {
        assert!(is_admin_module("AdminModule"));
        assert!(is_admin_module("ShopAdminModule"));
        assert!(!is_admin_module("AdminToolsModule"));
        assert!(!is_admin_module("BlogModule"));
    }

    #[test]
    fn test_core_module_predicate() {
        assert!(is_core_module("CoreModule"));
        assert!(is_core_module("ShopCoreModule"));
        assert!(!is_core_module("CoreToolsModule"));
        assert!(!is_core_module("Core"));
    }

    #[test]
    fn test_route_prefix_defaults_to_link_name() {
        assert_eq!(normalize_route_prefix("", "post"), "/post");
        assert_eq!(normalize_route_prefix("/", "post"), "/post");
        assert_eq!(normalize_route_prefix("   ", "admin_post"), "/admin_post");
    }

    #[test]
    fn test_route_prefix_gets_single_leading_slash() {
        assert_eq!(normalize_route_prefix("blog/posts", "post"), "/blog/posts");
        assert_eq!(normalize_route_prefix("/blog/posts/", "post"), "/blog/posts");
    }

    #[test]
    fn test_route_name_prefix() {
        assert_eq!(route_name_prefix("/post"), "post");
        assert_eq!(route_name_prefix("/blog/posts"), "blog_posts");
    }

    #[test]
    fn test_form_type_name() {
        let flat = EntityRef::parse("BlogModule:Post").unwrap();
        assert_eq!(form_type_name("Acme/BlogModule", &flat), "acme_blogmodule_posttype");

        let nested = EntityRef::parse("BlogModule:Admin/Post").unwrap();
        assert_eq!(
            form_type_name("Acme\\BlogModule", &nested),
            "acme_blogmodule_admin_posttype"
        );
    }

    #[test]
    fn test_compute_surface_for_admin_target() {
        let entity = EntityRef::parse("BlogModule:Post").unwrap();
        let source = module("BlogModule", "Acme/BlogModule");
        let target = module("AdminModule", "Acme/AdminModule");

        let surface =
            NamingSurface::compute(&entity, ConfigFormat::Yml, "", &source, &target).unwrap();

        assert_eq!(surface.route_prefix, "/post");
        assert_eq!(surface.route_name_prefix, "post");
        assert_eq!(surface.template_path_prefix, "admin_");
        assert_eq!(surface.service_name, "blog");
        assert_eq!(surface.target_service_name, "admin");
        assert_eq!(surface.link_name, "post");
    }

    #[test]
    fn test_compute_surface_plain_target() {
        let entity = EntityRef::parse("BlogModule:Admin/Post").unwrap();
        let source = module("BlogModule", "Acme/BlogModule");

        let surface =
            NamingSurface::compute(&entity, ConfigFormat::Xml, "manage/posts", &source, &source)
                .unwrap();

        assert_eq!(surface.route_prefix, "/manage/posts");
        assert_eq!(surface.route_name_prefix, "manage_posts");
        assert_eq!(surface.template_path_prefix, "");
        assert_eq!(surface.link_name, "admin__post");
    }

    #[test]
    fn test_compute_rejects_bad_module_namespace() {
        let entity = EntityRef::parse("BlogModule:Post").unwrap();
        let source = module("BlogModule", "BlogModule");
        assert!(NamingSurface::compute(&entity, ConfigFormat::Yml, "", &source, &source).is_err());
    }
}
