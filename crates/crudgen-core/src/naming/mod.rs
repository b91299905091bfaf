//! Identifier normalization and naming policy
//!
//! Everything here is a pure string transform: no lookups, no I/O.

pub mod identifier;
pub mod policy;

pub use identifier::{
    derive_link_name, derive_service_name, parse_module_namespace, EntityRef, MODULE_SUFFIX,
};
pub use policy::{is_admin_module, is_core_module, NamingSurface};
