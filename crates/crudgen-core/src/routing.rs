//! Routing entry derivation for generated routing resources
//!
//! How an entry is written (inserted or merged into an existing resource) is
//! up to the renderer; the key and path rules live here.

use crate::actions::{Action, ActionSet};
use crate::naming::NamingSurface;
use serde::Serialize;

/// One route the generated controller answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingEntry {
    /// `{route_name_prefix}_{action}`
    pub name: String,
    pub path: String,
    pub action: Action,
    pub methods: Vec<&'static str>,
}

fn methods_for(action: Action) -> Vec<&'static str> {
    match action {
        Action::Index | Action::Show => vec!["GET"],
        Action::New => vec!["POST"],
        Action::Edit => vec!["PUT"],
        Action::Delete => vec!["DELETE"],
    }
}

/// Routes for every enabled action, in action order
pub fn routing_entries(naming: &NamingSurface, actions: &ActionSet) -> Vec<RoutingEntry> {
    let base = naming.route_prefix.trim_end_matches('/');
    actions
        .iter()
        .map(|action| {
            let path = if action.is_record_action() {
                format!("{}/{{id}}", base)
            } else if base.is_empty() {
                "/".to_string()
            } else {
                base.to_string()
            };
            RoutingEntry {
                name: route_name(&naming.route_name_prefix, action),
                path,
                action,
                methods: methods_for(action),
            }
        })
        .collect()
}

/// `post` + `show` -> `post_show`; a bare action when the prefix is empty
pub fn route_name(route_name_prefix: &str, action: Action) -> String {
    if route_name_prefix.is_empty() {
        action.to_string()
    } else {
        format!("{}_{}", route_name_prefix, action)
    }
}
