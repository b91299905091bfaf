//! Action set resolution

use serde::Serialize;
use std::fmt;

/// One generated operation on an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Index,
    Show,
    New,
    Edit,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::Show => "show",
            Action::New => "new",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }

    /// Delete is handled by a form embedded in other views
    pub fn has_view(&self) -> bool {
        !matches!(self, Action::Delete)
    }

    /// Whether the route addresses a single record by id
    pub fn is_record_action(&self) -> bool {
        matches!(self, Action::Show | Action::Edit | Action::Delete)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const READ_ONLY: &[Action] = &[Action::Index, Action::Show];
const READ_WRITE: &[Action] = &[
    Action::Index,
    Action::Show,
    Action::New,
    Action::Edit,
    Action::Delete,
];

/// Ordered set of enabled actions; `Index` is always first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActionSet(&'static [Action]);

impl ActionSet {
    pub fn contains(&self, action: Action) -> bool {
        self.0.contains(&action)
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Action] {
        self.0
    }

    /// Actions that render a view, in order
    pub fn with_views(&self) -> impl Iterator<Item = Action> + '_ {
        self.iter().filter(Action::has_view)
    }

    /// Actions addressing one record, shown as per-row links in the index view
    pub fn record_actions(&self) -> Vec<Action> {
        self.iter()
            .filter(|a| matches!(a, Action::Show | Action::Edit))
            .collect()
    }

    pub fn is_read_write(&self) -> bool {
        self.contains(Action::New)
    }
}

/// `[index, show]` or `[index, show, new, edit, delete]`
pub fn resolve_actions(with_write_actions: bool) -> ActionSet {
    if with_write_actions {
        ActionSet(READ_WRITE)
    } else {
        ActionSet(READ_ONLY)
    }
}
