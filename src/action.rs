//! Page actions and page kinds the presentation layer asks about.

use serde::Serialize;
use std::fmt;

/// Controller action the current request is serving.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Index,
    Show,
    New,
    Create,
    Edit,
    Update,
    Delete,
    Search,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Index => "index",
            Action::Show => "show",
            Action::New => "new",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Search => "search",
            Action::Other(s) => s,
        }
    }

    /// Actions whose associations are preloaded on the query rather than on a fetched record.
    pub fn preloads_on_query(&self) -> bool {
        matches!(
            self,
            Action::Index | Action::Show | Action::Edit | Action::Delete | Action::Search | Action::Update
        )
    }

    /// Actions that produce a listing (paged or full).
    pub fn is_listing(&self) -> bool {
        matches!(self, Action::Index | Action::Search)
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        match s {
            "index" => Action::Index,
            "show" => Action::Show,
            "new" => Action::New,
            "create" => Action::Create,
            "edit" => Action::Edit,
            "update" => Action::Update,
            "delete" => Action::Delete,
            "search" => Action::Search,
            other => Action::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which kind of page a column set is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Index,
    Show,
    Form,
}

impl PageKind {
    pub const ALL: [PageKind; 3] = [PageKind::Index, PageKind::Show, PageKind::Form];
}
