//! Resource descriptors and the capability set the presentation and data-access layers call.
//!
//! Every capability has a default implementation in [`naming`], [`titles`] or [`hooks`].
//! A resource that needs different behaviour implements [`Resource`] for its own type and
//! overrides just those methods; the override can call the default function and adjust
//! its result:
//!
//! ```rust,ignore
//! struct Posts(ResourceDescriptor);
//!
//! impl Resource for Posts {
//!     fn descriptor(&self) -> &ResourceDescriptor {
//!         &self.0
//!     }
//!
//!     fn display_columns(&self, kind: PageKind) -> Vec<String> {
//!         let mut columns = naming::display_columns(self.0.schema().as_ref(), kind);
//!         columns.insert(0, "id".into());
//!         columns
//!     }
//! }
//! ```

pub mod descriptor;
pub mod hooks;
pub mod naming;
pub mod pipeline;
pub mod titles;

pub use descriptor::*;
pub use hooks::PreloadTarget;
pub use pipeline::*;

use crate::action::{Action, PageKind};
use crate::error::AppError;
use crate::i18n::{Catalog, Localizer};
use crate::query::{Params, Query, Searcher, SortParser, SortTranslator, TextSearch};
use crate::repo::Listing;
use crate::schema::Record;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Collaborators the hooks delegate to. Shared and immutable once a resource is registered.
#[derive(Clone)]
pub struct Services {
    pub localizer: Arc<dyn Localizer>,
    pub sort: Arc<dyn SortTranslator>,
    pub searcher: Arc<dyn Searcher>,
}

impl Default for Services {
    fn default() -> Self {
        Services {
            localizer: Arc::new(Catalog::new()),
            sort: Arc::new(SortParser),
            searcher: Arc::new(TextSearch),
        }
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

#[async_trait]
pub trait Resource: Send + Sync {
    fn descriptor(&self) -> &ResourceDescriptor;

    fn display_columns(&self, kind: PageKind) -> Vec<String> {
        naming::display_columns(self.descriptor().schema().as_ref(), kind)
    }

    fn render_column_name(&self, kind: PageKind, field: &str) -> String {
        naming::render_column_name(kind, field)
    }

    fn name_field(&self) -> Option<String> {
        naming::name_field(self.descriptor().schema().as_ref())
    }

    fn resource_title(&self, record: &Record) -> String {
        self.name_field()
            .map(|field| naming::field_text(record, &field))
            .unwrap_or_default()
    }

    fn display_name(&self) -> String {
        naming::display_name(self.descriptor().schema().as_ref())
    }

    fn display_name_plural(&self) -> String {
        naming::display_name_plural(self.descriptor().schema().as_ref())
    }

    fn header_title(&self, action: &Action, record: Option<&Record>) -> String {
        titles::header_title(self, action, record)
    }

    fn toolbar_title(&self) -> String {
        titles::toolbar_title(self)
    }

    async fn preload(&self, target: PreloadTarget, params: &Params, action: &Action) -> Result<PreloadTarget, AppError> {
        hooks::preload(self.descriptor(), target, params, action).await
    }

    fn query(&self, query: Query, params: &Params, action: &Action) -> Query {
        hooks::query(self.descriptor(), query, params, action)
    }

    /// `action` is None when called directly from a web request outside the index/search flow.
    fn search(&self, query: Query, params: &Params, action: Option<&Action>) -> Query {
        hooks::search(self.descriptor(), query, params, action)
    }

    async fn paginate(&self, query: Query, params: &Params, action: &Action) -> Result<Listing, AppError> {
        hooks::paginate(self.descriptor(), query, params, action).await
    }
}

impl Resource for ResourceDescriptor {
    fn descriptor(&self) -> &ResourceDescriptor {
        self
    }
}
