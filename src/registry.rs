//! Registered resources, keyed by route name. Built once at startup and read-only afterwards.

use crate::action::PageKind;
use crate::error::ConfigError;
use crate::resource::Resource;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

pub type ResourceRef = Arc<dyn Resource>;

#[derive(Default)]
pub struct ResourceRegistry {
    resources: Vec<ResourceRef>,
    by_route: HashMap<String, usize>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource. Route names must be unique.
    pub fn register(&mut self, resource: ResourceRef) -> Result<(), ConfigError> {
        let route = resource.descriptor().route_name().to_string();
        if self.by_route.contains_key(&route) {
            return Err(ConfigError::DuplicateRoute(route));
        }
        tracing::info!(route_name = %route, "resource registered");
        self.by_route.insert(route, self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    pub fn get(&self, route_name: &str) -> Option<&ResourceRef> {
        self.by_route.get(route_name).map(|&i| &self.resources[i])
    }

    /// Look up by qualified or short schema name.
    pub fn by_schema(&self, name: &str) -> Option<&ResourceRef> {
        self.resources
            .iter()
            .find(|r| r.descriptor().schema().answers_to(name))
    }

    /// Resources in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceRef> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn meta(&self, route_name: &str) -> Option<ResourceMeta> {
        self.get(route_name).map(|r| ResourceMeta::of(r.as_ref()))
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<&str> = self.iter().map(|r| r.descriptor().route_name()).collect();
        f.debug_struct("ResourceRegistry").field("routes", &routes).finish()
    }
}

/// Snapshot of what generic admin UI code needs to render a resource.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
    pub route_name: String,
    pub params_key: String,
    pub display_name: String,
    pub display_name_plural: String,
    pub toolbar_title: String,
    pub name_field: Option<String>,
    pub paginate: bool,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub columns: BTreeMap<&'static str, Vec<Column>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Column {
    pub field: String,
    pub label: String,
}

impl ResourceMeta {
    pub fn of<R: Resource + ?Sized>(resource: &R) -> Self {
        let d = resource.descriptor();
        let columns = PageKind::ALL
            .into_iter()
            .map(|kind| {
                let cols = resource
                    .display_columns(kind)
                    .into_iter()
                    .map(|field| Column {
                        label: resource.render_column_name(kind, &field),
                        field,
                    })
                    .collect();
                (page_key(kind), cols)
            })
            .collect();
        ResourceMeta {
            route_name: d.route_name().to_string(),
            params_key: d.params_key().to_string(),
            display_name: resource.display_name(),
            display_name_plural: resource.display_name_plural(),
            toolbar_title: resource.toolbar_title(),
            name_field: resource.name_field(),
            paginate: d.paginate(),
            domain: d.domain().to_string(),
            theme: d.theme().map(str::to_string),
            columns,
        }
    }
}

fn page_key(kind: PageKind) -> &'static str {
    match kind {
        PageKind::Index => "index",
        PageKind::Show => "show",
        PageKind::Form => "form",
    }
}
