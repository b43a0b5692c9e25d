//! Default query pipeline hooks: preload, query, search and paginate.

use crate::action::Action;
use crate::error::AppError;
use crate::query::{Params, Query};
use crate::repo::Listing;
use crate::resource::ResourceDescriptor;
use crate::schema::Record;

/// What the preload hook works on: a query not yet executed, or a fetched record.
#[derive(Clone, Debug)]
pub enum PreloadTarget {
    Query(Query),
    Record(Record),
}

impl PreloadTarget {
    pub fn into_query(self) -> Option<Query> {
        match self {
            PreloadTarget::Query(q) => Some(q),
            PreloadTarget::Record(_) => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            PreloadTarget::Record(r) => Some(r),
            PreloadTarget::Query(_) => None,
        }
    }
}

/// Eager-load every declared association. For index/show/edit/delete/search/update the
/// associations are marked on the query; for any other action they are loaded onto the
/// fetched record instead, so a query passed with such an action comes back untouched.
pub async fn preload(
    descriptor: &ResourceDescriptor,
    target: PreloadTarget,
    _params: &Params,
    action: &Action,
) -> Result<PreloadTarget, AppError> {
    let associations = descriptor.schema().association_names();
    match target {
        PreloadTarget::Query(query) if action.preloads_on_query() => {
            tracing::debug!(route_name = %descriptor.route_name(), %action, ?associations, "preload on query");
            Ok(PreloadTarget::Query(query.preload(associations)))
        }
        PreloadTarget::Query(query) => Ok(PreloadTarget::Query(query)),
        PreloadTarget::Record(record) => {
            if associations.is_empty() {
                return Ok(PreloadTarget::Record(record));
            }
            tracing::debug!(route_name = %descriptor.route_name(), %action, ?associations, "preload on record");
            let record = descriptor.repo().preload(record, &associations).await?;
            Ok(PreloadTarget::Record(record))
        }
    }
}

/// An `id` param constrains the query for any action; otherwise index applies the `order` param.
pub fn query(descriptor: &ResourceDescriptor, query: Query, params: &Params, action: &Action) -> Query {
    if let Some(id) = params.id() {
        tracing::debug!(route_name = %descriptor.route_name(), %id, "query by id");
        return query.where_id(id.clone());
    }
    if *action == Action::Index {
        if let Some(order) = params.order() {
            let ordering = descriptor.services().sort.parse(descriptor.schema().as_ref(), order);
            if !ordering.is_empty() {
                tracing::debug!(route_name = %descriptor.route_name(), ?ordering, "query ordering");
                return query.order_by(ordering);
            }
        }
    }
    query
}

/// Search with the raw `search_terms` param for the search action, or when called without
/// an action; otherwise pass the query through.
pub fn search(descriptor: &ResourceDescriptor, query: Query, params: &Params, action: Option<&Action>) -> Query {
    match action {
        None | Some(Action::Search) => {
            let terms = params.search_terms();
            tracing::debug!(route_name = %descriptor.route_name(), terms, "search");
            descriptor
                .services()
                .searcher
                .search(descriptor.schema().as_ref(), query, terms)
        }
        Some(_) => query,
    }
}

/// Index and search only: a page from the repository when pagination is on, else every row.
pub async fn paginate(
    descriptor: &ResourceDescriptor,
    query: Query,
    params: &Params,
    action: &Action,
) -> Result<Listing, AppError> {
    if !action.is_listing() {
        return Err(AppError::BadRequest(format!(
            "{} has no listing for action '{}'",
            descriptor.route_name(),
            action
        )));
    }
    if descriptor.paginate() {
        let page = descriptor.repo().paginate(&query, params).await?;
        tracing::debug!(
            route_name = %descriptor.route_name(),
            page = page.page_number,
            total = page.total_entries,
            "paginated"
        );
        Ok(Listing::Page(page))
    } else {
        Ok(Listing::Resources(descriptor.repo().all(&query).await?))
    }
}
