//! Request-time pipeline: preload -> query -> search -> paginate.

use crate::action::Action;
use crate::error::AppError;
use crate::query::{Params, Query};
use crate::repo::Listing;
use crate::resource::{PreloadTarget, Resource};
use crate::schema::Record;

fn expect_query(target: PreloadTarget) -> Result<Query, AppError> {
    target
        .into_query()
        .ok_or_else(|| AppError::BadRequest("preload returned a record for a query".into()))
}

/// Run a listing request (index or search) through the resource's hooks.
pub async fn run_pipeline<R: Resource + ?Sized>(
    resource: &R,
    query: Query,
    params: &Params,
    action: &Action,
) -> Result<Listing, AppError> {
    let query = expect_query(resource.preload(PreloadTarget::Query(query), params, action).await?)?;
    let query = resource.query(query, params, action);
    let query = resource.search(query, params, Some(action));
    resource.paginate(query, params, action).await
}

/// Fetch the record named by the `id` param (show, edit and friends). Actions that do not
/// preload on the query get their associations loaded onto the fetched record.
pub async fn load_record<R: Resource + ?Sized>(resource: &R, params: &Params, action: &Action) -> Result<Record, AppError> {
    let descriptor = resource.descriptor();
    let id = params
        .id()
        .ok_or_else(|| AppError::BadRequest(format!("{}: id is required", descriptor.route_name())))?;
    let query = Query::from_schema(descriptor.schema().clone());
    let query = expect_query(resource.preload(PreloadTarget::Query(query), params, action).await?)?;
    let query = resource.query(query, params, action);
    let record = descriptor
        .repo()
        .all(&query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("{} {}", descriptor.params_key(), id)))?;
    if action.preloads_on_query() {
        return Ok(record);
    }
    resource
        .preload(PreloadTarget::Record(record), params, action)
        .await?
        .into_record()
        .ok_or_else(|| AppError::BadRequest("preload returned a query for a record".into()))
}
