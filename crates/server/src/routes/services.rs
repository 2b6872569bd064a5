use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use models::outcome::{DeleteOutcome, InsertOutcome};
use models::service::{self, Service};

use crate::auth::{self, AuthUser, ServerState};
use crate::errors::ApiError;

/// How many services the home page shows.
const HOME_PAGE_COUNT: i64 = 6;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Exact category to narrow to.
    pub filter: Option<String>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerSearchParams {
    /// Case-insensitive substring of the category.
    pub search: Option<String>,
}

pub async fn create(
    State(state): State<ServerState>,
    Json(doc): Json<Service>,
) -> Result<Json<InsertOutcome>, ApiError> {
    Ok(Json(service::insert(&state.db.services, doc).await?))
}

pub async fn search(
    State(state): State<ServerState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let found =
        service::search(&state.db.services, params.search.as_deref(), params.filter.as_deref())
            .await?;
    Ok(Json(found))
}

pub async fn all(State(state): State<ServerState>) -> Result<Json<Vec<Service>>, ApiError> {
    Ok(Json(service::all(&state.db.services).await?))
}

pub async fn home_page(State(state): State<ServerState>) -> Result<Json<Vec<Service>>, ApiError> {
    Ok(Json(service::first_n(&state.db.services, HOME_PAGE_COUNT).await?))
}

pub async fn by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Service>>, ApiError> {
    let id = ObjectId::parse_str(&id)?;
    Ok(Json(service::find_by_id(&state.db.services, id).await?))
}

pub async fn by_owner(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    Path(email): Path<String>,
    Query(params): Query<OwnerSearchParams>,
) -> Result<Json<Vec<Service>>, ApiError> {
    auth::authorize_owner(&user, &email)?;
    let found = service::by_owner(&state.db.services, &email, params.search.as_deref()).await?;
    Ok(Json(found))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = ObjectId::parse_str(&id)?;
    Ok(Json(service::delete_by_id(&state.db.services, id).await?))
}
