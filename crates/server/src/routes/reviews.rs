use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use models::outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use models::review::{self, Review, ReviewPatch};

use crate::auth::{self, AuthUser, ServerState};
use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct ByServiceParams {
    /// The service's id value as stored in the review, matched as a string.
    pub id: String,
}

pub async fn create(
    State(state): State<ServerState>,
    Json(doc): Json<Review>,
) -> Result<Json<InsertOutcome>, ApiError> {
    Ok(Json(review::insert(&state.db.reviews, doc).await?))
}

pub async fn all(State(state): State<ServerState>) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(review::all(&state.db.reviews).await?))
}

pub async fn by_service(
    State(state): State<ServerState>,
    Query(params): Query<ByServiceParams>,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(review::by_service(&state.db.reviews, &params.id).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(patch): Json<ReviewPatch>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let id = ObjectId::parse_str(&id)?;
    Ok(Json(review::update_fields(&state.db.reviews, id, &patch).await?))
}

/// GET /review/:id where the path value is the owner's email.
pub async fn by_owner(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    auth::authorize_owner(&user, &email)?;
    Ok(Json(review::by_owner(&state.db.reviews, &email).await?))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = ObjectId::parse_str(&id)?;
    Ok(Json(review::delete_by_id(&state.db.reviews, id).await?))
}
