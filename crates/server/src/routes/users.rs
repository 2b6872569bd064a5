use axum::extract::State;
use axum::Json;

use models::outcome::InsertOutcome;
use models::user::{self, User};

use crate::auth::ServerState;
use crate::errors::ApiError;

/// Duplicate emails are rejected by lookup, not by a unique index; two
/// racing inserts can still both land.
pub async fn create(
    State(state): State<ServerState>,
    Json(doc): Json<User>,
) -> Result<Json<InsertOutcome>, ApiError> {
    if user::find_by_email(&state.db.users, &doc.email).await?.is_some() {
        return Err(ApiError::DuplicateUser);
    }
    Ok(Json(user::insert(&state.db.users, doc).await?))
}

pub async fn all(State(state): State<ServerState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(user::all(&state.db.users).await?))
}
