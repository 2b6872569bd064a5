use axum::routing::{delete, get, patch, post};
use axum::{middleware, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::auth::{self, ServerState};

pub mod reviews;
pub mod services;
pub mod users;

pub async fn root() -> &'static str {
    "Service Review Server is running"
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router. Protected method routers get the token
/// middleware individually; `/service/:id` and `/review/:id` mix public and
/// protected methods on the same path (on GET, `/review/:id` actually carries
/// the owner's email — an inherited API quirk).
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let require_token = middleware::from_fn_with_state(state.clone(), auth::require_token);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/jwt", post(auth::issue))
        .route("/logout", post(auth::logout))
        .route("/addService", post(services::create).layer(require_token.clone()))
        .route("/services", get(services::search))
        .route("/allService", get(services::all))
        .route("/some-services", get(services::home_page))
        .route(
            "/service/:id",
            get(services::by_id).merge(delete(services::remove).layer(require_token.clone())),
        )
        .route("/services/:email", get(services::by_owner).layer(require_token.clone()))
        .route("/allReviews", post(reviews::create))
        .route("/reviews", get(reviews::all))
        .route("/review", get(reviews::by_service))
        .route(
            "/review/:id",
            patch(reviews::update)
                .merge(get(reviews::by_owner).layer(require_token.clone()))
                .merge(delete(reviews::remove).layer(require_token)),
        )
        .route("/addUser", post(users::create))
        .route("/users", get(users::all))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
