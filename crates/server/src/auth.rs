use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ApiError;

pub const TOKEN_COOKIE: &str = "token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub token_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: models::db::Collections,
    pub auth: ServerAuthConfig,
}

/// Claims embedded in an issued token: whatever object the caller sent to
/// `/jwt`, plus a server-set `exp`. Only `email` is pulled out by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The verified identity of the caller, inserted into request extensions by
/// `require_token`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthClaims);

pub fn issue_token(
    secret: &str,
    ttl_hours: i64,
    claims: &serde_json::Value,
) -> Result<String, jsonwebtoken::errors::Error> {
    let mut claims = claims.as_object().cloned().unwrap_or_default();
    let exp = (Utc::now() + Duration::hours(ttl_hours)).timestamp();
    claims.insert("exp".into(), serde_json::Value::from(exp));
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

pub fn verify_token(secret: &str, token: &str) -> Result<AuthClaims, jsonwebtoken::errors::Error> {
    let data = decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// Cross-site cookie: the browser client lives on a different origin.
fn base_cookie(value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::None);
    cookie
}

pub fn auth_cookie(token: String) -> Cookie<'static> {
    base_cookie(token)
}

/// Same attributes as `auth_cookie` so the removal actually matches.
pub fn clearing_cookie() -> Cookie<'static> {
    base_cookie(String::new())
}

/// POST /jwt — sign the caller-supplied claim object into a token cookie.
pub async fn issue(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(claims): Json<serde_json::Value>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let token = issue_token(&state.auth.token_secret, state.auth.token_ttl_hours, &claims)?;
    let jar = jar.add(auth_cookie(token));
    Ok((jar, Json(serde_json::json!({"success": true}))))
}

/// POST /logout — clear the token cookie. No database interaction.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.remove(clearing_cookie());
    (jar, Json(serde_json::json!({"success": true})))
}

/// Middleware for owner-scoped and mutating routes: no cookie or a bad token
/// fails the request before the handler runs; a verified one has its claims
/// attached as the caller's identity.
pub async fn require_token(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(ApiError::Unauthorized)?;
    let claims = verify_token(&state.auth.token_secret, &token).map_err(|e| {
        warn!(path = %req.uri().path(), error = %e, "token validation failed");
        ApiError::Unauthorized
    })?;
    req.extensions_mut().insert(AuthUser(claims));
    Ok(next.run(req).await)
}

/// Single ownership policy for owner-scoped routes: the requested owner email
/// must match the token identity.
pub fn authorize_owner(identity: &AuthUser, owner_email: &str) -> Result<(), ApiError> {
    match identity.0.email.as_deref() {
        Some(email) if email == owner_email => Ok(()),
        _ => Err(ApiError::Forbidden),
    }
}
