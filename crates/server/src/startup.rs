use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::auth::{ServerAuthConfig, ServerState};
use crate::routes;

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    // Mirrored origin + credentials, so browser clients on another origin
    // can send the token cookie.
    CorsLayer::very_permissive()
}

/// Load configuration from config.toml, or assemble the same shape from env
/// vars when no file is present.
fn load_config() -> anyhow::Result<configs::AppConfig> {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!(error = %e, "config file unusable; falling back to env vars");
            let mut cfg = configs::AppConfig::default();
            cfg.server.host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            cfg.server.port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(5000);
            cfg.database.normalize_from_env();
            cfg.database.validate()?;
            cfg.auth.normalize_from_env();
            cfg.auth.validate()?;
            Ok(cfg)
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config()?;
    let db = models::db::connect(&cfg.database).await?;

    let state = ServerState {
        db,
        auth: ServerAuthConfig {
            token_secret: cfg.auth.token_secret.clone(),
            token_ttl_hours: cfg.auth.token_ttl_hours,
        },
    };

    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting service review server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
