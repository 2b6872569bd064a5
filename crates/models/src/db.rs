use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection};
use tracing::info;

use crate::{review::Review, service::Service, user::User};

/// Typed handles for the three collections the server operates on.
/// Constructed once at startup and passed into handlers through state;
/// no process-wide globals.
#[derive(Clone)]
pub struct Collections {
    pub services: Collection<Service>,
    pub reviews: Collection<Review>,
    pub users: Collection<User>,
}

pub async fn connect(cfg: &configs::DatabaseConfig) -> anyhow::Result<Collections> {
    let mut options = ClientOptions::parse(&cfg.uri).await?;
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    let client = Client::with_options(options)?;
    let db = client.database(&cfg.database);
    info!(database = %cfg.database, "mongodb client ready");
    Ok(Collections {
        services: db.collection::<Service>("services"),
        reviews: db.collection::<Review>("reviews"),
        users: db.collection::<User>("users"),
    })
}
