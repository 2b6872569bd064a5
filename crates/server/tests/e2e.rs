//! End-to-end flows against a live MongoDB. Each test run uses its own
//! throwaway database name. Requires `MONGODB_URI`; set `SKIP_DB_TESTS` to
//! skip the whole suite.
//!
//! The token cookie is Secure, so reqwest's cookie store would refuse to
//! replay it over plain http; cookies are carried by hand instead.

use std::net::SocketAddr;

use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

use server::auth::{ServerAuthConfig, ServerState};
use server::routes;

const TEST_SECRET: &str = "test-secret";

struct TestApp {
    base_url: String,
}

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

async fn start_server() -> anyhow::Result<TestApp> {
    let uri = match std::env::var("MONGODB_URI") {
        Ok(u) => u,
        Err(_) => {
            eprintln!("MONGODB_URI missing; skip e2e tests");
            return Err(anyhow::anyhow!("missing MONGODB_URI"));
        }
    };
    let cfg = configs::DatabaseConfig {
        uri,
        database: format!("service_review_test_{}", Uuid::new_v4().simple()),
    };
    let db = models::db::connect(&cfg).await?;

    let state = ServerState {
        db,
        auth: ServerAuthConfig { token_secret: TEST_SECRET.into(), token_ttl_hours: 10 },
    };
    let app: Router = routes::build_router(cors(), state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

/// POST /jwt and return the `token=...` pair for the Cookie header.
async fn login(app: &TestApp, email: &str) -> anyhow::Result<String> {
    let res = client()
        .post(format!("{}/jwt", app.base_url))
        .json(&json!({"email": email}))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let set_cookie = res
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("jwt must set a cookie");
    Ok(set_cookie.split(';').next().unwrap().to_string())
}

fn oid_of(body: &serde_json::Value) -> String {
    body["insertedId"]["$oid"].as_str().expect("insertedId").to_string()
}

#[tokio::test]
async fn e2e_user_registration_is_idempotent_per_email() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = client();
    let email = format!("user_{}@example.com", Uuid::new_v4());

    let res = c
        .post(format!("{}/addUser", app.base_url))
        .json(&json!({"email": email, "name": "Tester"}))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["acknowledged"], true);

    // Listed after insert
    let res = c.get(format!("{}/users", app.base_url)).send().await?;
    let users = res.json::<serde_json::Value>().await?;
    assert!(users
        .as_array()
        .unwrap()
        .iter()
        .any(|u| u["email"] == email.as_str()));

    // Second insert with the same email: 400, plain text, no new record
    let res = c
        .post(format!("{}/addUser", app.base_url))
        .json(&json!({"email": email, "name": "Tester again"}))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await?, "You have already registered");

    let res = c.get(format!("{}/users", app.base_url)).send().await?;
    let users = res.json::<serde_json::Value>().await?;
    let count = users
        .as_array()
        .unwrap()
        .iter()
        .filter(|u| u["email"] == email.as_str())
        .count();
    assert_eq!(count, 1);
    Ok(())
}

#[tokio::test]
async fn e2e_service_lifecycle() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = client();
    let email = format!("owner_{}@example.com", Uuid::new_v4());
    let cookie = login(&app, &email).await?;

    // Create (auth required)
    let res = c
        .post(format!("{}/addService", app.base_url))
        .header("Cookie", &cookie)
        .json(&json!({
            "title": "Deep Apartment Clean",
            "category": "Home",
            "email": email,
            "price": 49
        }))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let id = oid_of(&res.json::<serde_json::Value>().await?);

    // Fetch by id
    let res = c.get(format!("{}/service/{}", app.base_url, id)).send().await?;
    let svc = res.json::<serde_json::Value>().await?;
    assert_eq!(svc["title"], "Deep Apartment Clean");
    assert_eq!(svc["price"], 49);

    // Case-insensitive substring search on title
    let res = c
        .get(format!("{}/services?search=apartment%20cl", app.base_url))
        .send()
        .await?;
    let found = res.json::<serde_json::Value>().await?;
    assert!(found.as_array().unwrap().iter().any(|s| s["_id"]["$oid"] == id.as_str()));

    // Search narrowed to a different category finds nothing
    let res = c
        .get(format!("{}/services?search=apartment&filter=Garden", app.base_url))
        .send()
        .await?;
    assert!(res.json::<serde_json::Value>().await?.as_array().unwrap().is_empty());

    // Owner-scoped listing with matching cookie
    let res = c
        .get(format!("{}/services/{}", app.base_url, email))
        .header("Cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let mine = res.json::<serde_json::Value>().await?;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    // Delete, then the id resolves to null
    let res = c
        .delete(format!("{}/service/{}", app.base_url, id))
        .header("Cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["deletedCount"], 1);

    let res = c.get(format!("{}/service/{}", app.base_url, id)).send().await?;
    assert_eq!(res.json::<serde_json::Value>().await?, serde_json::Value::Null);
    Ok(())
}

#[tokio::test]
async fn e2e_some_services_caps_at_six() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = client();
    let email = format!("owner_{}@example.com", Uuid::new_v4());
    let cookie = login(&app, &email).await?;

    for i in 0..8 {
        let res = c
            .post(format!("{}/addService", app.base_url))
            .header("Cookie", &cookie)
            .json(&json!({"title": format!("Service {i}"), "category": "Misc", "email": email}))
            .send()
            .await?;
        assert_eq!(res.status(), reqwest::StatusCode::OK);
    }

    let res = c.get(format!("{}/some-services", app.base_url)).send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body.as_array().unwrap().len(), 6);

    let res = c.get(format!("{}/allService", app.base_url)).send().await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body.as_array().unwrap().len(), 8);
    Ok(())
}

#[tokio::test]
async fn e2e_review_update_touches_only_review_and_rating() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = client();
    let email = format!("reviewer_{}@example.com", Uuid::new_v4());

    // Insert (public)
    let res = c
        .post(format!("{}/allReviews", app.base_url))
        .json(&json!({
            "serviceId": "svc-1",
            "email": email,
            "review": "decent",
            "rating": 3
        }))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let id = oid_of(&res.json::<serde_json::Value>().await?);

    // Patch (public) may only change review text and rating
    let res = c
        .patch(format!("{}/review/{}", app.base_url, id))
        .json(&json!({"review": "actually great", "rating": 5, "email": "evil@example.com"}))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["modifiedCount"], 1);

    let res = c.get(format!("{}/review?id=svc-1", app.base_url)).send().await?;
    let reviews = res.json::<serde_json::Value>().await?;
    let review = &reviews.as_array().unwrap()[0];
    assert_eq!(review["review"], "actually great");
    assert_eq!(review["rating"], 5.0);
    assert_eq!(review["serviceId"], "svc-1");
    assert_eq!(review["email"], email.as_str());

    // Owner-scoped read with matching cookie
    let cookie = login(&app, &email).await?;
    let res = c
        .get(format!("{}/review/{}", app.base_url, email))
        .header("Cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?.as_array().unwrap().len(), 1);

    // Delete requires the cookie
    let res = c.delete(format!("{}/review/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);
    let res = c
        .delete(format!("{}/review/{}", app.base_url, id))
        .header("Cookie", &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?["deletedCount"], 1);

    let res = c.get(format!("{}/reviews", app.base_url)).send().await?;
    assert!(res.json::<serde_json::Value>().await?.as_array().unwrap().is_empty());
    Ok(())
}
