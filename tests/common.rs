use mapero_partner::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_auth_repo::SqliteAuthRepo,
        sqlite_establishment_repo::SqliteEstablishmentRepo,
        sqlite_offer_repo::SqliteOfferRepo,
        sqlite_partner_repo::SqlitePartnerRepo,
        sqlite_stats_repo::SqliteStatsRepo,
    },
    domain::services::auth_service::AuthService,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header, StatusCode},
    response::Response,
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const TEST_PASSWORD: &str = "secret123";

#[allow(dead_code)]
pub struct AuthHeaders {
    pub access_token: String,
    pub refresh_token: String,
    pub partner_id: String,
    pub establishment_id: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_token_ttls(15, 7).await
    }

    /// Negative lifetimes produce tokens that are already expired.
    pub async fn with_token_ttls(access_minutes: i64, refresh_days: i64) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            access_token_ttl_minutes: access_minutes,
            refresh_token_ttl_days: refresh_days,
            cors_origin: "http://localhost:3000".to_string(),
        };

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()).unwrap());

        let state = Arc::new(AppState {
            config,
            partner_repo: Arc::new(SqlitePartnerRepo::new(pool.clone())),
            auth_repo,
            establishment_repo: Arc::new(SqliteEstablishmentRepo::new(pool.clone())),
            offer_repo: Arc::new(SqliteOfferRepo::new(pool.clone())),
            stats_repo: Arc::new(SqliteStatsRepo::new(pool.clone())),
            auth_service,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn register(&self, email: &str) -> AuthHeaders {
        let payload = json!({
            "firstName": "Julie",
            "lastName": "Morel",
            "email": email,
            "password": TEST_PASSWORD,
            "establishmentName": "Le Comptoir",
            "acceptTerms": true
        });

        let response = self.request("POST", "/api/auth/register", None, Some(payload)).await;
        if response.status() != StatusCode::CREATED {
            panic!("Register failed in test helper: status {}", response.status());
        }

        auth_headers(parse_body(response).await)
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = json!({ "email": email, "password": password });
        let response = self.request("POST", "/api/auth/login", None, Some(payload)).await;
        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        auth_headers(parse_body(response).await)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

fn auth_headers(body: Value) -> AuthHeaders {
    let data = &body["data"];
    AuthHeaders {
        access_token: data["tokens"]["token"].as_str().expect("No access token in body").to_string(),
        refresh_token: data["tokens"]["refreshToken"].as_str().expect("No refresh token in body").to_string(),
        partner_id: data["user"]["id"].as_str().expect("No user id in body").to_string(),
        establishment_id: data["user"]["establishmentId"].as_str().expect("No establishment id in body").to_string(),
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Friday 17:00-20:00 percentage offer running through autumn 2024.
#[allow(dead_code)]
pub fn percentage_offer() -> Value {
    json!({
        "title": "Happy Friday",
        "description": "30% sur toute la carte des cocktails",
        "type": "percentage",
        "percentage": 30,
        "schedule": { "days": ["friday"], "startTime": "17:00", "endTime": "20:00" },
        "validity": { "startDate": "2024-09-01", "endDate": "2024-12-31" }
    })
}
