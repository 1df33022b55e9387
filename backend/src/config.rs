use crate::services::clip_store::JsonClipStore;
use crate::services::platforms::{PlatformCredentials, PlatformRouter};
use crate::AppState;
use anyhow::Result;
use env_logger::{Builder, Env};
use lazy_static::lazy_static;
use log::info;
use reqwest::Client;
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::sync::Arc;
use std::time::Duration;

lazy_static! {
    pub static ref PORT: u16 = env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(3000);
    pub static ref CLIPS_FILE: String =
        env::var("CLIPS_FILE").unwrap_or_else(|_| "clips.json".to_string());
    pub static ref STATIC_DIR: String =
        env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string());
    pub static ref FETCH_PACING_MS: u64 = env::var("FETCH_PACING_MS")
        .unwrap_or_else(|_| "100".to_string())
        .parse::<u64>()
        .unwrap_or(100);
    pub static ref REQUEST_TIMEOUT_SECS: u64 = env::var("REQUEST_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse::<u64>()
        .unwrap_or(10);
}

pub fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    info!("Starting clip stats backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn load_credentials() -> PlatformCredentials {
    let credentials = PlatformCredentials::new(
        env::var("FACEBOOK_ACCESS_TOKEN").ok(),
        env::var("YOUTUBE_API_KEY").ok(),
        env::var("TWITTER_BEARER_TOKEN").ok(),
    );

    info!(
        "Platform credentials: facebook={}, youtube={}, twitter={}",
        credentials.facebook_access_token.is_some(),
        credentials.youtube_api_key.is_some(),
        credentials.twitter_bearer_token.is_some(),
    );
    credentials
}

pub fn create_http_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(*REQUEST_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

pub fn create_app_state() -> Result<AppState> {
    let client = create_http_client()?;
    let router = PlatformRouter::new(client, load_credentials());
    let store = JsonClipStore::new(CLIPS_FILE.as_str());
    info!("Using clip store at: {}", store.path().display());

    Ok(AppState {
        clip_store: Arc::new(store),
        stats_source: Arc::new(router),
        pacing: Duration::from_millis(*FETCH_PACING_MS),
    })
}

pub fn create_cors() -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(
            vec![Method::Get, Method::Post, Method::Delete, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
