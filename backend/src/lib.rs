pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use anyhow::Result;
use rocket::fs::FileServer;
use rocket::{catchers, routes, Build, Rocket};
use services::clip_store::ClipStore;
use services::platforms::StatsSource;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub clip_store: Arc<dyn ClipStore>,
    pub stats_source: Arc<dyn StatsSource>,
    /// Delay between consecutive platform calls in one stats pass.
    pub pacing: Duration,
}

pub fn build_rocket(state: AppState, static_dir: &str) -> Result<Rocket<Build>> {
    let mut rocket = rocket::build()
        .manage(state)
        .attach(config::create_cors()?)
        .mount(
            "/api/clips",
            routes![api::list_clips, api::add_clip, api::delete_clip],
        )
        .mount(
            "/api/stats",
            routes![api::refresh_stats, api::stats_by_clipper],
        )
        .register("/", catchers![api::json_error]);

    if Path::new(static_dir).is_dir() {
        rocket = rocket.mount("/", FileServer::from(static_dir));
    }

    Ok(rocket)
}
