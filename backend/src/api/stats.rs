use crate::models::{AnnotatedClip, ClipperSummary, ErrorResponse};
use crate::services::stats_service;
use crate::AppState;
use log::{error, info};
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/refresh")]
pub async fn refresh_stats(
    state: &State<AppState>,
) -> Result<Json<Vec<AnnotatedClip>>, ErrorResponse> {
    match stats_service::refresh_stats(&*state.clip_store, &*state.stats_source, state.pacing).await
    {
        Ok(clips) => Ok(Json(clips)),
        Err(e) => {
            error!("Stats refresh failed: {e:?}");
            Err(ErrorResponse::internal(e.to_string()))
        }
    }
}

#[get("/by-clipper")]
pub async fn stats_by_clipper(
    state: &State<AppState>,
) -> Result<Json<Vec<ClipperSummary>>, ErrorResponse> {
    match stats_service::stats_by_clipper(&*state.clip_store, &*state.stats_source, state.pacing)
        .await
    {
        Ok(summaries) => {
            info!("Aggregated stats for {} clippers.", summaries.len());
            Ok(Json(summaries))
        }
        Err(e) => {
            error!("Stats aggregation failed: {e:?}");
            Err(ErrorResponse::internal(e.to_string()))
        }
    }
}
