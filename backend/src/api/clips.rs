use crate::models::{Clip, DeleteClipResponse, ErrorResponse, NewClipRequest};
use crate::services::clip_service::{self, CreateClipError};
use crate::AppState;
use log::{error, info, warn};
use rocket::serde::json::{self, Json};
use rocket::{delete, get, post, State};

#[get("/")]
pub async fn list_clips(state: &State<AppState>) -> Result<Json<Vec<Clip>>, ErrorResponse> {
    match state.clip_store.list_clips().await {
        Ok(clips) => {
            info!("Found {} registered clips.", clips.len());
            Ok(Json(clips))
        }
        Err(e) => {
            error!("Failed to list clips: {e:?}");
            Err(ErrorResponse::internal(e.to_string()))
        }
    }
}

#[post("/", data = "<request>")]
pub async fn add_clip(
    state: &State<AppState>,
    request: Result<Json<NewClipRequest>, json::Error<'_>>,
) -> Result<Json<Clip>, ErrorResponse> {
    let request = match request {
        Ok(request) => request.into_inner(),
        Err(e) => {
            warn!("Rejected clip body: {e}");
            return Err(ErrorResponse::bad_request(format!("Invalid request body: {e}")));
        }
    };

    match clip_service::create_clip(&*state.clip_store, request).await {
        Ok(clip) => Ok(Json(clip)),
        Err(e @ CreateClipError::MissingFields) => Err(ErrorResponse::bad_request(e.to_string())),
        Err(CreateClipError::Store(e)) => {
            error!("Failed to add clip: {e:?}");
            Err(ErrorResponse::internal(e.to_string()))
        }
    }
}

#[delete("/<id>")]
pub async fn delete_clip(
    state: &State<AppState>,
    id: &str,
) -> Result<Json<DeleteClipResponse>, ErrorResponse> {
    match state.clip_store.remove_clip(id).await {
        Ok(removed) => {
            if removed {
                info!("Clip removed: {id}");
            }
            Ok(Json(DeleteClipResponse { success: true }))
        }
        Err(e) => {
            error!("Failed to remove clip {id}: {e:?}");
            Err(ErrorResponse::internal(e.to_string()))
        }
    }
}
