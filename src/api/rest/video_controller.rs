use crate::api::rest::{ApiError, ApiResult, AppState};
use crate::db::models::video_models::{Video, VideoSearchQuery};
use crate::db::repositories::videos::VideosRepository;
use crate::validation;
use crate::validation::VideoCreatePayload;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, patch, post};
use axum::Router;
use axum_extra::extract::Query;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response shape for a stored video record. Duration is rendered in
/// ISO-8601 form; timestamps carry their timezone.
#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub id: i32,
    pub video_path: String,
    pub start_time: DateTime<Utc>,
    pub duration: String,
    pub camera_number: i32,
    pub location: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        Self {
            id: video.id,
            video_path: video.video_path,
            start_time: video.start_time,
            duration: validation::duration::format(video.duration),
            camera_number: video.camera_number,
            location: video.location,
            status: video.status.to_string(),
            created_at: video.created_at,
        }
    }
}

/// Request body for the status update endpoint
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// List query parameters; repeated keys collect into vectors
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub status: Vec<String>,
    pub camera_number: Vec<i32>,
    pub location: Vec<String>,
    pub start_time_from: Option<DateTime<Utc>>,
    pub start_time_to: Option<DateTime<Utc>>,
}

impl From<ListParams> for VideoSearchQuery {
    fn from(params: ListParams) -> Self {
        Self {
            status: if params.status.is_empty() {
                None
            } else {
                Some(params.status)
            },
            camera_number: if params.camera_number.is_empty() {
                None
            } else {
                Some(params.camera_number)
            },
            location: if params.location.is_empty() {
                None
            } else {
                Some(params.location)
            },
            start_time_from: params.start_time_from,
            start_time_to: params.start_time_to,
        }
    }
}

/// Create video controller router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/videos", post(create_video).get(list_videos))
        .route("/videos/:id", get(get_video))
        .route("/videos/:id/status", patch(update_video_status))
}

/// Register a new video record
pub async fn create_video(
    State(state): State<AppState>,
    Json(payload): Json<VideoCreatePayload>,
) -> ApiResult<(StatusCode, Json<VideoResponse>)> {
    let new_video = validation::validate_create(payload)?;

    let repo = VideosRepository::new(Arc::clone(&state.db_pool));
    let video = repo.create(&new_video).await?;

    info!(
        "Registered video {} for camera {} at {}",
        video.id, video.camera_number, video.location
    );

    Ok((StatusCode::CREATED, Json(VideoResponse::from(video))))
}

/// List videos matching the optional filter criteria
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<VideoResponse>>> {
    let query = VideoSearchQuery::from(params);

    let repo = VideosRepository::new(Arc::clone(&state.db_pool));
    let videos = repo.list(&query).await?;

    Ok(Json(videos.into_iter().map(VideoResponse::from).collect()))
}

/// Fetch a single video by id
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<VideoResponse>> {
    let repo = VideosRepository::new(Arc::clone(&state.db_pool));
    let video = repo.get_by_id(id).await?.ok_or_else(|| ApiError {
        message: "Video not found".to_string(),
        status: StatusCode::NOT_FOUND.as_u16(),
    })?;

    Ok(Json(VideoResponse::from(video)))
}

/// Update the processing status of a video
pub async fn update_video_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<StatusUpdateRequest>,
) -> ApiResult<Json<VideoResponse>> {
    // An unknown status is a 400 here, not a 422: the enum check belongs to
    // the endpoint contract rather than to body deserialization.
    let status = validation::validate_status(&request.status).map_err(|err| ApiError {
        message: err.to_string(),
        status: StatusCode::BAD_REQUEST.as_u16(),
    })?;

    let repo = VideosRepository::new(Arc::clone(&state.db_pool));
    let video = repo.update_status(id, status).await?;

    Ok(Json(VideoResponse::from(video)))
}
