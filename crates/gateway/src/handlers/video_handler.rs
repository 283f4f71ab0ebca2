//! Product video handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{ProductVideo, VideoUpdate};

use crate::extractors::{JsonBody, ValidatedJson};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// A YouTube link
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VideoRequest {
    #[validate(length(min = 1, message = "youtube_url is required"))]
    #[schema(example = "https://www.youtube.com/watch?v=dQw4w9WgXcQ")]
    pub youtube_url: String,
}

/// Partial change to one video
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VideoUpdateRequest {
    #[validate(length(min = 1, message = "youtube_url must not be empty"))]
    pub youtube_url: Option<String>,
    /// New position in the product's list
    #[validate(range(min = 0, message = "order must not be negative"))]
    pub order: Option<i32>,
}

impl From<VideoUpdateRequest> for VideoUpdate {
    fn from(request: VideoUpdateRequest) -> Self {
        Self {
            youtube_url: request.youtube_url,
            order: request.order,
        }
    }
}

/// Routes mounted under `/products`, next to the product routes.
pub fn video_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:id/videos",
            get(list_videos).post(add_video).put(replace_videos),
        )
        .route(
            "/:id/videos/:video_id",
            get(get_video).put(update_video).delete(delete_video),
        )
}

/// List a product's videos in display order
#[utoipa::path(
    get,
    path = "/products/{id}/videos",
    tag = "Videos",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Videos", body = Vec<ProductVideo>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn list_videos(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<ProductVideo>>> {
    let videos = state.videos.list_videos(current_user.principal(), id).await?;
    Ok(Json(videos))
}

/// Append a video after the last one
#[utoipa::path(
    post,
    path = "/products/{id}/videos",
    tag = "Videos",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    request_body = VideoRequest,
    responses(
        (status = 201, description = "Video added", body = ProductVideo),
        (status = 400, description = "Not a YouTube link"),
        (status = 403, description = "Not allowed to modify this product"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Video already attached")
    )
)]
pub async fn add_video(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<VideoRequest>,
) -> AppResult<(StatusCode, Json<ProductVideo>)> {
    let video = state
        .videos
        .add_video(current_user.principal(), id, payload.youtube_url)
        .await?;
    Ok((StatusCode::CREATED, Json(video)))
}

/// Replace every video of the product; order follows the request
#[utoipa::path(
    put,
    path = "/products/{id}/videos",
    tag = "Videos",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    request_body = Vec<VideoRequest>,
    responses(
        (status = 201, description = "Videos replaced", body = Vec<ProductVideo>),
        (status = 400, description = "A link is invalid or repeated"),
        (status = 403, description = "Not allowed to modify this product"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn replace_videos(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<Vec<VideoRequest>>,
) -> AppResult<(StatusCode, Json<Vec<ProductVideo>>)> {
    let urls = payload.into_iter().map(|video| video.youtube_url).collect();
    let videos = state
        .videos
        .replace_videos(current_user.principal(), id, urls)
        .await?;
    Ok((StatusCode::CREATED, Json(videos)))
}

/// Get one video of the product
#[utoipa::path(
    get,
    path = "/products/{id}/videos/{video_id}",
    tag = "Videos",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("video_id" = i32, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video", body = ProductVideo),
        (status = 404, description = "Video not found on this product")
    )
)]
pub async fn get_video(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((id, video_id)): Path<(i32, i32)>,
) -> AppResult<Json<ProductVideo>> {
    let video = state
        .videos
        .get_video(current_user.principal(), id, video_id)
        .await?;
    Ok(Json(video))
}

/// Change the link or the position of one video
#[utoipa::path(
    put,
    path = "/products/{id}/videos/{video_id}",
    tag = "Videos",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("video_id" = i32, Path, description = "Video ID")
    ),
    request_body = VideoUpdateRequest,
    responses(
        (status = 200, description = "Video updated", body = ProductVideo),
        (status = 400, description = "Not a YouTube link or negative order"),
        (status = 403, description = "Not allowed to modify this product"),
        (status = 404, description = "Video not found on this product")
    )
)]
pub async fn update_video(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((id, video_id)): Path<(i32, i32)>,
    ValidatedJson(payload): ValidatedJson<VideoUpdateRequest>,
) -> AppResult<Json<ProductVideo>> {
    let video = state
        .videos
        .update_video(current_user.principal(), id, video_id, payload.into())
        .await?;
    Ok(Json(video))
}

/// Remove one video
#[utoipa::path(
    delete,
    path = "/products/{id}/videos/{video_id}",
    tag = "Videos",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("video_id" = i32, Path, description = "Video ID")
    ),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 403, description = "Not allowed to modify this product"),
        (status = 404, description = "Video not found on this product")
    )
)]
pub async fn delete_video(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((id, video_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    state
        .videos
        .delete_video(current_user.principal(), id, video_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
