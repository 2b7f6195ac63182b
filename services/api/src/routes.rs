//! API service routes

use std::time::Duration;

use auth::{LoginRequest, RegisterRequest};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::warn;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    models::{
        CommentCreatedResponse, ImageCreatedResponse, LikesResponse, LoginResponse,
        NewCommentRequest, NewImageRequest, PageQuery, RegisterResponse, UpdateProfileRequest,
    },
    state::AppState,
};

type JsonBody<T> = WithRejection<Json<T>, ApiError>;
type IdPath = WithRejection<Path<Uuid>, ApiError>;

/// Create the router for the API service
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let protected_routes = Router::new()
        .route("/profile", get(get_profile).patch(update_profile))
        .route("/profile/images", get(get_profile_images))
        .route("/galleria", post(send_image))
        .route("/galleria/posts/:id", post(add_comment))
        .route(
            "/galleria/posts/:id/like",
            post(like_image).delete(unlike_image),
        )
        .route(
            "/comments/:id/like",
            post(like_comment).delete(unlike_comment),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/galleria", get(display))
        .route("/galleria/posts/:id", get(get_image))
        .route("/galleria/posts/:id/comments", get(get_comments))
        .merge(protected_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let healthy = match state.users.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            warn!("Health check failed: {}", e);
            false
        }
    };

    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(json!({
            "status": label,
            "service": "galleria"
        })),
    )
}

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): JsonBody<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = state.auth.register(&payload).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = state.auth.login(&payload).await?;

    Ok(Json(LoginResponse {
        user_id: outcome.user_id,
        token: outcome.token,
        token_type: "Bearer",
        expires_in: state.auth.token_expiry(),
        claims: outcome.claims,
    }))
}

pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.profiles.get_profile(user_id).await?))
}

pub async fn get_profile_images(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.profiles.get_profile_images(user_id).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    WithRejection(Json(payload), _): JsonBody<UpdateProfileRequest>,
) -> ApiResult<StatusCode> {
    state.profiles.update_profile(user_id, &payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn send_image(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    WithRejection(Json(payload), _): JsonBody<NewImageRequest>,
) -> ApiResult<impl IntoResponse> {
    let image_id = state.galleria.send_image(user_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(ImageCreatedResponse { image_id })))
}

/// Feed page; `?page=` defaults to the first page
pub async fn display(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.galleria.display(query.page).await?))
}

pub async fn get_image(
    State(state): State<AppState>,
    WithRejection(Path(image_id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.galleria.get_image(image_id).await?))
}

pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    WithRejection(Path(image_id), _): IdPath,
    WithRejection(Json(payload), _): JsonBody<NewCommentRequest>,
) -> ApiResult<impl IntoResponse> {
    let comment_id = state
        .galleria
        .add_comment(user_id, image_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentCreatedResponse { comment_id })))
}

pub async fn get_comments(
    State(state): State<AppState>,
    WithRejection(Path(image_id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.galleria.get_comments(image_id).await?))
}

pub async fn like_image(
    State(state): State<AppState>,
    WithRejection(Path(image_id), _): IdPath,
) -> ApiResult<Json<LikesResponse>> {
    let likes = state.galleria.like_image(image_id).await?;
    Ok(Json(LikesResponse { likes }))
}

pub async fn unlike_image(
    State(state): State<AppState>,
    WithRejection(Path(image_id), _): IdPath,
) -> ApiResult<Json<LikesResponse>> {
    let likes = state.galleria.unlike_image(image_id).await?;
    Ok(Json(LikesResponse { likes }))
}

pub async fn like_comment(
    State(state): State<AppState>,
    WithRejection(Path(comment_id), _): IdPath,
) -> ApiResult<Json<LikesResponse>> {
    let likes = state.galleria.like_comment(comment_id).await?;
    Ok(Json(LikesResponse { likes }))
}

pub async fn unlike_comment(
    State(state): State<AppState>,
    WithRejection(Path(comment_id), _): IdPath,
) -> ApiResult<Json<LikesResponse>> {
    let likes = state.galleria.unlike_comment(comment_id).await?;
    Ok(Json(LikesResponse { likes }))
}
