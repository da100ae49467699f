use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateGadgetRequest, DeletedGadgetResponse, ListQuery, SelfDestructRequest, UpdateGadgetRequest},
    repo_types::Gadget,
    services::{self, parse_id},
};
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    extract::{ApiJson, ApiQuery},
    state::AppState,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/gadgets", get(list_gadgets))
        .route("/gadgets/", get(list_gadgets))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/gadgets", post(create_gadget))
        .route("/gadgets/", post(create_gadget))
        .route("/gadgets/:id", patch(update_gadget).delete(delete_gadget))
        .route("/gadgets/:id/self-destruct", post(self_destruct_gadget))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_gadgets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Gadget>>, AppError> {
    let gadgets = services::list(&state, user_id, q.status.as_deref()).await?;
    Ok(Json(gadgets))
}

#[instrument(skip(state, body))]
pub async fn create_gadget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<CreateGadgetRequest>,
) -> Result<(StatusCode, Json<Gadget>), AppError> {
    let gadget = services::create(&state, user_id, body.status.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(gadget)))
}

#[instrument(skip(state, body))]
pub async fn update_gadget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateGadgetRequest>,
) -> Result<Json<Gadget>, AppError> {
    let id = parse_id(&id)?;
    let gadget = services::update(
        &state,
        id,
        user_id,
        body.name.as_deref(),
        body.status.as_deref(),
    )
    .await?;
    Ok(Json(gadget))
}

/// DELETE /gadgets/:id marks the gadget DECOMMISSIONED; the row stays.
#[instrument(skip(state))]
pub async fn delete_gadget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeletedGadgetResponse>, AppError> {
    let id = parse_id(&id)?;
    let gadget = services::soft_delete(&state, id, user_id).await?;
    Ok(Json(DeletedGadgetResponse {
        message: "Gadget deleted successfully",
        gadget,
    }))
}

/// A missing or unreadable body counts as a missing secret.
#[instrument(skip(state, body))]
pub async fn self_destruct_gadget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    body: Option<ApiJson<SelfDestructRequest>>,
) -> Result<Json<Gadget>, AppError> {
    let id = parse_id(&id)?;
    let secret = body.and_then(|ApiJson(b)| b.secret);
    let gadget = services::self_destruct(&state, id, user_id, secret.as_deref()).await?;
    Ok(Json(gadget))
}
