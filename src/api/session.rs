use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::ApiResponse,
    services::RedeemSession,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub campaign_id: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    pub campaign_count: usize,
    pub active_count: usize,
    pub selected: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

fn view_of(session: &RedeemSession) -> SessionResponse {
    let scope = session.scope();
    SessionResponse {
        creator: scope.map(|s| format!("{:#x}", s.creator)),
        extension: scope.map(|s| format!("{:#x}", s.extension)),
        campaign_count: session.campaigns().len(),
        active_count: session.campaigns().iter().filter(|c| c.is_active).count(),
        selected: session.selected_ids(),
        notice: session.notice().map(str::to_string),
    }
}

/// GET /api/v1/session
pub async fn get_session(State(state): State<AppState>) -> Json<ApiResponse<SessionResponse>> {
    let session = state.session.read().await;
    Json(ApiResponse::success(view_of(&session)))
}

/// POST /api/v1/session/select
pub async fn select_campaign(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>> {
    let campaign_id = req.campaign_id.trim();
    if campaign_id.is_empty() {
        return Err(AppError::BadRequest("campaign_id is required".to_string()));
    }
    let mut session = state.session.write().await;
    if !session.has_catalog() {
        return Err(AppError::CatalogNotLoaded);
    }
    session.select(campaign_id)?;
    Ok(Json(ApiResponse::success(view_of(&session))))
}

/// POST /api/v1/session/deselect
pub async fn deselect_campaign(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>> {
    let mut session = state.session.write().await;
    if !session.has_catalog() {
        return Err(AppError::CatalogNotLoaded);
    }
    session.deselect(req.campaign_id.trim());
    Ok(Json(ApiResponse::success(view_of(&session))))
}

/// POST /api/v1/session/select-all
pub async fn select_all_campaigns(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SessionResponse>>> {
    let mut session = state.session.write().await;
    if !session.has_catalog() {
        return Err(AppError::CatalogNotLoaded);
    }
    let count = session.select_all_active();
    tracing::debug!("Selected all {} active campaigns", count);
    Ok(Json(ApiResponse::success(view_of(&session))))
}

/// POST /api/v1/session/clear
pub async fn clear_selection(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SessionResponse>>> {
    let mut session = state.session.write().await;
    if !session.has_catalog() {
        return Err(AppError::CatalogNotLoaded);
    }
    session.clear_selection();
    Ok(Json(ApiResponse::success(view_of(&session))))
}
