use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    error::{AppError, Result},
    models::{ApiResponse, RunSnapshot, TransactionRecord},
    services::SessionScope,
};

use super::AppState;

/// POST /api/v1/redeem/execute
///
/// Runs the current selection as one sequential batch. The response carries
/// the final counts and records; live progress is available on
/// `GET /api/v1/redeem/status` and over the websocket while the run lasts.
pub async fn execute_redemptions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ExecuteResponse>>> {
    if state.executor.is_executing() {
        return Err(AppError::ExecutionInProgress);
    }

    let (scope, campaigns) = {
        let session = state.session.read().await;
        let scope = session.scope().ok_or(AppError::CatalogNotLoaded)?;
        (scope, session.selected_campaigns())
    };
    if campaigns.is_empty() {
        return Err(AppError::EmptySelection);
    }

    tracing::info!(
        "Executing {} selected campaigns for {:#x}",
        campaigns.len(),
        scope.creator
    );

    // Spawned so a dropped connection cannot cancel the batch mid-flight;
    // the run owns the busy flag and must reach its completion path.
    let run_state = state.clone();
    let run = tokio::spawn(async move {
        let outcome = run_state
            .executor
            .execute(scope.creator, scope.extension, campaigns)
            .await?;
        if outcome.success_count > 0 {
            // the selection was consumed by this run
            run_state.session.write().await.clear_selection();
            refresh_catalog(&run_state, scope).await;
        }
        Ok::<_, AppError>(outcome)
    });
    let outcome = run
        .await
        .map_err(|e| AppError::Internal(format!("Redemption task failed: {}", e)))??;

    Ok(Json(ApiResponse::success(ExecuteResponse {
        success_count: outcome.success_count,
        fail_count: outcome.fail_count,
        records: state.executor.current_run().records,
    })))
}

/// GET /api/v1/redeem/status
pub async fn get_status(State(state): State<AppState>) -> Json<ApiResponse<RunSnapshot>> {
    Json(ApiResponse::success(state.executor.current_run()))
}

/// POST /api/v1/redeem/dismiss
pub async fn dismiss_run(State(state): State<AppState>) -> Result<Json<ApiResponse<RunSnapshot>>> {
    state.executor.dismiss()?;
    Ok(Json(ApiResponse::success(state.executor.current_run())))
}

async fn refresh_catalog(state: &AppState, scope: SessionScope) {
    match state.catalog.scan(scope.creator, scope.extension).await {
        Ok(scan) => {
            let mut session = state.session.write().await;
            session.replace_catalog(scope.creator, scope.extension, scan);
        }
        Err(e) => tracing::warn!("Post-run catalog refresh failed: {}", e),
    }
}

#[derive(Serialize)]
pub struct ExecuteResponse {
    pub success_count: usize,
    pub fail_count: usize,
    pub records: Vec<TransactionRecord>,
}
