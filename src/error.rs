use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Blockchain RPC error: {0}")]
    BlockchainRPC(String),

    #[error("Contract call error: {0}")]
    ContractCall(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Signer wallet is not configured")]
    SignerNotConfigured,

    #[error("A redemption run is already in progress")]
    ExecutionInProgress,

    #[error("No campaign catalog loaded for this session")]
    CatalogNotLoaded,

    #[error("No campaigns selected")]
    EmptySelection,

    #[error("Campaign is not active")]
    CampaignNotActive,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External API error: {0}")]
    ExternalAPI(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BlockchainRPC(ref msg) => (
                StatusCode::BAD_GATEWAY,
                "BLOCKCHAIN_RPC_ERROR",
                msg.clone(),
            ),
            AppError::ContractCall(ref msg) => (
                StatusCode::BAD_GATEWAY,
                "CONTRACT_CALL_ERROR",
                msg.clone(),
            ),
            AppError::InvalidAddress(ref msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_ADDRESS",
                msg.clone(),
            ),
            AppError::SignerNotConfigured => (
                StatusCode::BAD_REQUEST,
                "SIGNER_NOT_CONFIGURED",
                "No wallet key configured; execution is disabled".to_string(),
            ),
            AppError::ExecutionInProgress => (
                StatusCode::CONFLICT,
                "EXECUTION_IN_PROGRESS",
                "A redemption run is already in progress".to_string(),
            ),
            AppError::CatalogNotLoaded => (
                StatusCode::BAD_REQUEST,
                "CATALOG_NOT_LOADED",
                "Scan a creator contract before using the session".to_string(),
            ),
            AppError::EmptySelection => (
                StatusCode::BAD_REQUEST,
                "EMPTY_SELECTION",
                "Select at least one campaign first".to_string(),
            ),
            AppError::CampaignNotActive => (
                StatusCode::BAD_REQUEST,
                "CAMPAIGN_NOT_ACTIVE",
                "Campaign is outside its redemption window".to_string(),
            ),
            AppError::NotFound(ref msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::BadRequest(ref msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                msg.clone(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                self.to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
