use serde::{Deserialize, Serialize};

use crate::models::Campaign;

// ==================== TRANSACTION RECORDS ====================

/// Per-campaign state machine. Only moves forward:
/// pending → confirming → (success | error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirming,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub campaign_id: String,
    pub campaign_name: String,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionRecord {
    pub fn pending(campaign: &Campaign) -> Self {
        Self {
            campaign_id: campaign.id.clone(),
            campaign_name: campaign.display_name(),
            status: TransactionStatus::Pending,
            tx_hash: None,
            explorer_url: None,
            error: None,
        }
    }
}

// ==================== RUN STATE ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunProgress {
    pub current: usize,
    pub total: usize,
}

/// Snapshot of the orchestrator published on every state change and held
/// until explicitly dismissed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSnapshot {
    pub executing: bool,
    pub progress: Option<RunProgress>,
    pub records: Vec<TransactionRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    pub success_count: usize,
    pub fail_count: usize,
}

// ==================== API ENVELOPE ====================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
