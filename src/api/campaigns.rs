use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    chain::parse_address,
    error::Result,
    models::{ApiResponse, Campaign, CreatorProfile, WalletBalances},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct CampaignsQuery {
    /// Campaign instance id to preselect, from a deep link.
    pub instance: Option<String>,
    /// Wallet whose balances to display instead of the backend signer's.
    pub account: Option<String>,
}

/// GET /api/v1/campaigns/{creator}/{extension}
///
/// Scans the recent block window for the creator's campaigns on the given
/// extension, loads balances for display, and installs the result as the
/// current session catalog.
pub async fn get_campaigns(
    State(state): State<AppState>,
    Path((creator, extension)): Path<(String, String)>,
    Query(query): Query<CampaignsQuery>,
) -> Result<Json<ApiResponse<CampaignsResponse>>> {
    let creator = parse_address(&creator)?;
    let extension = parse_address(&extension)?;

    let scan = state.catalog.scan(creator, extension).await?;
    let profile = state.catalog.creator_profile(creator).await;

    let account = match query.account.as_deref() {
        Some(raw) => Some(parse_address(raw)?),
        None => state.executor.signer_address(),
    };
    let balances = state
        .balances
        .balances_for(creator, &scan.campaigns, account)
        .await;

    let mut session = state.session.write().await;
    session.replace_catalog(creator, extension, scan);
    let auto_selected = match query.instance.as_deref() {
        Some(id) => session.auto_select(id.trim()),
        None => false,
    };

    Ok(Json(ApiResponse::success(CampaignsResponse {
        creator: format!("{:#x}", creator),
        extension: format!("{:#x}", extension),
        profile,
        campaigns: session.campaigns().to_vec(),
        notice: session.notice().map(str::to_string),
        balances,
        selected: session.selected_ids(),
        auto_selected,
    })))
}

#[derive(Serialize)]
pub struct CampaignsResponse {
    pub creator: String,
    pub extension: String,
    pub profile: CreatorProfile,
    pub campaigns: Vec<Campaign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub balances: WalletBalances,
    pub selected: Vec<String>,
    pub auto_selected: bool,
}
