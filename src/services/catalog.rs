use crate::{
    chain::{CampaignInitLog, ChainReader},
    config::Config,
    error::Result,
    models::{Campaign, CatalogScan, CreatorProfile},
    services::metadata::MetadataResolver,
};
use ethers::types::{Address, U256};
use futures_util::future::join_all;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

const NO_CAMPAIGNS_NOTICE: &str = "No campaigns found in recent blocks";

/// Builds the campaign catalog: event-log discovery over a bounded block
/// window, per-instance config fetch with skip-on-error, derived fields,
/// and a stable active-first ordering.
pub struct CatalogService {
    reader: Arc<dyn ChainReader>,
    metadata: Arc<MetadataResolver>,
    scan_block_window: u64,
}

impl CatalogService {
    pub fn new(
        reader: Arc<dyn ChainReader>,
        metadata: Arc<MetadataResolver>,
        config: &Config,
    ) -> Self {
        Self {
            reader,
            metadata,
            scan_block_window: config.scan_block_window,
        }
    }

    /// Discovers every campaign the creator registered on the extension
    /// within the recent block window. Instances older than the window are
    /// not discoverable.
    pub async fn scan(&self, creator: Address, extension: Address) -> Result<CatalogScan> {
        let current_block = self.reader.block_number().await?;
        let from_block = current_block.saturating_sub(self.scan_block_window);

        let logs = self
            .reader
            .campaign_init_logs(extension, creator, from_block, current_block)
            .await?;

        if logs.is_empty() {
            tracing::info!(
                "No campaign logs for {:#x} in blocks {}..{}",
                creator,
                from_block,
                current_block
            );
            return Ok(CatalogScan {
                campaigns: vec![],
                notice: Some(NO_CAMPAIGNS_NOTICE.to_string()),
            });
        }

        let instance_ids = dedup_instance_ids(&logs);
        let now = chrono::Utc::now().timestamp() as u64;

        let builds = instance_ids
            .iter()
            .map(|id| self.build_campaign(extension, creator, *id, now));
        let mut campaigns: Vec<Campaign> = join_all(builds).await.into_iter().flatten().collect();
        sort_campaigns(&mut campaigns);

        tracing::info!(
            "Catalog scan: {} redeemable campaigns from {} logs",
            campaigns.len(),
            logs.len()
        );
        Ok(CatalogScan {
            campaigns,
            notice: None,
        })
    }

    /// One instance, built independently. Returns `None` to drop the
    /// instance from the catalog; a dropped instance never aborts the scan.
    async fn build_campaign(
        &self,
        extension: Address,
        creator: Address,
        instance_id: U256,
        now: u64,
    ) -> Option<Campaign> {
        let config = match self
            .reader
            .campaign_config(extension, creator, instance_id)
            .await
        {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Skipping instance {}: {}", instance_id, e);
                return None;
            }
        };
        if config.burn_set.is_empty() {
            tracing::debug!("Skipping instance {}: no burn groups", instance_id);
            return None;
        }

        let is_active = is_active_at(now, config.start_date, config.end_date);

        let burn_item = config.primary_burn_item();
        let burn_contract = burn_item.map(|item| item.contract_address);
        let burn_token_id = burn_item.map(|item| item.min_token_id);

        let reward_token_id = match self
            .reader
            .reward_token_id(extension, creator, instance_id)
            .await
        {
            Ok(token_id) => Some(token_id),
            Err(e) => {
                tracing::debug!("No reward token id for instance {}: {}", instance_id, e);
                None
            }
        };

        let (metadata, artwork_url) = if config.location.is_empty() {
            (None, None)
        } else {
            let descriptor = self
                .metadata
                .resolve(&config.location, config.storage_protocol)
                .await;
            let artwork = descriptor
                .as_ref()
                .and_then(|d| self.metadata.image_url_of(d));
            (descriptor, artwork)
        };

        Some(Campaign {
            id: instance_id.to_string(),
            instance_id,
            config,
            is_active,
            artwork_url,
            metadata,
            burn_contract,
            burn_token_id,
            reward_token_id,
        })
    }

    /// Best-effort identity reads against the creator contract.
    pub async fn creator_profile(&self, creator: Address) -> CreatorProfile {
        let name = self.reader.contract_name(creator).await.ok();
        let owner = self.reader.contract_owner(creator).await.ok();
        let owner_ens = match owner {
            Some(address) => self.reader.ens_name(address).await.ok(),
            None => None,
        };

        let description = match self.reader.contract_uri(creator).await {
            Ok(uri) if !uri.is_empty() => self
                .metadata
                .resolve_uri(&uri)
                .await
                .and_then(|descriptor| descriptor.description),
            _ => None,
        };

        CreatorProfile {
            name,
            description,
            owner,
            owner_ens,
        }
    }
}

pub(crate) fn is_active_at(now: u64, start: u64, end: u64) -> bool {
    now >= start && (end == 0 || now <= end)
}

fn dedup_instance_ids(logs: &[CampaignInitLog]) -> Vec<U256> {
    let mut seen = HashSet::new();
    logs.iter()
        .filter(|log| seen.insert(log.instance_id))
        .map(|log| log.instance_id)
        .collect()
}

/// Active campaigns first; within each partition, newest instance first.
/// The sort is stable so repeated scans keep a deterministic order.
fn sort_campaigns(campaigns: &mut [Campaign]) {
    campaigns.sort_by(|a, b| match (a.is_active, b.is_active) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => b.instance_id.cmp(&a.instance_id),
    });
}
