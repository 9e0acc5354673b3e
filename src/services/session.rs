use crate::{
    error::{AppError, Result},
    models::{Campaign, CatalogScan},
};
use ethers::types::Address;
use std::collections::HashSet;

/// The creator/extension pair the current catalog was scanned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionScope {
    pub creator: Address,
    pub extension: Address,
}

/// In-memory browsing state: the last scanned catalog plus the caller's
/// selection. Selection refers to campaigns by id; a rescan prunes any
/// selection the new catalog no longer supports.
#[derive(Debug, Default)]
pub struct RedeemSession {
    scope: Option<SessionScope>,
    campaigns: Vec<Campaign>,
    notice: Option<String>,
    selected: HashSet<String>,
}

impl RedeemSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_catalog(&self) -> bool {
        self.scope.is_some()
    }

    pub fn scope(&self) -> Option<SessionScope> {
        self.scope
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Installs a fresh scan. Selected ids survive only if the new catalog
    /// still lists them as active.
    pub fn replace_catalog(&mut self, creator: Address, extension: Address, scan: CatalogScan) {
        self.scope = Some(SessionScope { creator, extension });
        self.campaigns = scan.campaigns;
        self.notice = scan.notice;
        let campaigns = &self.campaigns;
        self.selected
            .retain(|id| campaigns.iter().any(|c| &c.id == id && c.is_active));
    }

    pub fn select(&mut self, id: &str) -> Result<()> {
        let campaign = self
            .campaigns
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("campaign {}", id)))?;
        if !campaign.is_active {
            return Err(AppError::CampaignNotActive);
        }
        self.selected.insert(campaign.id.clone());
        Ok(())
    }

    pub fn deselect(&mut self, id: &str) {
        self.selected.remove(id);
    }

    pub fn select_all_active(&mut self) -> usize {
        for campaign in self.campaigns.iter().filter(|c| c.is_active) {
            self.selected.insert(campaign.id.clone());
        }
        self.selected.len()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Deep-link preselection. Silently skips ids the catalog does not list
    /// as active.
    pub fn auto_select(&mut self, id: &str) -> bool {
        let eligible = self
            .campaigns
            .iter()
            .any(|c| c.id == id && c.is_active);
        if eligible {
            self.selected.insert(id.to_string());
        }
        eligible
    }

    /// Selected ids in catalog order, not insertion order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.campaigns
            .iter()
            .filter(|c| self.selected.contains(&c.id))
            .map(|c| c.id.clone())
            .collect()
    }

    /// Selected campaigns in catalog order, ready to hand to the executor.
    pub fn selected_campaigns(&self) -> Vec<Campaign> {
        self.campaigns
            .iter()
            .filter(|c| self.selected.contains(&c.id))
            .cloned()
            .collect()
    }
}
