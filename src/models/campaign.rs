use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==================== STORAGE PROTOCOL ====================

/// Tag selecting which content-addressed network hosts a campaign's
/// off-chain descriptor. Unknown tags degrade to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProtocol {
    None,
    Ipfs,
    Arweave,
}

impl StorageProtocol {
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            1 => StorageProtocol::Ipfs,
            2 => StorageProtocol::Arweave,
            _ => StorageProtocol::None,
        }
    }
}

// ==================== CAMPAIGN CONFIG ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnItem {
    pub validation_type: u8,
    pub contract_address: Address,
    pub token_spec: u8,
    pub burn_spec: u8,
    pub amount: u128,
    pub min_token_id: U256,
    pub max_token_id: U256,
    pub merkle_root: H256,
}

impl BurnItem {
    /// Tokens one redemption consumes; a zero amount still burns one.
    pub fn required_amount(&self) -> U256 {
        if self.amount == 0 {
            U256::one()
        } else {
            U256::from(self.amount)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnGroup {
    pub required_count: U256,
    pub items: Vec<BurnItem>,
}

/// Immutable on-chain configuration of one campaign instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    pub payment_receiver: Address,
    pub storage_protocol: StorageProtocol,
    pub redeemed_count: u32,
    pub redeem_amount: u16,
    pub total_supply: u32,
    pub contract_version: u8,
    pub start_date: u64,
    pub end_date: u64,
    pub cost_wei: U256,
    pub location: String,
    pub burn_set: Vec<BurnGroup>,
}

impl CampaignConfig {
    /// First group's first item: the only burn shape this service executes.
    pub fn primary_burn_item(&self) -> Option<&BurnItem> {
        self.burn_set.first().and_then(|group| group.items.first())
    }
}

// ==================== DESCRIPTOR ====================

/// Off-chain JSON descriptor for a campaign or a creator contract.
/// Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub image_url: Option<String>,
}

// ==================== CAMPAIGN ====================

/// One discovered burn/redeem instance. Rebuilt wholesale on every scan,
/// never mutated in place. `id` is the decimal string identity; the raw
/// `instance_id` rides along for ordering and contract calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub instance_id: U256,
    pub config: CampaignConfig,
    pub is_active: bool,
    pub artwork_url: Option<String>,
    pub metadata: Option<Descriptor>,
    pub burn_contract: Option<Address>,
    pub burn_token_id: Option<U256>,
    pub reward_token_id: Option<U256>,
}

impl Campaign {
    pub fn display_name(&self) -> String {
        self.metadata
            .as_ref()
            .and_then(|m| m.name.clone())
            .unwrap_or_else(|| format!("#{}", self.id))
    }
}

// ==================== CATALOG ====================

/// Result of one discovery scan. `notice` carries the non-fatal
/// "nothing found in the window" condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogScan {
    pub campaigns: Vec<Campaign>,
    pub notice: Option<String>,
}

// ==================== CREATOR PROFILE ====================

/// Best-effort reads against the creator contract; all independently
/// optional.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreatorProfile {
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<Address>,
    pub owner_ens: Option<String>,
}

// ==================== BALANCES ====================

/// Burn/reward token balances layered on a catalog for display.
/// `None` / an absent map entry means "unknown", which is distinct from a
/// zero balance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WalletBalances {
    pub account: Option<Address>,
    pub burn_token_balance: Option<U256>,
    pub reward_balances: HashMap<String, U256>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_protocol_tags_map_with_fallback() {
        assert_eq!(StorageProtocol::from_tag(1), StorageProtocol::Ipfs);
        assert_eq!(StorageProtocol::from_tag(2), StorageProtocol::Arweave);
        assert_eq!(StorageProtocol::from_tag(0), StorageProtocol::None);
        assert_eq!(StorageProtocol::from_tag(7), StorageProtocol::None);
    }

    #[test]
    fn zero_burn_amount_still_requires_one_token() {
        let item = BurnItem {
            validation_type: 1,
            contract_address: Address::zero(),
            token_spec: 2,
            burn_spec: 1,
            amount: 0,
            min_token_id: U256::from(5u64),
            max_token_id: U256::from(5u64),
            merkle_root: H256::zero(),
        };
        assert_eq!(item.required_amount(), U256::one());
    }

    #[test]
    fn display_name_falls_back_to_hash_id() {
        let campaign = Campaign {
            id: "42".to_string(),
            instance_id: U256::from(42u64),
            config: CampaignConfig {
                payment_receiver: Address::zero(),
                storage_protocol: StorageProtocol::None,
                redeemed_count: 0,
                redeem_amount: 1,
                total_supply: 0,
                contract_version: 3,
                start_date: 0,
                end_date: 0,
                cost_wei: U256::zero(),
                location: String::new(),
                burn_set: vec![],
            },
            is_active: true,
            artwork_url: None,
            metadata: None,
            burn_contract: None,
            burn_token_id: None,
            reward_token_id: None,
        };
        assert_eq!(campaign.display_name(), "#42");

        let mut named = campaign.clone();
        named.metadata = Some(Descriptor {
            name: Some("Genesis Burn".to_string()),
            ..Descriptor::default()
        });
        assert_eq!(named.display_name(), "Genesis Burn");
    }
}
