use ethers::contract::abigen;
use ethers::types::H256;

use crate::chain::BurnTokenArg;
use crate::models::{self, StorageProtocol};

abigen!(
    BurnRedeemExtension,
    "./abi/burn_redeem_extension.json";

    Erc1155,
    "./abi/erc1155.json";

    CreatorCore,
    "./abi/creator_core.json";
);

impl From<BurnRedeem> for models::CampaignConfig {
    fn from(raw: BurnRedeem) -> Self {
        models::CampaignConfig {
            payment_receiver: raw.payment_receiver,
            storage_protocol: StorageProtocol::from_tag(raw.storage_protocol),
            redeemed_count: raw.redeemed_count,
            redeem_amount: raw.redeem_amount,
            total_supply: raw.total_supply,
            contract_version: raw.contract_version,
            start_date: raw.start_date,
            end_date: raw.end_date,
            cost_wei: raw.cost,
            location: raw.location,
            burn_set: raw.burn_set.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<BurnGroup> for models::BurnGroup {
    fn from(raw: BurnGroup) -> Self {
        models::BurnGroup {
            required_count: raw.required_count,
            items: raw.items.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<BurnItem> for models::BurnItem {
    fn from(raw: BurnItem) -> Self {
        models::BurnItem {
            validation_type: raw.validation_type,
            contract_address: raw.contract_address,
            token_spec: raw.token_spec,
            burn_spec: raw.burn_spec,
            amount: raw.amount,
            min_token_id: raw.min_token_id,
            max_token_id: raw.max_token_id,
            merkle_root: H256::from(raw.merkle_root),
        }
    }
}

impl From<&BurnTokenArg> for BurnToken {
    fn from(arg: &BurnTokenArg) -> Self {
        BurnToken {
            group_index: arg.group_index,
            item_index: arg.item_index,
            contract_address: arg.contract_address,
            id: arg.token_id,
            merkle_proof: arg.merkle_proof.iter().map(|h| h.to_fixed_bytes()).collect(),
        }
    }
}
