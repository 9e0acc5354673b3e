pub mod contracts;
pub mod evm;
#[cfg(test)]
pub mod testing;

pub use evm::{parse_address, EvmInvoker, EvmReader};

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};

use crate::error::Result;
use crate::models::CampaignConfig;

/// One decoded campaign-initialization event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignInitLog {
    pub instance_id: U256,
    pub block_number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Burn-token argument for a redemption call. Only the first group's first
/// item is ever referenced and merkle-gated burns carry no proof here, so
/// the proof list stays empty.
#[derive(Debug, Clone)]
pub struct BurnTokenArg {
    pub group_index: u64,
    pub item_index: u64,
    pub contract_address: Address,
    pub token_id: U256,
    pub merkle_proof: Vec<H256>,
}

/// Read-only chain operations the engine consumes. Implementations own all
/// transport concerns; callers never see provider internals.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn block_number(&self) -> Result<u64>;

    async fn campaign_init_logs(
        &self,
        extension: Address,
        creator: Address,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<CampaignInitLog>>;

    async fn campaign_config(
        &self,
        extension: Address,
        creator: Address,
        instance_id: U256,
    ) -> Result<CampaignConfig>;

    async fn reward_token_id(
        &self,
        extension: Address,
        creator: Address,
        instance_id: U256,
    ) -> Result<U256>;

    async fn erc1155_balance(
        &self,
        contract: Address,
        account: Address,
        token_id: U256,
    ) -> Result<U256>;

    async fn erc1155_balance_batch(
        &self,
        contract: Address,
        accounts: Vec<Address>,
        token_ids: Vec<U256>,
    ) -> Result<Vec<U256>>;

    async fn is_approved_for_all(
        &self,
        contract: Address,
        owner: Address,
        operator: Address,
    ) -> Result<bool>;

    async fn contract_name(&self, contract: Address) -> Result<String>;

    async fn contract_uri(&self, contract: Address) -> Result<String>;

    async fn contract_owner(&self, contract: Address) -> Result<Address>;

    /// Reverse ENS lookup; errors when the address has no reverse record.
    async fn ens_name(&self, address: Address) -> Result<String>;
}

/// State-changing chain operations, available only when a signing wallet is
/// configured. Submission returns the hash as soon as the transaction is
/// accepted; mining is awaited separately through `wait_for_receipt`.
#[async_trait]
pub trait ChainInvoker: Send + Sync {
    fn signer_address(&self) -> Address;

    async fn submit_approval(&self, contract: Address, operator: Address) -> Result<H256>;

    async fn submit_burn_redeem(
        &self,
        extension: Address,
        creator: Address,
        instance_id: U256,
        redeem_count: u32,
        burn_tokens: Vec<BurnTokenArg>,
        value: U256,
    ) -> Result<H256>;

    async fn wait_for_receipt(&self, tx_hash: H256) -> Result<ReceiptStatus>;
}
