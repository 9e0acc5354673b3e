use super::{BurnTokenArg, CampaignInitLog, ChainInvoker, ChainReader, ReceiptStatus};
use crate::{
    config::Config,
    constants,
    error::{AppError, Result},
    models::{BurnGroup, BurnItem, Campaign, CampaignConfig, StorageProtocol},
};
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Scripted chain double. Every read and submission is driven by the public
/// fields; submissions are recorded behind mutexes so assertions can inspect
/// them after a run.
pub struct MockChain {
    pub block_height: u64,
    pub fail_log_query: bool,
    pub logs: Vec<CampaignInitLog>,

    pub configs: HashMap<U256, CampaignConfig>,
    pub fail_config_for: HashSet<U256>,
    pub reward_ids: HashMap<U256, U256>,

    /// Keyed by (contract, account, token id). Missing entries read as zero.
    pub balances: HashMap<(Address, Address, U256), U256>,
    pub balance_errors: HashSet<(Address, Address, U256)>,
    pub fail_batch_read: bool,
    pub short_batch_read: bool,

    pub approved: bool,
    pub fail_approval_read: bool,
    pub fail_approval_submit: bool,
    pub approval_reverts: bool,

    pub submit_fail_for: HashSet<U256>,
    pub submit_error_message: String,
    pub revert_for: HashSet<U256>,
    pub receipt_error_for: HashSet<U256>,
    /// Per-receipt wait, for exercising in-flight state from another task.
    pub receipt_delay_ms: u64,

    pub names: HashMap<Address, String>,
    pub uris: HashMap<Address, String>,
    pub owners: HashMap<Address, Address>,
    pub ens_names: HashMap<Address, String>,

    pub signer: Address,

    submitted: Mutex<Vec<(U256, U256)>>,
    approvals_submitted: Mutex<u32>,
    pending: Mutex<HashMap<H256, U256>>,
}

const APPROVAL_TX: H256 = H256::repeat_byte(0xaa);

impl Default for MockChain {
    fn default() -> Self {
        Self {
            block_height: 0,
            fail_log_query: false,
            logs: vec![],
            configs: HashMap::new(),
            fail_config_for: HashSet::new(),
            reward_ids: HashMap::new(),
            balances: HashMap::new(),
            balance_errors: HashSet::new(),
            fail_batch_read: false,
            short_batch_read: false,
            approved: true,
            fail_approval_read: false,
            fail_approval_submit: false,
            approval_reverts: false,
            submit_fail_for: HashSet::new(),
            submit_error_message: "execution reverted".to_string(),
            revert_for: HashSet::new(),
            receipt_error_for: HashSet::new(),
            receipt_delay_ms: 0,
            names: HashMap::new(),
            uris: HashMap::new(),
            owners: HashMap::new(),
            ens_names: HashMap::new(),
            signer: Address::repeat_byte(0x5e),
            submitted: Mutex::new(vec![]),
            approvals_submitted: Mutex::new(0),
            pending: Mutex::new(HashMap::new()),
        }
    }
}

impl MockChain {
    /// The ERC-1155 contract every fixture burns from.
    pub fn burn_contract() -> Address {
        Address::repeat_byte(0x88)
    }

    fn config_with_token(&self, active: bool, token_id: u64) -> CampaignConfig {
        CampaignConfig {
            payment_receiver: Address::repeat_byte(0x11),
            storage_protocol: StorageProtocol::None,
            redeemed_count: 0,
            redeem_amount: 1,
            total_supply: 0,
            contract_version: 3,
            start_date: 0,
            end_date: if active { 0 } else { 1 },
            cost_wei: U256::zero(),
            location: "fixture".to_string(),
            burn_set: vec![BurnGroup {
                required_count: U256::one(),
                items: vec![BurnItem {
                    validation_type: 1,
                    contract_address: Self::burn_contract(),
                    token_spec: 1,
                    burn_spec: 1,
                    amount: 1,
                    min_token_id: U256::from(token_id),
                    max_token_id: U256::from(token_id),
                    merkle_root: H256::zero(),
                }],
            }],
        }
    }

    pub fn simple_config(&self, active: bool) -> CampaignConfig {
        self.config_with_token(active, 1)
    }

    /// Registers a config and reward token id for the instance.
    pub fn install_campaign(&mut self, instance: u64, active: bool) {
        self.configs
            .insert(U256::from(instance), self.config_with_token(active, instance));
        self.reward_ids
            .insert(U256::from(instance), U256::from(1000 + instance));
    }

    /// A fully built catalog entry, the shape the scanner would produce.
    pub fn campaign_fixture(&self, instance: u64, active: bool) -> Campaign {
        let config = self.config_with_token(active, instance);
        Campaign {
            id: instance.to_string(),
            instance_id: U256::from(instance),
            is_active: active,
            artwork_url: None,
            metadata: None,
            burn_contract: Some(Self::burn_contract()),
            burn_token_id: Some(U256::from(instance)),
            reward_token_id: Some(U256::from(1000 + instance)),
            config,
        }
    }

    /// Stages the signer's burn-token balance for a fixture campaign.
    pub fn set_burn_balance(&mut self, account: Address, token_id: u64, balance: u64) {
        self.balances.insert(
            (Self::burn_contract(), account, U256::from(token_id)),
            U256::from(balance),
        );
    }

    pub fn submitted(&self) -> Vec<(U256, U256)> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn approvals_submitted(&self) -> u32 {
        *self.approvals_submitted.lock().unwrap()
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn block_number(&self) -> Result<u64> {
        Ok(self.block_height)
    }

    async fn campaign_init_logs(
        &self,
        _extension: Address,
        _creator: Address,
        _from_block: u64,
        _to_block: u64,
    ) -> Result<Vec<CampaignInitLog>> {
        if self.fail_log_query {
            return Err(AppError::BlockchainRPC("log query failed".to_string()));
        }
        Ok(self.logs.clone())
    }

    async fn campaign_config(
        &self,
        _extension: Address,
        _creator: Address,
        instance_id: U256,
    ) -> Result<CampaignConfig> {
        if self.fail_config_for.contains(&instance_id) {
            return Err(AppError::ContractCall("execution reverted".to_string()));
        }
        self.configs
            .get(&instance_id)
            .cloned()
            .ok_or_else(|| AppError::ContractCall("no campaign config".to_string()))
    }

    async fn reward_token_id(
        &self,
        _extension: Address,
        _creator: Address,
        instance_id: U256,
    ) -> Result<U256> {
        self.reward_ids
            .get(&instance_id)
            .copied()
            .ok_or_else(|| AppError::ContractCall("no reward token".to_string()))
    }

    async fn erc1155_balance(
        &self,
        contract: Address,
        account: Address,
        token_id: U256,
    ) -> Result<U256> {
        if self.balance_errors.contains(&(contract, account, token_id)) {
            return Err(AppError::ContractCall("balance read failed".to_string()));
        }
        Ok(self
            .balances
            .get(&(contract, account, token_id))
            .copied()
            .unwrap_or_default())
    }

    async fn erc1155_balance_batch(
        &self,
        contract: Address,
        accounts: Vec<Address>,
        token_ids: Vec<U256>,
    ) -> Result<Vec<U256>> {
        if self.fail_batch_read {
            return Err(AppError::ContractCall("batch read failed".to_string()));
        }
        if self.short_batch_read {
            return Ok(vec![]);
        }
        Ok(accounts
            .into_iter()
            .zip(token_ids)
            .map(|(account, token_id)| {
                self.balances
                    .get(&(contract, account, token_id))
                    .copied()
                    .unwrap_or_default()
            })
            .collect())
    }

    async fn is_approved_for_all(
        &self,
        _contract: Address,
        _owner: Address,
        _operator: Address,
    ) -> Result<bool> {
        if self.fail_approval_read {
            return Err(AppError::ContractCall("approval read failed".to_string()));
        }
        Ok(self.approved)
    }

    async fn contract_name(&self, contract: Address) -> Result<String> {
        self.names
            .get(&contract)
            .cloned()
            .ok_or_else(|| AppError::ContractCall("name() reverted".to_string()))
    }

    async fn contract_uri(&self, contract: Address) -> Result<String> {
        self.uris
            .get(&contract)
            .cloned()
            .ok_or_else(|| AppError::ContractCall("contractURI() reverted".to_string()))
    }

    async fn contract_owner(&self, contract: Address) -> Result<Address> {
        self.owners
            .get(&contract)
            .copied()
            .ok_or_else(|| AppError::ContractCall("owner() reverted".to_string()))
    }

    async fn ens_name(&self, address: Address) -> Result<String> {
        self.ens_names
            .get(&address)
            .cloned()
            .ok_or_else(|| AppError::ContractCall("no reverse record".to_string()))
    }
}

#[async_trait]
impl ChainInvoker for MockChain {
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn submit_approval(&self, _contract: Address, _operator: Address) -> Result<H256> {
        if self.fail_approval_submit {
            return Err(AppError::ContractCall(self.submit_error_message.clone()));
        }
        *self.approvals_submitted.lock().unwrap() += 1;
        Ok(APPROVAL_TX)
    }

    async fn submit_burn_redeem(
        &self,
        _extension: Address,
        _creator: Address,
        instance_id: U256,
        _redeem_count: u32,
        _burn_tokens: Vec<BurnTokenArg>,
        value: U256,
    ) -> Result<H256> {
        if self.submit_fail_for.contains(&instance_id) {
            return Err(AppError::ContractCall(self.submit_error_message.clone()));
        }
        self.submitted.lock().unwrap().push((instance_id, value));
        let tx_hash = H256::from_low_u64_be(0xb000_0000 + instance_id.low_u64());
        self.pending.lock().unwrap().insert(tx_hash, instance_id);
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: H256) -> Result<ReceiptStatus> {
        if self.receipt_delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.receipt_delay_ms)).await;
        }
        if tx_hash == APPROVAL_TX {
            return if self.approval_reverts {
                Ok(ReceiptStatus::Reverted)
            } else {
                Ok(ReceiptStatus::Success)
            };
        }
        let instance_id = self
            .pending
            .lock()
            .unwrap()
            .get(&tx_hash)
            .copied()
            .ok_or_else(|| AppError::BlockchainRPC("unknown transaction".to_string()))?;
        if self.revert_for.contains(&instance_id) {
            return Ok(ReceiptStatus::Reverted);
        }
        if self.receipt_error_for.contains(&instance_id) {
            return Err(AppError::BlockchainRPC(format!(
                "Transaction {:#x} not confirmed: timeout",
                tx_hash
            )));
        }
        Ok(ReceiptStatus::Success)
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        ethereum_rpc_url: "http://localhost:8545".to_string(),
        chain_id: 11155111,
        wallet_private_key: None,
        scan_block_window: constants::DEFAULT_SCAN_BLOCK_WINDOW,
        burn_redeem_fee_wei: constants::BURN_REDEEM_FEE_WEI,
        ipfs_gateway_url: constants::IPFS_GATEWAY.to_string(),
        arweave_gateway_url: constants::ARWEAVE_GATEWAY.to_string(),
        metadata_timeout_secs: 4,
        cors_allowed_origins: "*".to_string(),
    }
}
