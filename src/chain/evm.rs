use crate::{
    config::Config,
    error::{AppError, Result},
    models::CampaignConfig,
};
use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, H256, U256, U64},
};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

use super::contracts::{BurnRedeemExtension, BurnToken, CreatorCore, Erc1155};
use super::{BurnTokenArg, CampaignInitLog, ChainInvoker, ChainReader, ReceiptStatus};

const DEFAULT_RECEIPT_POLL_ATTEMPTS: usize = 40;
const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 3_000;

/// Read-only EVM client over a plain HTTP provider.
pub struct EvmReader {
    provider: Arc<Provider<Http>>,
}

/// Signing EVM client. Only constructed when a wallet key is configured.
pub struct EvmInvoker {
    client: Arc<SignerMiddleware<Provider<Http>, LocalWallet>>,
    address: Address,
}

impl EvmReader {
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.ethereum_rpc_url.as_str())
            .map_err(|e| AppError::Internal(format!("Invalid RPC URL: {}", e)))?;
        Ok(Self {
            provider: Arc::new(provider),
        })
    }

    fn extension(&self, address: Address) -> BurnRedeemExtension<Provider<Http>> {
        BurnRedeemExtension::new(address, self.provider.clone())
    }
}

#[async_trait]
impl ChainReader for EvmReader {
    async fn block_number(&self) -> Result<u64> {
        let number = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| AppError::BlockchainRPC(e.to_string()))?;
        Ok(number.as_u64())
    }

    async fn campaign_init_logs(
        &self,
        extension: Address,
        creator: Address,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<CampaignInitLog>> {
        let events = self
            .extension(extension)
            .burn_redeem_initialized_filter()
            .from_block(from_block)
            .to_block(to_block)
            .topic1(H256::from(creator))
            .query_with_meta()
            .await
            .map_err(|e| AppError::BlockchainRPC(format!("Log query failed: {}", e)))?;

        Ok(events
            .into_iter()
            .map(|(event, meta)| CampaignInitLog {
                instance_id: event.instance_id,
                block_number: meta.block_number.as_u64(),
            })
            .collect())
    }

    async fn campaign_config(
        &self,
        extension: Address,
        creator: Address,
        instance_id: U256,
    ) -> Result<CampaignConfig> {
        let raw = self
            .extension(extension)
            .get_burn_redeem(creator, instance_id)
            .call()
            .await
            .map_err(|e| {
                AppError::ContractCall(format!("getBurnRedeem({}) failed: {}", instance_id, e))
            })?;
        Ok(raw.into())
    }

    async fn reward_token_id(
        &self,
        extension: Address,
        creator: Address,
        instance_id: U256,
    ) -> Result<U256> {
        self.extension(extension)
            .get_burn_redeem_token(creator, instance_id)
            .call()
            .await
            .map_err(|e| {
                AppError::ContractCall(format!(
                    "getBurnRedeemToken({}) failed: {}",
                    instance_id, e
                ))
            })
    }

    async fn erc1155_balance(
        &self,
        contract: Address,
        account: Address,
        token_id: U256,
    ) -> Result<U256> {
        Erc1155::new(contract, self.provider.clone())
            .balance_of(account, token_id)
            .call()
            .await
            .map_err(|e| AppError::ContractCall(format!("balanceOf failed: {}", e)))
    }

    async fn erc1155_balance_batch(
        &self,
        contract: Address,
        accounts: Vec<Address>,
        token_ids: Vec<U256>,
    ) -> Result<Vec<U256>> {
        Erc1155::new(contract, self.provider.clone())
            .balance_of_batch(accounts, token_ids)
            .call()
            .await
            .map_err(|e| AppError::ContractCall(format!("balanceOfBatch failed: {}", e)))
    }

    async fn is_approved_for_all(
        &self,
        contract: Address,
        owner: Address,
        operator: Address,
    ) -> Result<bool> {
        Erc1155::new(contract, self.provider.clone())
            .is_approved_for_all(owner, operator)
            .call()
            .await
            .map_err(|e| AppError::ContractCall(format!("isApprovedForAll failed: {}", e)))
    }

    async fn contract_name(&self, contract: Address) -> Result<String> {
        CreatorCore::new(contract, self.provider.clone())
            .name()
            .call()
            .await
            .map_err(|e| AppError::ContractCall(format!("name() failed: {}", e)))
    }

    async fn contract_uri(&self, contract: Address) -> Result<String> {
        CreatorCore::new(contract, self.provider.clone())
            .contract_uri()
            .call()
            .await
            .map_err(|e| AppError::ContractCall(format!("contractURI() failed: {}", e)))
    }

    async fn contract_owner(&self, contract: Address) -> Result<Address> {
        CreatorCore::new(contract, self.provider.clone())
            .owner()
            .call()
            .await
            .map_err(|e| AppError::ContractCall(format!("owner() failed: {}", e)))
    }

    async fn ens_name(&self, address: Address) -> Result<String> {
        self.provider
            .lookup_address(address)
            .await
            .map_err(|e| AppError::ContractCall(format!("ENS lookup failed: {}", e)))
    }
}

impl EvmInvoker {
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(key) = config.wallet_private_key.as_deref() else {
            return Ok(None);
        };

        let provider = Provider::<Http>::try_from(config.ethereum_rpc_url.as_str())
            .map_err(|e| AppError::Internal(format!("Invalid RPC URL: {}", e)))?;

        let wallet = key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| AppError::Internal(format!("Invalid wallet key: {}", e)))?
            .with_chain_id(config.chain_id);
        let address = wallet.address();

        Ok(Some(Self {
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
            address,
        }))
    }
}

#[async_trait]
impl ChainInvoker for EvmInvoker {
    fn signer_address(&self) -> Address {
        self.address
    }

    async fn submit_approval(&self, contract: Address, operator: Address) -> Result<H256> {
        // The pending transaction borrows the call, so the call must outlive it.
        let call = Erc1155::new(contract, self.client.clone()).set_approval_for_all(operator, true);
        let pending = call
            .send()
            .await
            .map_err(|e| AppError::ContractCall(format!("setApprovalForAll failed: {}", e)))?;
        Ok(pending.tx_hash())
    }

    async fn submit_burn_redeem(
        &self,
        extension: Address,
        creator: Address,
        instance_id: U256,
        redeem_count: u32,
        burn_tokens: Vec<BurnTokenArg>,
        value: U256,
    ) -> Result<H256> {
        let tokens: Vec<BurnToken> = burn_tokens.iter().map(Into::into).collect();
        let call = BurnRedeemExtension::new(extension, self.client.clone())
            .burn_redeem(creator, instance_id, redeem_count, tokens)
            .value(value);
        let pending = call
            .send()
            .await
            .map_err(|e| AppError::ContractCall(e.to_string()))?;
        Ok(pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: H256) -> Result<ReceiptStatus> {
        let poll_attempts = receipt_poll_attempts();
        let poll_interval_ms = receipt_poll_interval_ms();

        let mut last_error = "transaction still pending".to_string();

        for attempt in 0..poll_attempts {
            match self.client.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    if receipt.status == Some(U64::one()) {
                        return Ok(ReceiptStatus::Success);
                    }
                    return Ok(ReceiptStatus::Reverted);
                }
                Ok(None) => {
                    last_error = "transaction still pending".to_string();
                }
                Err(err) => {
                    last_error = err.to_string();
                }
            }
            if attempt + 1 < poll_attempts {
                sleep(Duration::from_millis(poll_interval_ms)).await;
            }
        }

        Err(AppError::BlockchainRPC(format!(
            "Transaction {:#x} not confirmed: {}",
            tx_hash, last_error
        )))
    }
}

fn receipt_poll_attempts() -> usize {
    std::env::var("RECEIPT_POLL_ATTEMPTS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_RECEIPT_POLL_ATTEMPTS)
}

fn receipt_poll_interval_ms() -> u64 {
    std::env::var("RECEIPT_POLL_INTERVAL_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_RECEIPT_POLL_INTERVAL_MS)
}

pub fn parse_address(value: &str) -> Result<Address> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidAddress("empty address".to_string()));
    }
    trimmed
        .parse::<Address>()
        .map_err(|_| AppError::InvalidAddress(format!("'{}' is not a 20-byte hex address", trimmed)))
}
