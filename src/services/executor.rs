use crate::{
    chain::{BurnTokenArg, ChainInvoker, ChainReader, ReceiptStatus},
    config::Config,
    constants,
    error::{AppError, Result},
    models::{
        Campaign, ExecutionOutcome, RunProgress, RunSnapshot, TransactionRecord, TransactionStatus,
    },
};
use ethers::types::{Address, U256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

const APPROVAL_DENIED_MESSAGE: &str = "Approval denied";
const INVALID_BURN_DATA_MESSAGE: &str = "Invalid burn data";
const INSUFFICIENT_BALANCE_MESSAGE: &str = "Insufficient balance";
const TRANSACTION_REVERTED_MESSAGE: &str = "Transaction reverted";

/// Sequential batch redemption. One run at a time per process; everything a
/// caller can observe about a run flows through the watch channel, and the
/// final record set stays published until explicitly dismissed.
pub struct RedeemExecutor {
    reader: Arc<dyn ChainReader>,
    invoker: Option<Arc<dyn ChainInvoker>>,
    fee_wei: U256,
    explorer_tx_base: Option<String>,
    executing: AtomicBool,
    snapshot_tx: watch::Sender<RunSnapshot>,
}

impl RedeemExecutor {
    pub fn new(
        reader: Arc<dyn ChainReader>,
        invoker: Option<Arc<dyn ChainInvoker>>,
        config: &Config,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(RunSnapshot::default());
        Self {
            reader,
            invoker,
            fee_wei: U256::from(config.burn_redeem_fee_wei),
            explorer_tx_base: config.explorer_tx_base().map(str::to_string),
            executing: AtomicBool::new(false),
            snapshot_tx,
        }
    }

    pub fn is_executing(&self) -> bool {
        self.executing.load(Ordering::SeqCst)
    }

    pub fn has_signer(&self) -> bool {
        self.invoker.is_some()
    }

    /// Wallet the redemptions are executed from, when one is configured.
    pub fn signer_address(&self) -> Option<Address> {
        self.invoker.as_ref().map(|invoker| invoker.signer_address())
    }

    pub fn subscribe(&self) -> watch::Receiver<RunSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn current_run(&self) -> RunSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Drops the published record set of a finished run.
    pub fn dismiss(&self) -> Result<()> {
        if self.is_executing() {
            return Err(AppError::ExecutionInProgress);
        }
        self.snapshot_tx.send_replace(RunSnapshot::default());
        Ok(())
    }

    /// Runs every selected campaign in order. Approval failure aborts the
    /// whole batch; past the gate, each campaign fails alone.
    pub async fn execute(
        &self,
        creator: Address,
        extension: Address,
        campaigns: Vec<Campaign>,
    ) -> Result<ExecutionOutcome> {
        let invoker = self
            .invoker
            .as_ref()
            .ok_or(AppError::SignerNotConfigured)?
            .clone();
        if campaigns.is_empty() {
            return Err(AppError::EmptySelection);
        }
        if self.executing.swap(true, Ordering::SeqCst) {
            return Err(AppError::ExecutionInProgress);
        }

        let outcome = self
            .run(invoker.as_ref(), creator, extension, &campaigns)
            .await;
        self.executing.store(false, Ordering::SeqCst);

        tracing::info!(
            "Redemption run finished: {} succeeded, {} failed",
            outcome.success_count,
            outcome.fail_count
        );
        Ok(outcome)
    }

    async fn run(
        &self,
        invoker: &dyn ChainInvoker,
        creator: Address,
        extension: Address,
        campaigns: &[Campaign],
    ) -> ExecutionOutcome {
        let total = campaigns.len();
        let mut records: Vec<TransactionRecord> =
            campaigns.iter().map(TransactionRecord::pending).collect();
        self.publish_running(RunProgress { current: 0, total }, &records);

        if let Err(e) = self.ensure_approval(invoker, creator, extension).await {
            tracing::warn!("Operator approval failed, aborting batch: {}", e);
            for record in &mut records {
                fail_record(record, APPROVAL_DENIED_MESSAGE);
            }
            self.publish_finished(records);
            return ExecutionOutcome {
                success_count: 0,
                fail_count: total,
            };
        }

        let signer = invoker.signer_address();
        let mut outcome = ExecutionOutcome::default();

        for (index, campaign) in campaigns.iter().enumerate() {
            let progress = RunProgress {
                current: index + 1,
                total,
            };
            self.publish_running(progress, &records);

            let Some(item) = campaign.config.primary_burn_item().cloned() else {
                fail_record(&mut records[index], INVALID_BURN_DATA_MESSAGE);
                outcome.fail_count += 1;
                self.publish_running(progress, &records);
                continue;
            };

            let balance = match self
                .reader
                .erc1155_balance(item.contract_address, signer, item.min_token_id)
                .await
            {
                Ok(balance) => balance,
                Err(e) => {
                    fail_record(&mut records[index], &truncate_error(&e));
                    outcome.fail_count += 1;
                    self.publish_running(progress, &records);
                    continue;
                }
            };
            if balance < item.required_amount() {
                tracing::debug!(
                    "Campaign {}: balance {} below required {}",
                    campaign.id,
                    balance,
                    item.required_amount()
                );
                fail_record(&mut records[index], INSUFFICIENT_BALANCE_MESSAGE);
                outcome.fail_count += 1;
                self.publish_running(progress, &records);
                continue;
            }

            let burn_tokens = vec![BurnTokenArg {
                group_index: 0,
                item_index: 0,
                contract_address: item.contract_address,
                token_id: item.min_token_id,
                merkle_proof: vec![],
            }];
            let value = campaign.config.cost_wei + self.fee_wei;

            records[index].status = TransactionStatus::Confirming;
            self.publish_running(progress, &records);

            let tx_hash = match invoker
                .submit_burn_redeem(extension, creator, campaign.instance_id, 1, burn_tokens, value)
                .await
            {
                Ok(tx_hash) => tx_hash,
                Err(e) => {
                    fail_record(&mut records[index], &truncate_error(&e));
                    outcome.fail_count += 1;
                    self.publish_running(progress, &records);
                    continue;
                }
            };

            // the hash is visible before the receipt lands
            let hash_text = format!("{:#x}", tx_hash);
            records[index].explorer_url = self
                .explorer_tx_base
                .as_ref()
                .map(|base| format!("{}{}", base, hash_text));
            records[index].tx_hash = Some(hash_text);
            self.publish_running(progress, &records);

            match invoker.wait_for_receipt(tx_hash).await {
                Ok(ReceiptStatus::Success) => {
                    records[index].status = TransactionStatus::Success;
                    outcome.success_count += 1;
                }
                Ok(ReceiptStatus::Reverted) => {
                    fail_record(&mut records[index], TRANSACTION_REVERTED_MESSAGE);
                    outcome.fail_count += 1;
                }
                Err(e) => {
                    fail_record(&mut records[index], &truncate_error(&e));
                    outcome.fail_count += 1;
                }
            }
            self.publish_running(progress, &records);
        }

        self.publish_finished(records);
        outcome
    }

    /// One-time operator grant for the whole batch. An unreadable approval
    /// state counts as denied.
    async fn ensure_approval(
        &self,
        invoker: &dyn ChainInvoker,
        creator: Address,
        extension: Address,
    ) -> Result<()> {
        let signer = invoker.signer_address();
        let approved = self
            .reader
            .is_approved_for_all(creator, signer, extension)
            .await?;
        if approved {
            return Ok(());
        }

        tracing::info!("Requesting operator approval for {:#x}", extension);
        let tx_hash = invoker.submit_approval(creator, extension).await?;
        match invoker.wait_for_receipt(tx_hash).await? {
            ReceiptStatus::Success => Ok(()),
            ReceiptStatus::Reverted => Err(AppError::ContractCall(
                "approval transaction reverted".to_string(),
            )),
        }
    }

    fn publish_running(&self, progress: RunProgress, records: &[TransactionRecord]) {
        self.snapshot_tx.send_replace(RunSnapshot {
            executing: true,
            progress: Some(progress),
            records: records.to_vec(),
        });
    }

    fn publish_finished(&self, records: Vec<TransactionRecord>) {
        self.snapshot_tx.send_replace(RunSnapshot {
            executing: false,
            progress: None,
            records,
        });
    }
}

fn fail_record(record: &mut TransactionRecord, message: &str) {
    record.status = TransactionStatus::Error;
    record.error = Some(message.to_string());
}

fn truncate_error(e: &AppError) -> String {
    e.to_string()
        .chars()
        .take(constants::ERROR_MESSAGE_MAX_CHARS)
        .collect()
}
