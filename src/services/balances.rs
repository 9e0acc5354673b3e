use crate::{
    chain::ChainReader,
    models::{Campaign, WalletBalances},
};
use ethers::types::{Address, U256};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only wallet balance lookups for a scanned catalog. Balances are
/// display data: a failed read degrades to "unknown" and never blocks the
/// catalog response.
pub struct BalanceAggregator {
    reader: Arc<dyn ChainReader>,
}

impl BalanceAggregator {
    pub fn new(reader: Arc<dyn ChainReader>) -> Self {
        Self { reader }
    }

    /// Burn-token holdings plus per-campaign reward holdings for `account`.
    /// With no account there is nothing to read and every balance stays
    /// unknown.
    pub async fn balances_for(
        &self,
        creator: Address,
        campaigns: &[Campaign],
        account: Option<Address>,
    ) -> WalletBalances {
        let Some(account) = account else {
            return WalletBalances::default();
        };

        let mut balances = WalletBalances {
            account: Some(account),
            ..WalletBalances::default()
        };
        if campaigns.is_empty() {
            return balances;
        }

        balances.burn_token_balance = self.burn_token_balance(campaigns, account).await;
        balances.reward_balances = self.reward_balances(creator, campaigns, account).await;
        balances
    }

    /// The catalog shares one burn token, read from the first campaign
    /// only. A first campaign without burn info leaves the balance unknown.
    async fn burn_token_balance(&self, campaigns: &[Campaign], account: Address) -> Option<U256> {
        let campaign = campaigns.first()?;
        let contract = campaign.burn_contract?;
        let token_id = campaign.burn_token_id?;

        match self.reader.erc1155_balance(contract, account, token_id).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                tracing::debug!("Burn token balance read failed: {}", e);
                None
            }
        }
    }

    /// Reward holdings keyed by campaign id. Campaigns without a reward
    /// token read as zero outright; the rest go through one batched call,
    /// falling back to individual reads when the batch is unusable.
    async fn reward_balances(
        &self,
        creator: Address,
        campaigns: &[Campaign],
        account: Address,
    ) -> HashMap<String, U256> {
        let mut out = HashMap::new();
        let mut readable: Vec<(&str, U256)> = Vec::new();
        for campaign in campaigns {
            match campaign.reward_token_id {
                Some(token_id) => readable.push((campaign.id.as_str(), token_id)),
                None => {
                    out.insert(campaign.id.clone(), U256::zero());
                }
            }
        }
        if readable.is_empty() {
            return out;
        }

        let accounts = vec![account; readable.len()];
        let token_ids: Vec<U256> = readable.iter().map(|(_, id)| *id).collect();
        match self
            .reader
            .erc1155_balance_batch(creator, accounts, token_ids)
            .await
        {
            Ok(balances) if balances.len() == readable.len() => {
                for ((id, _), balance) in readable.iter().zip(balances) {
                    out.insert((*id).to_string(), balance);
                }
            }
            Ok(balances) => {
                tracing::debug!(
                    "Batch balance returned {} of {} entries, reading individually",
                    balances.len(),
                    readable.len()
                );
                self.single_reward_reads(creator, &readable, account, &mut out)
                    .await;
            }
            Err(e) => {
                tracing::debug!("Batch balance read failed: {}, reading individually", e);
                self.single_reward_reads(creator, &readable, account, &mut out)
                    .await;
            }
        }
        out
    }

    async fn single_reward_reads(
        &self,
        creator: Address,
        readable: &[(&str, U256)],
        account: Address,
        out: &mut HashMap<String, U256>,
    ) {
        let reads = readable
            .iter()
            .map(|(_, token_id)| self.reader.erc1155_balance(creator, account, *token_id));
        for ((id, _), result) in readable.iter().zip(join_all(reads).await) {
            let balance = result.unwrap_or_else(|e| {
                tracing::debug!("Reward balance read for campaign {} failed: {}", id, e);
                U256::zero()
            });
            out.insert((*id).to_string(), balance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::MockChain;

    const ACCOUNT: Address = Address::repeat_byte(0x5e);

    fn creator() -> Address {
        Address::repeat_byte(0x01)
    }

    #[tokio::test]
    async fn no_account_means_every_balance_is_unknown() {
        let mock = MockChain::default();
        let campaigns = vec![mock.campaign_fixture(1, true)];
        let aggregator = BalanceAggregator::new(Arc::new(mock));

        let balances = aggregator.balances_for(creator(), &campaigns, None).await;
        assert_eq!(balances.account, None);
        assert_eq!(balances.burn_token_balance, None);
        assert!(balances.reward_balances.is_empty());
    }

    #[tokio::test]
    async fn burn_balance_comes_from_the_first_campaign() {
        let mut mock = MockChain::default();
        mock.set_burn_balance(ACCOUNT, 1, 7);
        let campaigns = vec![mock.campaign_fixture(1, true), mock.campaign_fixture(2, true)];
        let aggregator = BalanceAggregator::new(Arc::new(mock));

        let balances = aggregator
            .balances_for(creator(), &campaigns, Some(ACCOUNT))
            .await;
        assert_eq!(balances.burn_token_balance, Some(U256::from(7u64)));
    }

    #[tokio::test]
    async fn first_campaign_without_burn_info_leaves_balance_unknown() {
        let mut mock = MockChain::default();
        mock.set_burn_balance(ACCOUNT, 2, 5);
        let mut bare = mock.campaign_fixture(1, true);
        bare.burn_contract = None;
        bare.burn_token_id = None;
        let campaigns = vec![bare, mock.campaign_fixture(2, true)];
        let aggregator = BalanceAggregator::new(Arc::new(mock));

        let balances = aggregator
            .balances_for(creator(), &campaigns, Some(ACCOUNT))
            .await;
        assert_eq!(balances.burn_token_balance, None);
    }

    #[tokio::test]
    async fn failed_burn_read_is_unknown_not_zero() {
        let mut mock = MockChain::default();
        mock.balance_errors
            .insert((MockChain::burn_contract(), ACCOUNT, U256::one()));
        let campaigns = vec![mock.campaign_fixture(1, true)];
        let aggregator = BalanceAggregator::new(Arc::new(mock));

        let balances = aggregator
            .balances_for(creator(), &campaigns, Some(ACCOUNT))
            .await;
        assert_eq!(balances.burn_token_balance, None);
    }

    #[tokio::test]
    async fn batch_read_fills_reward_balances() {
        let mut mock = MockChain::default();
        mock.balances
            .insert((creator(), ACCOUNT, U256::from(1001u64)), U256::from(3u64));
        let campaigns = vec![mock.campaign_fixture(1, true), mock.campaign_fixture(2, true)];
        let aggregator = BalanceAggregator::new(Arc::new(mock));

        let balances = aggregator
            .balances_for(creator(), &campaigns, Some(ACCOUNT))
            .await;
        assert_eq!(balances.reward_balances["1"], U256::from(3u64));
        assert_eq!(balances.reward_balances["2"], U256::zero());
    }

    #[tokio::test]
    async fn batch_failure_falls_back_to_single_reads() {
        let mut mock = MockChain::default();
        mock.fail_batch_read = true;
        mock.balances
            .insert((creator(), ACCOUNT, U256::from(1002u64)), U256::from(9u64));
        let campaigns = vec![mock.campaign_fixture(1, true), mock.campaign_fixture(2, true)];
        let aggregator = BalanceAggregator::new(Arc::new(mock));

        let balances = aggregator
            .balances_for(creator(), &campaigns, Some(ACCOUNT))
            .await;
        assert_eq!(balances.reward_balances["1"], U256::zero());
        assert_eq!(balances.reward_balances["2"], U256::from(9u64));
    }

    #[tokio::test]
    async fn short_batch_result_also_falls_back() {
        let mut mock = MockChain::default();
        mock.short_batch_read = true;
        mock.balances
            .insert((creator(), ACCOUNT, U256::from(1001u64)), U256::from(4u64));
        let campaigns = vec![mock.campaign_fixture(1, true)];
        let aggregator = BalanceAggregator::new(Arc::new(mock));

        let balances = aggregator
            .balances_for(creator(), &campaigns, Some(ACCOUNT))
            .await;
        assert_eq!(balances.reward_balances["1"], U256::from(4u64));
    }

    #[tokio::test]
    async fn missing_reward_token_reads_as_zero_without_a_call() {
        let mut mock = MockChain::default();
        mock.fail_batch_read = true;
        let mut campaign = mock.campaign_fixture(1, true);
        campaign.reward_token_id = None;
        let aggregator = BalanceAggregator::new(Arc::new(mock));

        let balances = aggregator
            .balances_for(creator(), &[campaign], Some(ACCOUNT))
            .await;
        // batch reads are broken yet the entry still resolves
        assert_eq!(balances.reward_balances["1"], U256::zero());
    }
}
