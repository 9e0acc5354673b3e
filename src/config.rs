use crate::constants;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Blockchain
    pub ethereum_rpc_url: String,
    pub chain_id: u64,

    // Signing wallet (optional; without it the service is read-only)
    pub wallet_private_key: Option<String>,

    // Campaign discovery
    pub scan_block_window: u64,

    // Redemption pricing
    pub burn_redeem_fee_wei: u128,

    // Metadata gateways
    pub ipfs_gateway_url: String,
    pub arweave_gateway_url: String,
    pub metadata_timeout_secs: u64,

    // CORS
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            ethereum_rpc_url: env::var("ETHEREUM_RPC_URL")?,
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| "1".to_string())
                .parse()?,

            wallet_private_key: env::var("WALLET_PRIVATE_KEY").ok(),

            scan_block_window: env::var("SCAN_BLOCK_WINDOW")
                .unwrap_or_else(|_| constants::DEFAULT_SCAN_BLOCK_WINDOW.to_string())
                .parse()?,

            burn_redeem_fee_wei: env::var("BURN_REDEEM_FEE_WEI")
                .unwrap_or_else(|_| constants::BURN_REDEEM_FEE_WEI.to_string())
                .parse()?,

            ipfs_gateway_url: env::var("IPFS_GATEWAY_URL")
                .unwrap_or_else(|_| constants::IPFS_GATEWAY.to_string()),
            arweave_gateway_url: env::var("ARWEAVE_GATEWAY_URL")
                .unwrap_or_else(|_| constants::ARWEAVE_GATEWAY.to_string()),
            metadata_timeout_secs: env::var("METADATA_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.ethereum_rpc_url.trim().is_empty() {
            anyhow::bail!("ETHEREUM_RPC_URL is empty");
        }
        url::Url::parse(&self.ethereum_rpc_url)
            .map_err(|e| anyhow::anyhow!("ETHEREUM_RPC_URL is not a valid URL: {}", e))?;

        match &self.wallet_private_key {
            None => {
                tracing::warn!("No WALLET_PRIVATE_KEY set; redemption execution is disabled");
            }
            Some(key) => {
                if key.trim().is_empty() {
                    anyhow::bail!("WALLET_PRIVATE_KEY is set but empty");
                }
                if key.trim_start_matches("0x").starts_with("ac0974") {
                    tracing::warn!("Detected a well-known dev wallet key in config");
                }
            }
        }

        if self.scan_block_window == 0 {
            tracing::warn!("SCAN_BLOCK_WINDOW is 0; scans will never find campaigns");
        }
        if self.burn_redeem_fee_wei == 0 {
            tracing::warn!("BURN_REDEEM_FEE_WEI is 0; redemptions may revert under-funded");
        }

        if self.ipfs_gateway_url.trim().is_empty() || self.arweave_gateway_url.trim().is_empty() {
            tracing::warn!("Empty metadata gateway URL; descriptor resolution will fail");
        }

        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    /// Etherscan-style base for linking a transaction hash, when the chain
    /// has a known explorer.
    pub fn explorer_tx_base(&self) -> Option<&'static str> {
        match self.chain_id {
            1 => Some("https://etherscan.io/tx/"),
            11155111 => Some("https://sepolia.etherscan.io/tx/"),
            _ => None,
        }
    }
}
