/// Application constants

// Burn/redeem extension deployments (Ethereum mainnet)
pub const BURN_REDEEM_EXTENSION_ERC1155: &str = "0xFc29813Beeb3c7395C7A5f8dfC3352491D5ea0E2";
pub const BURN_REDEEM_EXTENSION_ERC721: &str = "0xe5ce79AB71A5F1caC06fB3498b25298f37e43327";

// Flat protocol fee charged per redemption, on top of the campaign cost
pub const BURN_REDEEM_FEE_WEI: u128 = 690_000_000_000_000; // 0.00069 ETH

// Campaign discovery
pub const DEFAULT_SCAN_BLOCK_WINDOW: u64 = 100_000;

// Metadata gateways
pub const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";
pub const ARWEAVE_GATEWAY: &str = "https://arweave.net/";

// Content-addressed URI schemes rewritten to gateway URLs
pub const IPFS_URI_SCHEME: &str = "ipfs://";
pub const ARWEAVE_URI_SCHEME: &str = "ar://";

// Execution
pub const ERROR_MESSAGE_MAX_CHARS: usize = 50;

// API version
pub const API_VERSION: &str = "v1";
