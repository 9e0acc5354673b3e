// src/models/mod.rs
pub mod campaign;
pub mod execution;

// Re-export commonly used types so other modules can use `crate::models::X`
pub use campaign::{
    BurnGroup,
    BurnItem,
    Campaign,
    CampaignConfig,
    CatalogScan,
    CreatorProfile,
    Descriptor,
    StorageProtocol,
    WalletBalances,
};
pub use execution::{
    ApiResponse,
    ExecutionOutcome,
    RunProgress,
    RunSnapshot,
    TransactionRecord,
    TransactionStatus,
};
