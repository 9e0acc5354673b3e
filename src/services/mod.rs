// All service modules
pub mod balances;
pub mod catalog;
pub mod executor;
pub mod metadata;
pub mod session;

// Re-export for convenience
pub use balances::BalanceAggregator;
pub use catalog::CatalogService;
pub use executor::RedeemExecutor;
pub use metadata::MetadataResolver;
pub use session::{RedeemSession, SessionScope};
