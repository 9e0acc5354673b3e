// src/api/mod.rs

pub mod campaigns;
pub mod health;
pub mod redeem;
pub mod session;

// AppState definition
use crate::chain::ChainReader;
use crate::config::Config;
use crate::services::{BalanceAggregator, CatalogService, RedeemExecutor, RedeemSession};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub reader: Arc<dyn ChainReader>,
    pub catalog: Arc<CatalogService>,
    pub balances: Arc<BalanceAggregator>,
    pub executor: Arc<RedeemExecutor>,
    pub session: Arc<RwLock<RedeemSession>>,
}
