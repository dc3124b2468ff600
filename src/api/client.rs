// src/api/client.rs
use async_trait::async_trait;

use crate::errors::ApiError;
use crate::types::{CreateTradeResponse, LogEntry, PriceSnapshot, Trade, TradeId, TradeRequest};

/// Everything the dashboard needs from the trading backend: four reads and
/// one write. The synchronizer and the trade form only see this trait.
#[async_trait]
pub trait TradeApi: Send + Sync {
    /// `GET /price/live`
    async fn live_price(&self) -> Result<PriceSnapshot, ApiError>;

    /// `GET /trade/active`, in backend order.
    async fn active_trades(&self) -> Result<Vec<Trade>, ApiError>;

    /// `GET /trade/history`
    async fn trade_history(&self) -> Result<Vec<Trade>, ApiError>;

    /// `GET /trade/{id}/logs`
    async fn trade_logs(&self, trade_id: TradeId) -> Result<Vec<LogEntry>, ApiError>;

    /// `POST /trade/create`
    async fn create_trade(&self, request: &TradeRequest) -> Result<CreateTradeResponse, ApiError>;
}
