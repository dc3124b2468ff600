// src/sync/state.rs - View state written by the poll loops, read by the UI
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::types::{LogEntry, PriceSnapshot, Trade, TradeId};

pub type SharedState = Arc<RwLock<DashboardState>>;

/// Result of one price/active/history batch. Either all three arrived or the
/// batch failed as a whole.
#[derive(Debug, Clone)]
pub struct PollSnapshot {
    pub price: PriceSnapshot,
    pub active_trades: Vec<Trade>,
    pub history_trades: Vec<Trade>,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub price: Option<PriceSnapshot>,
    pub active_trades: Vec<Trade>,
    pub history_trades: Vec<Trade>,
    pub logs: Vec<LogEntry>,
    /// Mirror of the selection cell for rendering.
    pub selected_trade_id: Option<TradeId>,
    pub last_updated: Option<DateTime<Local>>,
    pub update_count: u64,
    /// Latest poll failure, kept until the next good batch.
    pub last_error: Option<String>,
}

impl DashboardState {
    pub fn shared() -> SharedState {
        Arc::new(RwLock::new(Self::default()))
    }

    /// Replaces price, active and history wholesale.
    pub fn apply_snapshot(&mut self, snapshot: PollSnapshot, at: DateTime<Local>) {
        self.price = Some(snapshot.price);
        self.active_trades = snapshot.active_trades;
        self.history_trades = snapshot.history_trades;
        self.last_updated = Some(at);
        self.update_count += 1;
        self.last_error = None;
    }

    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected_trade_id?;
        self.active_trades.iter().position(|t| t.id == id)
    }

    pub fn selected_trade(&self) -> Option<&Trade> {
        self.selected_index().map(|i| &self.active_trades[i])
    }

    pub fn is_active(&self, trade_id: TradeId) -> bool {
        self.active_trades.iter().any(|t| t.id == trade_id)
    }

    /// Id of the active trade `offset` rows away from the selection, wrapping
    /// around. Starts from the first row when nothing is selected.
    pub fn neighbour_of_selection(&self, offset: isize) -> Option<TradeId> {
        let len = self.active_trades.len();
        if len == 0 {
            return None;
        }
        let index = match self.selected_index() {
            Some(current) => (current as isize + offset).rem_euclid(len as isize) as usize,
            None => 0,
        };
        Some(self.active_trades[index].id)
    }
}
