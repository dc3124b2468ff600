// tests/common/mod.rs - Scripted in-memory backend shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use trade_dashboard::api::TradeApi;
use trade_dashboard::errors::ApiError;
use trade_dashboard::types::{
    CreateTradeResponse, LogEntry, PriceSnapshot, Trade, TradeId, TradeRequest, TradeStatus,
};

pub fn setup_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn trade(id: TradeId) -> Trade {
    Trade {
        id,
        symbol: "BTC/USDT".to_string(),
        status: TradeStatus::Pending,
        buy_price: 100.0,
        sell_price: Some(110.0),
        stop_loss: Some(90.0),
        quantity: 1.0,
        current_price: Some(101.0),
        unrealized_pnl: None,
        unrealized_pnl_percent: None,
        exit_price: None,
        pnl: None,
        user_id: Some(1),
        created_at: "2025-05-16T10:00:00".to_string(),
    }
}

pub fn trades(ids: &[TradeId]) -> Vec<Trade> {
    ids.iter().map(|id| trade(*id)).collect()
}

pub fn log_entry(id: i64, trade_id: TradeId, message: &str) -> LogEntry {
    LogEntry {
        id,
        trade_id: Some(trade_id),
        timestamp: "2025-05-16T10:00:01".to_string(),
        message: message.to_string(),
        price: Some(100.0),
    }
}

#[derive(Default)]
struct FakeState {
    /// Each batch pops one set; the last set sticks.
    active_script: VecDeque<Vec<Trade>>,
    history: Vec<Trade>,
    logs: HashMap<TradeId, Vec<LogEntry>>,
    fail_batch: bool,
    fail_logs: bool,
    batch_delay: Duration,
    logs_delay: Duration,
    create_failure: Option<(u16, String)>,
    next_trade_id: TradeId,

    batch_calls: usize,
    log_calls: Vec<(TradeId, Duration)>,
    created: Vec<TradeRequest>,
}

pub struct FakeTradeApi {
    inner: Mutex<FakeState>,
    started: Instant,
}

impl FakeTradeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(FakeState {
                next_trade_id: 1,
                ..FakeState::default()
            }),
            started: Instant::now(),
        })
    }

    pub fn script_active(&self, sets: Vec<Vec<Trade>>) {
        self.inner.lock().unwrap().active_script = sets.into();
    }

    pub fn set_history(&self, history: Vec<Trade>) {
        self.inner.lock().unwrap().history = history;
    }

    pub fn set_logs(&self, trade_id: TradeId, logs: Vec<LogEntry>) {
        self.inner.lock().unwrap().logs.insert(trade_id, logs);
    }

    pub fn fail_batch(&self, fail: bool) {
        self.inner.lock().unwrap().fail_batch = fail;
    }

    pub fn fail_logs(&self, fail: bool) {
        self.inner.lock().unwrap().fail_logs = fail;
    }

    pub fn delay_batch(&self, delay: Duration) {
        self.inner.lock().unwrap().batch_delay = delay;
    }

    pub fn delay_logs(&self, delay: Duration) {
        self.inner.lock().unwrap().logs_delay = delay;
    }

    pub fn fail_create(&self, status: u16, body: &str) {
        self.inner.lock().unwrap().create_failure = Some((status, body.to_string()));
    }

    pub fn batch_calls(&self) -> usize {
        self.inner.lock().unwrap().batch_calls
    }

    /// Trade id and time since the fake was built, per logs request.
    pub fn log_calls(&self) -> Vec<(TradeId, Duration)> {
        self.inner.lock().unwrap().log_calls.clone()
    }

    pub fn created(&self) -> Vec<TradeRequest> {
        self.inner.lock().unwrap().created.clone()
    }

    fn status_error(method: &'static str, path: &str, status: u16, body: &str) -> ApiError {
        ApiError::Status {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl TradeApi for FakeTradeApi {
    async fn live_price(&self) -> Result<PriceSnapshot, ApiError> {
        let delay = self.inner.lock().unwrap().batch_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(PriceSnapshot {
            symbol: Some("BTC/USD".to_string()),
            price: 101.0,
            change_24h: Some(1.5),
            change_percent_24h: Some(1.49),
        })
    }

    async fn active_trades(&self) -> Result<Vec<Trade>, ApiError> {
        let (delay, active) = {
            let mut state = self.inner.lock().unwrap();
            state.batch_calls += 1;
            let active = if state.active_script.len() > 1 {
                state.active_script.pop_front().unwrap_or_default()
            } else {
                state.active_script.front().cloned().unwrap_or_default()
            };
            (state.batch_delay, active)
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(active)
    }

    async fn trade_history(&self) -> Result<Vec<Trade>, ApiError> {
        let (delay, fail, history) = {
            let state = self.inner.lock().unwrap();
            (state.batch_delay, state.fail_batch, state.history.clone())
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(Self::status_error("GET", "/trade/history", 500, "boom"));
        }
        Ok(history)
    }

    async fn trade_logs(&self, trade_id: TradeId) -> Result<Vec<LogEntry>, ApiError> {
        let (delay, fail, logs) = {
            let mut state = self.inner.lock().unwrap();
            let at = self.started.elapsed();
            state.log_calls.push((trade_id, at));
            (
                state.logs_delay,
                state.fail_logs,
                state.logs.get(&trade_id).cloned().unwrap_or_default(),
            )
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if fail {
            let path = format!("/trade/{}/logs", trade_id);
            return Err(Self::status_error("GET", &path, 502, "bad gateway"));
        }
        Ok(logs)
    }

    async fn create_trade(&self, request: &TradeRequest) -> Result<CreateTradeResponse, ApiError> {
        let mut state = self.inner.lock().unwrap();
        state.created.push(request.clone());
        if let Some((status, body)) = &state.create_failure {
            return Err(Self::status_error("POST", "/trade/create", *status, body));
        }
        let trade_id = state.next_trade_id;
        state.next_trade_id += 1;
        Ok(CreateTradeResponse {
            trade_id,
            status: Some("success".to_string()),
            message: Some("Trade created successfully".to_string()),
        })
    }
}
