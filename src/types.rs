// src/types.rs - Wire types shared by the API client, synchronizer and UI
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub type TradeId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Pending,
    Bought,
    Sold,
    Stopped,
    #[serde(other)]
    Unknown,
}

impl TradeStatus {
    /// Pending and bought trades are still being worked by the backend.
    pub fn is_active(&self) -> bool {
        matches!(self, TradeStatus::Pending | TradeStatus::Bought)
    }

    pub fn text(&self) -> &str {
        match self {
            TradeStatus::Pending => "PENDING",
            TradeStatus::Bought => "BOUGHT",
            TradeStatus::Sold => "SOLD",
            TradeStatus::Stopped => "STOPPED",
            TradeStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    #[serde(default)]
    pub symbol: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub change_24h: Option<f64>,
    #[serde(default)]
    pub change_percent_24h: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayChange {
    pub change: f64,
    pub percent: f64,
    pub direction: Direction,
}

impl PriceSnapshot {
    /// 24h move, only when the backend reported both the absolute and the
    /// percentage change.
    pub fn day_change(&self) -> Option<DayChange> {
        let change = self.change_24h?;
        let percent = self.change_percent_24h?;
        let direction = if change > 0.0 {
            Direction::Up
        } else if change < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        };
        Some(DayChange {
            change,
            percent,
            direction,
        })
    }
}

/// A trade as returned by `/trade/active` or `/trade/history`.
///
/// Active rows carry `current_price` and `unrealized_pnl`; history rows carry
/// `exit_price` and `pnl` and leave out the take-profit/stop-loss levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub symbol: String,
    pub status: TradeStatus,
    pub buy_price: f64,
    #[serde(default)]
    pub sell_price: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    pub quantity: f64,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub unrealized_pnl: Option<f64>,
    #[serde(default)]
    pub unrealized_pnl_percent: Option<f64>,
    #[serde(default)]
    pub exit_price: Option<f64>,
    #[serde(default)]
    pub pnl: Option<f64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    #[serde(default)]
    pub trade_id: Option<TradeId>,
    pub timestamp: String,
    pub message: String,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Body of `POST /trade/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub stop_loss: f64,
    pub quantity: f64,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTradeResponse {
    pub trade_id: TradeId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Parses backend timestamps. The backend writes naive UTC `isoformat()`
/// strings; RFC 3339 is accepted as well.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_active_trade_deserializes_backend_row() {
        let raw = r#"{
            "id": 7, "user_id": 1, "symbol": "BTC/USDT",
            "buy_price": 100.0, "sell_price": 110.0, "stop_loss": 90.0,
            "quantity": 0.5, "status": "bought",
            "created_at": "2025-01-02T10:11:12.345678",
            "current_price": 104.0, "unrealized_pnl": 2.0,
            "unrealized_pnl_percent": 4.0
        }"#;

        let trade: Trade = serde_json::from_str(raw).unwrap();
        assert_eq!(trade.id, 7);
        assert_eq!(trade.status, TradeStatus::Bought);
        assert!(trade.status.is_active());
        assert_eq!(trade.unrealized_pnl, Some(2.0));
        assert_eq!(trade.exit_price, None);
    }

    #[test]
    fn test_history_trade_without_levels() {
        let raw = r#"{
            "id": 3, "symbol": "BTC/USDT", "status": "stopped",
            "buy_price": 100.0, "exit_price": 89.5, "quantity": 1.0,
            "pnl": -10.5, "created_at": "2025-01-02T10:11:12"
        }"#;

        let trade: Trade = serde_json::from_str(raw).unwrap();
        assert_eq!(trade.status, TradeStatus::Stopped);
        assert!(!trade.status.is_active());
        assert_eq!(trade.sell_price, None);
        assert_eq!(trade.pnl, Some(-10.5));
    }

    #[test]
    fn test_unknown_status_does_not_fail() {
        let raw = r#"{"id": 1, "symbol": "X", "status": "cancelled",
            "buy_price": 1.0, "quantity": 1.0, "created_at": ""}"#;
        let trade: Trade = serde_json::from_str(raw).unwrap();
        assert_eq!(trade.status, TradeStatus::Unknown);
    }

    #[test]
    fn test_day_change_requires_both_fields() {
        let mut snapshot = PriceSnapshot {
            symbol: Some("BTC/USD".to_string()),
            price: 50_000.0,
            change_24h: Some(-120.0),
            change_percent_24h: None,
        };
        assert_eq!(snapshot.day_change(), None);

        snapshot.change_percent_24h = Some(-0.24);
        let change = snapshot.day_change().unwrap();
        assert_eq!(change.direction, Direction::Down);

        snapshot.change_24h = Some(0.0);
        assert_eq!(snapshot.day_change().unwrap().direction, Direction::Flat);
    }

    #[test]
    fn test_price_without_change_fields() {
        let snapshot: PriceSnapshot =
            serde_json::from_str(r#"{"symbol": "BTC/USD", "price": 64000.5}"#).unwrap();
        assert_eq!(snapshot.price, 64000.5);
        assert_eq!(snapshot.day_change(), None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let naive = parse_timestamp("2025-01-02T10:11:12.345678").unwrap();
        assert_eq!(naive.hour(), 10);

        let whole = parse_timestamp("2025-01-02T10:11:12").unwrap();
        assert_eq!(whole.second(), 12);

        let rfc = parse_timestamp("2025-01-02T10:11:12+02:00").unwrap();
        assert_eq!(rfc.hour(), 8);

        assert!(parse_timestamp("yesterday").is_none());
    }
}
