// src/api/http.rs - reqwest implementation of TradeApi
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::api::client::TradeApi;
use crate::errors::ApiError;
use crate::types::{CreateTradeResponse, LogEntry, PriceSnapshot, Trade, TradeId, TradeRequest};

#[derive(Clone)]
pub struct HttpTradeApi {
    client: Client,
    base_url: String,
}

impl HttpTradeApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        log::debug!("GET {}", path);
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                method: "GET",
                path: path.to_string(),
                source,
            })?;

        read_json("GET", path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        log::debug!("POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                method: "POST",
                path: path.to_string(),
                source,
            })?;

        read_json("POST", path, response).await
    }
}

/// Reads the body once so a failed call can report it next to the status.
async fn read_json<T: DeserializeOwned>(
    method: &'static str,
    path: &str,
    response: Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(|source| ApiError::Transport {
        method,
        path: path.to_string(),
        source,
    })?;

    if !status.is_success() {
        return Err(ApiError::Status {
            method,
            path: path.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        method,
        path: path.to_string(),
        source,
    })
}

#[async_trait]
impl TradeApi for HttpTradeApi {
    async fn live_price(&self) -> Result<PriceSnapshot, ApiError> {
        self.get_json("/price/live").await
    }

    async fn active_trades(&self) -> Result<Vec<Trade>, ApiError> {
        self.get_json("/trade/active").await
    }

    async fn trade_history(&self) -> Result<Vec<Trade>, ApiError> {
        self.get_json("/trade/history").await
    }

    async fn trade_logs(&self, trade_id: TradeId) -> Result<Vec<LogEntry>, ApiError> {
        self.get_json(&format!("/trade/{}/logs", trade_id)).await
    }

    async fn create_trade(&self, request: &TradeRequest) -> Result<CreateTradeResponse, ApiError> {
        self.post_json("/trade/create", request).await
    }
}
