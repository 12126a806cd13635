use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;
use std::time::Duration;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{SubmitError, TradingError};
use crate::exchange::traits::Exchange;
use crate::models::order::{OrderAck, OrderId, OrderRequest, OrderStatus, OrderType};
use crate::utils::current_timestamp_ms;

type HmacSha256 = Hmac<Sha256>;

const ORDER_PATH: &str = "/api/v3/order";
const TIME_PATH: &str = "/api/v3/time";

/// Binance SPOT REST connector (order placement subset)
pub struct BinanceSpotExchange {
  base_url: String,
  api_key: String,
  api_secret: String,
  recv_window_ms: u64,
  /// server time - local time, applied to every signed request
  time_offset_ms: i64,
  http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderResponse {
  order_id: u64,
  #[serde(default)]
  status: Option<String>,
  #[serde(default)]
  executed_qty: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
  code: i64,
  msg: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerTime {
  server_time: i64,
}

impl BinanceSpotExchange {
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
    BinanceSpotExchange {
      base_url: base_url.into().trim_end_matches('/').to_string(),
      api_key: api_key.into(),
      api_secret: api_secret.into(),
      recv_window_ms: 60_000,
      time_offset_ms: 0,
      http: reqwest::Client::new(),
    }
  }

  /// Build a connector from configuration; credentials are required
  pub fn from_config(config: &Config) -> Result<Self, TradingError> {
    let (api_key, api_secret) = config.credentials()?;
    let http = reqwest::Client::builder()
      .timeout(Duration::from_millis(config.exchange.timeout_ms))
      .build()
      .map_err(|e| TradingError::ExchangeError(format!("failed to build http client: {}", e)))?;

    let mut exchange = Self::new(config.exchange.base_url.clone(), api_key, api_secret)
      .with_recv_window(config.exchange.recv_window_ms);
    exchange.http = http;
    Ok(exchange)
  }

  pub fn with_recv_window(mut self, recv_window_ms: u64) -> Self {
    self.recv_window_ms = recv_window_ms;
    self
  }

  pub fn time_offset_ms(&self) -> i64 {
    self.time_offset_ms
  }

  fn timestamp_ms(&self) -> i64 {
    current_timestamp_ms() + self.time_offset_ms
  }

  fn sign(&self, query: &str) -> Result<String, SubmitError> {
    let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
      .map_err(|e| SubmitError::new(format!("invalid api secret: {}", e)))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
  }
}

/// Binance order type name for a request
pub fn exchange_order_type(order_type: OrderType) -> &'static str {
  match order_type {
    OrderType::Market => "MARKET",
    OrderType::Limit => "LIMIT",
    // SPOT has no plain STOP_LIMIT; STOP_LOSS_LIMIT is used for both sides
    OrderType::StopLimit => "STOP_LOSS_LIMIT",
  }
}

fn fmt_decimal(value: Decimal) -> String {
  value.normalize().to_string()
}

/// Unsigned query string for `POST /api/v3/order`
pub fn order_query(order: &OrderRequest, client_order_id: &str, recv_window_ms: u64, timestamp: i64) -> String {
  let mut params = vec![
    format!("symbol={}", order.symbol),
    format!("side={}", order.side.as_str()),
    format!("type={}", exchange_order_type(order.order_type)),
    format!("quantity={}", fmt_decimal(order.quantity)),
  ];
  if let Some(price) = order.effective_price() {
    params.push(format!("price={}", fmt_decimal(price)));
  }
  if let Some(stop_price) = order.stop_price {
    params.push(format!("stopPrice={}", fmt_decimal(stop_price)));
  }
  if let Some(tif) = &order.time_in_force {
    params.push(format!("timeInForce={}", tif));
  }
  params.push(format!("newClientOrderId={}", client_order_id));
  params.push("newOrderRespType=RESULT".to_string());
  params.push(format!("recvWindow={}", recv_window_ms));
  params.push(format!("timestamp={}", timestamp));
  params.join("&")
}

/// Parse a successful order response body
pub fn parse_order_response(body: &str) -> Result<OrderAck, SubmitError> {
  let response: OrderResponse = serde_json::from_str(body)
    .map_err(|e| SubmitError::new(format!("unexpected order response: {}", e)))?;

  Ok(OrderAck {
    order_id: OrderId(response.order_id.to_string()),
    status: response.status.as_deref().and_then(OrderStatus::from_exchange),
    executed_qty: response.executed_qty,
  })
}

/// Turn a non-success response into a `SubmitError`
pub fn parse_error_response(status: u16, body: &str) -> SubmitError {
  match serde_json::from_str::<ApiErrorBody>(body) {
    Ok(err) => SubmitError::new(err.msg).with_status(status).with_code(err.code),
    Err(_) if body.trim().is_empty() => SubmitError::new("empty response body").with_status(status),
    Err(_) => SubmitError::new(body.trim().to_string()).with_status(status),
  }
}

#[async_trait]
impl Exchange for BinanceSpotExchange {
  async fn submit_order(&mut self, order: OrderRequest) -> Result<OrderAck, SubmitError> {
    let client_order_id = format!("x-{}", Uuid::new_v4().simple());
    let query = order_query(&order, &client_order_id, self.recv_window_ms, self.timestamp_ms());
    log::debug!("POST {} {}", ORDER_PATH, query);

    let signature = self.sign(&query)?;
    let url = format!("{}{}?{}&signature={}", self.base_url, ORDER_PATH, query, signature);
    let res = self.http
      .post(url)
      .header("X-MBX-APIKEY", &self.api_key)
      .send().await
      .map_err(|e| SubmitError::new(format!("submit_order http error: {}", e)))?;

    let status = res.status();
    let body = res.text().await
      .map_err(|e| SubmitError::new(format!("submit_order read error: {}", e)).with_status(status.as_u16()))?;
    log::debug!("Order response ({}): {}", status, body);

    if !status.is_success() {
      return Err(parse_error_response(status.as_u16(), &body));
    }
    parse_order_response(&body)
  }

  async fn sync_time(&mut self) -> Result<(), TradingError> {
    let url = format!("{}{}", self.base_url, TIME_PATH);
    let res = self.http.get(url)
      .send().await
      .map_err(|e| TradingError::ExchangeError(format!("server time http error: {}", e)))?;
    let status = res.status();
    if !status.is_success() {
      return Err(TradingError::ExchangeError(format!("server time failed: {}", status)));
    }
    let time = res.json::<ServerTime>().await
      .map_err(|e| TradingError::ExchangeError(format!("server time parse error: {}", e)))?;

    self.time_offset_ms = time.server_time - current_timestamp_ms();
    log::info!("Time offset with Binance server: {}ms", self.time_offset_ms);
    Ok(())
  }
}
