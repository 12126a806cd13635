use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = ValidationError;

    /// 대소문자 구분 없이 BUY / SELL 만 허용
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(OrderSide::Buy),
            "SELL" => Ok(OrderSide::Sell),
            _ => Err(ValidationError::InvalidSide(format!(
                "'{}'. Side must be 'BUY' or 'SELL'",
                s.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderType {
    Market,
    Limit,
    StopLimit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopLimit => "STOP_LIMIT",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
    Expired,
}

impl OrderStatus {
    /// 거래소 응답의 status 문자열 해석
    pub fn from_exchange(s: &str) -> Option<Self> {
        match s {
            "NEW" => Some(OrderStatus::New),
            "PARTIALLY_FILLED" => Some(OrderStatus::PartiallyFilled),
            "FILLED" => Some(OrderStatus::Filled),
            "CANCELED" | "PENDING_CANCEL" => Some(OrderStatus::Cancelled),
            "REJECTED" => Some(OrderStatus::Rejected),
            "EXPIRED" | "EXPIRED_IN_MATCH" => Some(OrderStatus::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::New => "NEW",
            OrderStatus::PartiallyFilled => "PARTIALLY_FILLED",
            OrderStatus::Filled => "FILLED",
            OrderStatus::Cancelled => "CANCELED",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::Expired => "EXPIRED",
        };
        f.write_str(s)
    }
}

/// 거래소로 전송되는 단일 주문 요청
///
/// 검증을 통과한 값으로만 만들어진다. `quantity` 는 항상 양수이며,
/// LIMIT 는 `price`, STOP_LIMIT 는 `stop_price` 와 `limit_price` 를 모두 가진다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub limit_price: Option<Decimal>,
    pub time_in_force: Option<String>,
}

impl OrderRequest {
    pub fn new(
        symbol: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        quantity: Decimal,
    ) -> Self {
        OrderRequest {
            symbol: symbol.into(),
            side,
            order_type,
            quantity,
            price: None,
            stop_price: None,
            limit_price: None,
            time_in_force: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stop_price(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    pub fn with_limit_price(mut self, limit_price: Decimal) -> Self {
        self.limit_price = Some(limit_price);
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: impl Into<String>) -> Self {
        self.time_in_force = Some(time_in_force.into());
        self
    }

    /// 거래소에 실제로 걸리는 지정가 (LIMIT 는 price, STOP_LIMIT 는 limit_price)
    pub fn effective_price(&self) -> Option<Decimal> {
        match self.order_type {
            OrderType::Market => None,
            OrderType::Limit => self.price,
            OrderType::StopLimit => self.limit_price,
        }
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.order_type, self.side, self.quantity, self.symbol)?;
        match (self.stop_price, self.effective_price()) {
            (Some(stop), Some(limit)) => write!(f, " @ stop={} limit={}", stop, limit),
            (None, Some(price)) => write!(f, " @ {}", price),
            _ => Ok(()),
        }
    }
}

/// 거래소가 주문을 접수했을 때의 응답 요약
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderAck {
    pub order_id: OrderId,
    pub status: Option<OrderStatus>,
    pub executed_qty: Option<Decimal>,
}

impl OrderAck {
    pub fn new(order_id: OrderId) -> Self {
        OrderAck { order_id, status: None, executed_qty: None }
    }
}
