//! 주문 입력 검증기
//!
//! 모든 입력은 거래소로 보내기 전에 여기서 걸러진다. 부수 효과가 없는 순수 함수들이다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::cli::{Command, GridArgs, LimitArgs, MarketArgs, StopLimitArgs, TwapArgs};
use crate::error::ValidationError;
use crate::models::order::{OrderSide, OrderType};
use crate::utils::math::truncate_quantity;

const SYMBOL_MIN_LEN: usize = 6;
const SYMBOL_MAX_LEN: usize = 20;

/// 거래소 수량/가격 필드의 최댓값 (int64, 소수 8자리)
pub const MAX_AMOUNT: Decimal = dec!(92233720368.54775807);
/// 심볼당 미체결 주문 한도
pub const MAX_GRID_LINES: usize = 200;
pub const MAX_TWAP_SLICES: usize = 1_000;
/// TWAP 간격 상한 (하루)
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// 스톱 리밋 가격 관계 규칙
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StopLimitRule {
    /// BUY: limit >= stop, SELL: limit <= stop
    Conventional,
    /// 양수 여부만 검사
    Off,
}

impl FromStr for StopLimitRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conventional" => Ok(StopLimitRule::Conventional),
            "off" | "none" => Ok(StopLimitRule::Off),
            other => Err(format!("unknown stop-limit rule '{}'", other)),
        }
    }
}

impl fmt::Display for StopLimitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopLimitRule::Conventional => f.write_str("conventional"),
            StopLimitRule::Off => f.write_str("off"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    pub stop_limit_rule: StopLimitRule,
    /// TWAP 분할 수량 절사 자릿수
    pub quantity_decimals: u32,
}

impl Default for ValidationRules {
    fn default() -> Self {
        ValidationRules {
            stop_limit_rule: StopLimitRule::Conventional,
            quantity_decimals: 8,
        }
    }
}

/// 단일 주문 파라미터 (검증 완료)
#[derive(Debug, Clone, PartialEq)]
pub struct OrderParams {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub limit_price: Option<Decimal>,
}

/// TWAP 파라미터 (검증 완료)
#[derive(Debug, Clone, PartialEq)]
pub struct TwapParams {
    pub symbol: String,
    pub side: OrderSide,
    pub total_quantity: Decimal,
    pub slice_count: usize,
    pub interval: Duration,
}

/// Grid 파라미터 (검증 완료)
#[derive(Debug, Clone, PartialEq)]
pub struct GridParams {
    pub symbol: String,
    pub lower_price: Decimal,
    pub upper_price: Decimal,
    pub line_count: usize,
    pub quantity_per_line: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedCommand {
    Order { order_type: OrderType, params: OrderParams },
    Twap(TwapParams),
    Grid(GridParams),
}

/// 명령 전체 검증
///
/// `default_slices` 는 `twap` 명령에 `--slices` 가 없을 때 쓰인다.
pub fn validate(
    command: &Command,
    rules: &ValidationRules,
    default_slices: usize,
) -> Result<ValidatedCommand, ValidationError> {
    match command {
        Command::Market(MarketArgs { symbol, side, quantity }) => Ok(ValidatedCommand::Order {
            order_type: OrderType::Market,
            params: OrderParams {
                symbol: validate_symbol(symbol)?,
                side: validate_side(side)?,
                quantity: validate_quantity(quantity)?,
                price: None,
                stop_price: None,
                limit_price: None,
            },
        }),
        Command::Limit(LimitArgs { symbol, side, quantity, price }) => Ok(ValidatedCommand::Order {
            order_type: OrderType::Limit,
            params: OrderParams {
                symbol: validate_symbol(symbol)?,
                side: validate_side(side)?,
                quantity: validate_quantity(quantity)?,
                price: Some(validate_price(price, "Price")?),
                stop_price: None,
                limit_price: None,
            },
        }),
        Command::StopLimit(StopLimitArgs { symbol, side, quantity, stop_price, limit_price }) => {
            let symbol = validate_symbol(symbol)?;
            let side = validate_side(side)?;
            let quantity = validate_quantity(quantity)?;
            let stop_price = validate_price(stop_price, "Stop price")?;
            let limit_price = validate_price(limit_price, "Limit price")?;
            validate_price_relationship(side, stop_price, limit_price, rules.stop_limit_rule)?;

            Ok(ValidatedCommand::Order {
                order_type: OrderType::StopLimit,
                params: OrderParams {
                    symbol,
                    side,
                    quantity,
                    price: None,
                    stop_price: Some(stop_price),
                    limit_price: Some(limit_price),
                },
            })
        }
        Command::Twap(TwapArgs { symbol, side, total_quantity, interval_seconds, slices }) => {
            let symbol = validate_symbol(symbol)?;
            let side = validate_side(side)?;
            let total_quantity = validate_quantity(total_quantity)?;
            let interval = validate_interval(interval_seconds)?;
            let slice_count = slices.unwrap_or(default_slices);
            validate_slice_count(total_quantity, slice_count, rules.quantity_decimals)?;

            Ok(ValidatedCommand::Twap(TwapParams { symbol, side, total_quantity, slice_count, interval }))
        }
        Command::Grid(GridArgs { symbol, lower_price, upper_price, line_count, quantity_per_line }) => {
            let symbol = validate_symbol(symbol)?;
            let lower_price = validate_price(lower_price, "Lower price")?;
            let upper_price = validate_price(upper_price, "Upper price")?;
            let line_count = validate_grid_range(lower_price, upper_price, line_count)?;
            let quantity_per_line = validate_quantity(quantity_per_line)?;

            Ok(ValidatedCommand::Grid(GridParams {
                symbol,
                lower_price,
                upper_price,
                line_count,
                quantity_per_line,
            }))
        }
    }
}

/// 심볼 검증: 대문자 영숫자 6~20자
pub fn validate_symbol(symbol: &str) -> Result<String, ValidationError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(ValidationError::InvalidSymbol("Symbol cannot be empty".to_string()));
    }

    let well_formed = (SYMBOL_MIN_LEN..=SYMBOL_MAX_LEN).contains(&symbol.len())
        && symbol.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());

    if !well_formed {
        return Err(ValidationError::InvalidSymbol(format!(
            "'{}'. Symbol must be {}-{} uppercase alphanumeric characters (e.g., BTCUSDT, ETHUSDT)",
            symbol, SYMBOL_MIN_LEN, SYMBOL_MAX_LEN
        )));
    }

    Ok(symbol.to_string())
}

/// 주문 방향 검증 (대소문자 무시)
pub fn validate_side(side: &str) -> Result<OrderSide, ValidationError> {
    side.parse()
}

/// 수량 검증: 0보다 큰 십진수
pub fn validate_quantity(quantity: &str) -> Result<Decimal, ValidationError> {
    match parse_decimal(quantity) {
        Some(q) if q > MAX_AMOUNT => Err(ValidationError::InvalidQuantity(format!(
            "{}. Quantity must not exceed {}",
            q, MAX_AMOUNT
        ))),
        Some(q) if q > Decimal::ZERO => Ok(q),
        Some(q) => Err(ValidationError::InvalidQuantity(format!(
            "{}. Quantity must be greater than 0",
            q
        ))),
        None => Err(ValidationError::InvalidQuantity(format!(
            "'{}'. Must be a number",
            quantity.trim()
        ))),
    }
}

/// 가격 검증: 0보다 큰 십진수
pub fn validate_price(price: &str, field_name: &str) -> Result<Decimal, ValidationError> {
    match parse_decimal(price) {
        Some(p) if p > MAX_AMOUNT => Err(ValidationError::InvalidPrice(format!(
            "{} {}. {} must not exceed {}",
            field_name, p, field_name, MAX_AMOUNT
        ))),
        Some(p) if p > Decimal::ZERO => Ok(p),
        Some(p) => Err(ValidationError::InvalidPrice(format!(
            "{} {}. {} must be greater than 0",
            field_name, p, field_name
        ))),
        None => Err(ValidationError::InvalidPrice(format!(
            "{} '{}'. Must be a number",
            field_name,
            price.trim()
        ))),
    }
}

/// 스톱 리밋 가격 관계 검증
pub fn validate_price_relationship(
    side: OrderSide,
    stop_price: Decimal,
    limit_price: Decimal,
    rule: StopLimitRule,
) -> Result<(), ValidationError> {
    if rule == StopLimitRule::Off {
        return Ok(());
    }

    match side {
        OrderSide::Buy if limit_price < stop_price => Err(ValidationError::InvalidPriceRelationship(format!(
            "BUY stop-limit requires limit price ({}) >= stop price ({})",
            limit_price, stop_price
        ))),
        OrderSide::Sell if limit_price > stop_price => Err(ValidationError::InvalidPriceRelationship(format!(
            "SELL stop-limit requires limit price ({}) <= stop price ({})",
            limit_price, stop_price
        ))),
        _ => Ok(()),
    }
}

/// TWAP 간격 검증: 0 이상 `MAX_INTERVAL_SECS` 이하의 정수 초
pub fn validate_interval(interval_seconds: &str) -> Result<Duration, ValidationError> {
    match interval_seconds.trim().parse::<u64>() {
        Ok(secs) if secs <= MAX_INTERVAL_SECS => Ok(Duration::from_secs(secs)),
        Ok(secs) => Err(ValidationError::InvalidInterval(format!(
            "{}s. Interval must not exceed {}s",
            secs, MAX_INTERVAL_SECS
        ))),
        Err(_) => Err(ValidationError::InvalidInterval(format!(
            "'{}'. Interval must be a non-negative integer number of seconds",
            interval_seconds.trim()
        ))),
    }
}

/// TWAP 분할 수 검증. 분할 수량이 절사 후에도 0보다 커야 한다.
pub fn validate_slice_count(
    total_quantity: Decimal,
    slice_count: usize,
    quantity_decimals: u32,
) -> Result<Decimal, ValidationError> {
    if slice_count == 0 {
        return Err(ValidationError::InvalidSliceCount(
            "Slice count must be at least 1".to_string(),
        ));
    }
    if slice_count > MAX_TWAP_SLICES {
        return Err(ValidationError::InvalidSliceCount(format!(
            "Slice count {} must not exceed {}",
            slice_count, MAX_TWAP_SLICES
        )));
    }

    let per_slice = slice_quantity(total_quantity, slice_count, quantity_decimals);
    if per_slice <= Decimal::ZERO {
        return Err(ValidationError::InvalidSliceCount(format!(
            "Total quantity {} cannot be split into {} slices with {} decimal places",
            total_quantity, slice_count, quantity_decimals
        )));
    }

    Ok(per_slice)
}

/// Grid 범위 검증. 유효한 가격선 수를 반환한다.
pub fn validate_grid_range(
    lower_price: Decimal,
    upper_price: Decimal,
    line_count: &str,
) -> Result<usize, ValidationError> {
    if lower_price >= upper_price {
        return Err(ValidationError::InvalidGridRange(format!(
            "Lower price ({}) must be less than upper price ({})",
            lower_price, upper_price
        )));
    }

    let count = line_count.trim().parse::<usize>().map_err(|_| {
        ValidationError::InvalidGridRange(format!("Grid count '{}'. Must be an integer", line_count.trim()))
    })?;

    if count < 2 {
        return Err(ValidationError::InvalidGridRange(format!(
            "Grid count {}. Grid count must be at least 2",
            count
        )));
    }
    if count > MAX_GRID_LINES {
        return Err(ValidationError::InvalidGridRange(format!(
            "Grid count {}. Grid count must not exceed {}",
            count, MAX_GRID_LINES
        )));
    }

    Ok(count)
}

/// 분할 1회 수량 (지정 자릿수에서 절사)
pub(crate) fn slice_quantity(total_quantity: Decimal, slice_count: usize, quantity_decimals: u32) -> Decimal {
    truncate_quantity(total_quantity / Decimal::from(slice_count), quantity_decimals)
}

/// 일반 표기와 지수 표기를 모두 허용 (자릿수 구분자 `_` 는 거부)
fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();
    if value.is_empty() || value.contains('_') {
        return None;
    }
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}
