//! Grid 주문 분할기
//!
//! 가격 구간을 균등하게 나누어 가격선마다 지정가 주문을 하나씩 만든다.
//! 중간 가격보다 낮은 가격선은 매수, 같거나 높은 가격선은 매도.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::order::{OrderRequest, OrderSide, OrderType};
use crate::models::plan::StrategyPlan;
use crate::order_core::builder::DEFAULT_TIME_IN_FORCE;
use crate::order_core::validator::MAX_GRID_LINES;
use crate::utils::math::{evenly_spaced, mid_price, round_price};

#[derive(Debug, Clone)]
pub struct GridSplitter {
    symbol: String,
    lower_price: Decimal,
    upper_price: Decimal,
    line_count: usize,
    quantity_per_line: Decimal,
    price_decimals: u32,
}

impl GridSplitter {
    pub fn new(
        symbol: impl Into<String>,
        lower_price: Decimal,
        upper_price: Decimal,
        line_count: usize,
        quantity_per_line: Decimal,
    ) -> Self {
        GridSplitter {
            symbol: symbol.into(),
            lower_price,
            upper_price,
            line_count,
            quantity_per_line,
            price_decimals: 2,
        }
    }

    pub fn with_price_decimals(mut self, price_decimals: u32) -> Self {
        self.price_decimals = price_decimals;
        self
    }

    pub fn mid_price(&self) -> Decimal {
        mid_price(self.lower_price, self.upper_price)
    }

    /// 가격선 계산
    ///
    /// 자릿수 반올림 뒤에도 가격선이 양수이고 서로 달라야 한다.
    pub fn levels(&self) -> Result<Vec<Decimal>, ValidationError> {
        if self.lower_price >= self.upper_price {
            return Err(ValidationError::InvalidGridRange(format!(
                "Lower price ({}) must be less than upper price ({})",
                self.lower_price, self.upper_price
            )));
        }

        if !(2..=MAX_GRID_LINES).contains(&self.line_count) {
            return Err(ValidationError::InvalidGridRange(format!(
                "Grid count {}. Grid count must be between 2 and {}",
                self.line_count, MAX_GRID_LINES
            )));
        }

        let levels: Vec<Decimal> = evenly_spaced(self.lower_price, self.upper_price, self.line_count)
            .ok_or_else(|| {
                ValidationError::InvalidGridRange(format!(
                    "Grid levels for [{}, {}] are out of range",
                    self.lower_price, self.upper_price
                ))
            })?
            .into_iter()
            .map(|price| round_price(price, self.price_decimals))
            .collect();

        let distinct = levels.windows(2).all(|pair| pair[0] < pair[1]);
        if levels[0] <= Decimal::ZERO || !distinct {
            return Err(ValidationError::InvalidGridRange(format!(
                "Grid spacing for {} lines in [{}, {}] is finer than {} price decimals",
                self.line_count, self.lower_price, self.upper_price, self.price_decimals
            )));
        }

        Ok(levels)
    }

    /// 가격선의 주문 방향
    pub fn side_for(&self, price: Decimal) -> OrderSide {
        if price < self.mid_price() {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }

    /// 실행 계획 생성
    pub fn plan(&self) -> Result<StrategyPlan, ValidationError> {
        if self.quantity_per_line <= Decimal::ZERO {
            return Err(ValidationError::InvalidQuantity(format!(
                "{}. Quantity must be greater than 0",
                self.quantity_per_line
            )));
        }

        let requests = self
            .levels()?
            .into_iter()
            .map(|price| {
                OrderRequest::new(self.symbol.clone(), self.side_for(price), OrderType::Limit, self.quantity_per_line)
                    .with_price(price)
                    .with_time_in_force(DEFAULT_TIME_IN_FORCE)
            })
            .collect();

        Ok(StrategyPlan::grid(requests))
    }
}

/// 가격 사다리 계획 생성
pub fn plan_grid(
    symbol: &str,
    lower_price: Decimal,
    upper_price: Decimal,
    line_count: usize,
    quantity_per_line: Decimal,
    price_decimals: u32,
) -> Result<StrategyPlan, ValidationError> {
    GridSplitter::new(symbol, lower_price, upper_price, line_count, quantity_per_line)
        .with_price_decimals(price_decimals)
        .plan()
}
