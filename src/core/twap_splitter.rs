/**
* filename : twap_splitter
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use rust_decimal::Decimal;
use std::time::Duration;

use crate::error::ValidationError;
use crate::models::order::{OrderRequest, OrderSide, OrderType};
use crate::models::plan::StrategyPlan;
use crate::order_core::validator::validate_slice_count;

/// TWAP 기반 주문 분할기
///
/// 총 수량을 같은 크기의 시장가 주문 N 개로 나누고, 주문 사이에 일정 간격을 둔다.
/// 마지막 분할이 절사 오차를 흡수하므로 분할 수량의 합은 항상 총 수량과 같다.
#[derive(Debug, Clone)]
pub struct TwapSplitter {
  /// 거래 심볼
  symbol: String,
  /// 주문 방향 (매수/매도)
  side: OrderSide,
  /// 총 주문 수량
  total_quantity: Decimal,
  /// 분할 수
  num_slices: usize,
  /// 주문 간격
  interval: Duration,
  /// 분할 수량 소수 자릿수
  quantity_decimals: u32,
}

impl TwapSplitter {
  /// 새 TWAP 분할기 생성
  pub fn new(
    symbol: impl Into<String>,
    side: OrderSide,
    total_quantity: Decimal,
    num_slices: usize,
    interval: Duration,
  ) -> Self {
    TwapSplitter {
      symbol: symbol.into(),
      side,
      total_quantity,
      num_slices,
      interval,
      quantity_decimals: 8,
    }
  }

  pub fn with_quantity_decimals(mut self, quantity_decimals: u32) -> Self {
    self.quantity_decimals = quantity_decimals;
    self
  }

  /// 분할별 수량 계산 (마지막 분할에서 절사 오차 처리)
  pub fn slice_quantities(&self) -> Result<Vec<Decimal>, ValidationError> {
    let slice_quantity = validate_slice_count(self.total_quantity, self.num_slices, self.quantity_decimals)?;

    let mut quantities = vec![slice_quantity; self.num_slices - 1];
    let allocated = slice_quantity * Decimal::from(self.num_slices - 1);
    quantities.push(self.total_quantity - allocated);

    Ok(quantities)
  }

  /// 실행 계획 생성
  pub fn plan(&self) -> Result<StrategyPlan, ValidationError> {
    let requests = self
      .slice_quantities()?
      .into_iter()
      .map(|quantity| OrderRequest::new(self.symbol.clone(), self.side, OrderType::Market, quantity))
      .collect();

    Ok(StrategyPlan::twap(requests, self.interval))
  }
}

/// 시간 분할 계획 생성
pub fn plan_twap(
  symbol: &str,
  side: OrderSide,
  total_quantity: Decimal,
  slice_count: usize,
  interval: Duration,
  quantity_decimals: u32,
) -> Result<StrategyPlan, ValidationError> {
  TwapSplitter::new(symbol, side, total_quantity, slice_count, interval)
    .with_quantity_decimals(quantity_decimals)
    .plan()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::plan::PlanKind;
  use rust_decimal_macros::dec;

  #[test]
  fn test_twap_even_split() {
    let plan = plan_twap("BTCUSDT", OrderSide::Buy, dec!(0.005), 5, Duration::from_secs(10), 8).unwrap();

    assert_eq!(plan.kind(), PlanKind::Twap);
    assert_eq!(plan.len(), 5);
    assert_eq!(plan.delay(), Duration::from_secs(10));
    for request in plan.requests() {
      assert_eq!(request.order_type, OrderType::Market);
      assert_eq!(request.side, OrderSide::Buy);
      assert_eq!(request.quantity, dec!(0.001));
    }
    let total: Decimal = plan.requests().iter().map(|r| r.quantity).sum();
    assert_eq!(total, dec!(0.005));
  }

  #[test]
  fn test_last_slice_absorbs_remainder() {
    // 1 / 3 = 0.33333333 (8자리 절사), 마지막은 0.33333334
    let splitter = TwapSplitter::new("BTCUSDT", OrderSide::Sell, dec!(1), 3, Duration::from_secs(1));
    let quantities = splitter.slice_quantities().unwrap();

    assert_eq!(quantities, vec![dec!(0.33333333), dec!(0.33333333), dec!(0.33333334)]);
    assert_eq!(quantities.iter().copied().sum::<Decimal>(), dec!(1));
  }

  #[test]
  fn test_single_slice() {
    let plan = plan_twap("ETHUSDT", OrderSide::Buy, dec!(0.7), 1, Duration::from_secs(30), 8).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.requests()[0].quantity, dec!(0.7));
    assert_eq!(plan.estimated_duration(), Duration::ZERO);
  }

  #[test]
  fn test_invalid_slice_count() {
    let err = plan_twap("BTCUSDT", OrderSide::Buy, dec!(0.005), 0, Duration::from_secs(10), 8).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidSliceCount(_)));

    let err = plan_twap("BTCUSDT", OrderSide::Buy, dec!(0.00000004), 5, Duration::from_secs(10), 8).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidSliceCount(_)));
  }

  #[test]
  fn test_plan_is_deterministic() {
    let a = plan_twap("BTCUSDT", OrderSide::Buy, dec!(0.01), 3, Duration::from_secs(5), 8).unwrap();
    let b = plan_twap("BTCUSDT", OrderSide::Buy, dec!(0.01), 3, Duration::from_secs(5), 8).unwrap();
    assert_eq!(a, b);
  }
}
