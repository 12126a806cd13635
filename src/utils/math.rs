//! 수학 관련 유틸리티
//!
//! 수량/가격 자릿수 맞춤과 가격 구간 계산

use rust_decimal::{Decimal, RoundingStrategy};

/// 수량 단위 절사 (거래소 요구사항에 맞춰)
pub fn truncate_quantity(quantity: Decimal, decimals: u32) -> Decimal {
  quantity.round_dp_with_strategy(decimals, RoundingStrategy::ToZero)
}

/// 가격 단위 반올림
pub fn round_price(price: Decimal, decimals: u32) -> Decimal {
  price.round_dp(decimals)
}

/// 두 가격의 중간값
///
/// 합을 먼저 구하지 않으므로 `Decimal::MAX` 근처에서도 넘치지 않는다 (lower <= upper).
pub fn mid_price(lower: Decimal, upper: Decimal) -> Decimal {
  lower + (upper - lower) / Decimal::TWO
}

/// 구간 [lower, upper] 의 균등 분할점 (양 끝 포함)
///
/// `count` 가 2 미만이거나 계산이 넘치면 None
pub fn evenly_spaced(lower: Decimal, upper: Decimal, count: usize) -> Option<Vec<Decimal>> {
  if count < 2 {
    return None;
  }

  let step = upper.checked_sub(lower)?.checked_div(Decimal::from(count - 1))?;
  let points = (0..count - 1)
    .map(|i| step.checked_mul(Decimal::from(i)).and_then(|offset| lower.checked_add(offset)))
    .chain(std::iter::once(Some(upper)))
    .collect::<Option<Vec<_>>>()?;

  Some(points)
}
