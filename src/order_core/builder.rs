//! 주문 요청 생성기
//!
//! 검증이 끝난 파라미터를 거래소 주문 요청 하나로 옮긴다. 실패하지 않는다.

use crate::models::order::{OrderRequest, OrderType};
use crate::order_core::validator::OrderParams;

/// 지정가 계열 주문의 기본 유효 기간 (Good Till Cancelled)
pub const DEFAULT_TIME_IN_FORCE: &str = "GTC";

pub fn build(order_type: OrderType, params: &OrderParams) -> OrderRequest {
    let request = OrderRequest::new(params.symbol.clone(), params.side, order_type, params.quantity);

    match order_type {
        OrderType::Market => request,
        OrderType::Limit => {
            let request = request.with_time_in_force(DEFAULT_TIME_IN_FORCE);
            match params.price {
                Some(price) => request.with_price(price),
                None => request,
            }
        }
        OrderType::StopLimit => {
            let mut request = request.with_time_in_force(DEFAULT_TIME_IN_FORCE);
            request.stop_price = params.stop_price;
            request.limit_price = params.limit_price;
            request
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::OrderSide;
    use rust_decimal_macros::dec;

    fn params() -> OrderParams {
        OrderParams {
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Sell,
            quantity: dec!(0.001),
            price: Some(dec!(50000)),
            stop_price: Some(dec!(43000)),
            limit_price: Some(dec!(42900)),
        }
    }

    #[test]
    fn test_build_market_drops_prices() {
        let order = build(OrderType::Market, &params());
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.quantity, dec!(0.001));
        assert_eq!(order.price, None);
        assert_eq!(order.stop_price, None);
        assert_eq!(order.time_in_force, None);
    }

    #[test]
    fn test_build_limit() {
        let order = build(OrderType::Limit, &params());
        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.price, Some(dec!(50000)));
        assert_eq!(order.limit_price, None);
        assert_eq!(order.time_in_force.as_deref(), Some("GTC"));
    }

    #[test]
    fn test_build_stop_limit() {
        let order = build(OrderType::StopLimit, &params());
        assert_eq!(order.price, None);
        assert_eq!(order.stop_price, Some(dec!(43000)));
        assert_eq!(order.limit_price, Some(dec!(42900)));
        assert_eq!(order.effective_price(), Some(dec!(42900)));
    }
}
