//! 검증된 명령을 실행 계획으로 변환

use crate::config::StrategyConfig;
use crate::core::grid_splitter::plan_grid;
use crate::core::twap_splitter::plan_twap;
use crate::error::ValidationError;
use crate::models::plan::StrategyPlan;
use crate::order_core::builder;
use crate::order_core::validator::ValidatedCommand;

pub fn plan(command: &ValidatedCommand, config: &StrategyConfig) -> Result<StrategyPlan, ValidationError> {
    match command {
        ValidatedCommand::Order { order_type, params } => Ok(StrategyPlan::single(builder::build(*order_type, params))),
        ValidatedCommand::Twap(p) => plan_twap(
            &p.symbol,
            p.side,
            p.total_quantity,
            p.slice_count,
            p.interval,
            config.quantity_decimals,
        ),
        ValidatedCommand::Grid(p) => plan_grid(
            &p.symbol,
            p.lower_price,
            p.upper_price,
            p.line_count,
            p.quantity_per_line,
            config.price_decimals,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{OrderSide, OrderType};
    use crate::models::plan::PlanKind;
    use crate::order_core::validator::{GridParams, OrderParams, TwapParams};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn test_single_order_plan() {
        let command = ValidatedCommand::Order {
            order_type: OrderType::Limit,
            params: OrderParams {
                symbol: "BTCUSDT".into(),
                side: OrderSide::Sell,
                quantity: dec!(0.001),
                price: Some(dec!(50000)),
                stop_price: None,
                limit_price: None,
            },
        };
        let plan = plan(&command, &StrategyConfig::default()).unwrap();
        assert_eq!(plan.kind(), PlanKind::Single);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.requests()[0].price, Some(dec!(50000)));
    }

    #[test]
    fn test_twap_plan_uses_quantity_decimals() {
        let command = ValidatedCommand::Twap(TwapParams {
            symbol: "BTCUSDT".into(),
            side: OrderSide::Buy,
            total_quantity: dec!(1),
            slice_count: 3,
            interval: Duration::from_secs(1),
        });
        let config = StrategyConfig { quantity_decimals: 3, ..StrategyConfig::default() };
        let plan = plan(&command, &config).unwrap();
        let quantities: Vec<_> = plan.requests().iter().map(|r| r.quantity).collect();
        assert_eq!(quantities, vec![dec!(0.333), dec!(0.333), dec!(0.334)]);
    }

    #[test]
    fn test_grid_plan() {
        let command = ValidatedCommand::Grid(GridParams {
            symbol: "BTCUSDT".into(),
            lower_price: dec!(40000),
            upper_price: dec!(50000),
            line_count: 5,
            quantity_per_line: dec!(0.001),
        });
        let plan = plan(&command, &StrategyConfig::default()).unwrap();
        assert_eq!(plan.kind(), PlanKind::Grid);
        assert_eq!(plan.len(), 5);
    }
}
