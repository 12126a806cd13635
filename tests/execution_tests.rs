//! 실행 통합 테스트
//!
//! 명령 검증부터 계획, 모의 거래소 제출까지 전체 흐름을 확인한다.

use std::time::Duration;

use rust_decimal_macros::dec;
use xspot::cli::{Command, GridArgs, LimitArgs, MarketArgs, StopLimitArgs, TwapArgs};
use xspot::config::StrategyConfig;
use xspot::core::{plan, Executor};
use xspot::exchange::MockExchange;
use xspot::order_core::validator::validate;
use xspot::{OrderSide, OrderType, OutcomeResult, PlanKind, StrategyPlan, ValidationError};

fn plan_command(command: &Command) -> Result<StrategyPlan, ValidationError> {
  let config = StrategyConfig::default();
  let validated = validate(command, &config.validation_rules(), config.twap_slices)?;
  plan(&validated, &config)
}

fn twap(total: &str, interval: &str) -> Command {
  Command::Twap(TwapArgs {
    symbol: "BTCUSDT".into(),
    side: "BUY".into(),
    total_quantity: total.into(),
    interval_seconds: interval.into(),
    slices: None,
  })
}

#[tokio::test]
async fn test_market_order_end_to_end() {
  let command = Command::Market(MarketArgs {
    symbol: "BTCUSDT".into(),
    side: "buy".into(),
    quantity: "0.001".into(),
  });
  let plan = plan_command(&command).unwrap();
  assert_eq!(plan.kind(), PlanKind::Single);

  let mut exchange = MockExchange::new();
  let report = Executor::execute(&plan, &mut exchange).await;

  assert_eq!(exchange.submitted().len(), 1);
  let sent = &exchange.submitted()[0];
  assert_eq!(sent.side, OrderSide::Buy);
  assert_eq!(sent.order_type, OrderType::Market);
  assert_eq!(sent.quantity, dec!(0.001));
  assert!(report.is_complete_success());
  assert_eq!(report.filled_quantity(), dec!(0.001));
}

#[tokio::test]
async fn test_limit_and_stop_limit_requests() {
  let limit = Command::Limit(LimitArgs {
    symbol: "ETHUSDT".into(),
    side: "SELL".into(),
    quantity: "0.5".into(),
    price: "3000".into(),
  });
  let stop_limit = Command::StopLimit(StopLimitArgs {
    symbol: "BTCUSDT".into(),
    side: "BUY".into(),
    quantity: "0.001".into(),
    stop_price: "43000".into(),
    limit_price: "43100".into(),
  });

  let limit_plan = plan_command(&limit).unwrap();
  let request = &limit_plan.requests()[0];
  assert_eq!(request.price, Some(dec!(3000)));
  assert_eq!(request.time_in_force.as_deref(), Some("GTC"));

  let stop_plan = plan_command(&stop_limit).unwrap();
  let request = &stop_plan.requests()[0];
  assert_eq!(request.order_type, OrderType::StopLimit);
  assert_eq!(request.stop_price, Some(dec!(43000)));
  assert_eq!(request.limit_price, Some(dec!(43100)));
}

#[tokio::test(start_paused = true)]
async fn test_twap_slices_are_spaced_by_interval() {
  let plan = plan_command(&twap("0.005", "10")).unwrap();
  assert_eq!(plan.len(), 5);

  let mut exchange = MockExchange::new();
  let report = Executor::execute(&plan, &mut exchange).await;

  assert!(report.is_complete_success());
  let times = exchange.submitted_at();
  assert_eq!(times.len(), 5);
  for pair in times.windows(2) {
    assert_eq!(pair[1] - pair[0], Duration::from_secs(10));
  }
  assert_eq!(times[4] - times[0], Duration::from_secs(40));

  let total: rust_decimal::Decimal = exchange.submitted().iter().map(|r| r.quantity).sum();
  assert_eq!(total, dec!(0.005));
  assert!(exchange.submitted().iter().all(|r| r.quantity == dec!(0.001)));
}

#[tokio::test(start_paused = true)]
async fn test_twap_rejected_slice_does_not_stop_remaining() {
  let plan = plan_command(&twap("0.005", "1")).unwrap();

  let mut exchange = MockExchange::new().reject_calls([3]);
  let report = Executor::execute(&plan, &mut exchange).await;

  assert_eq!(exchange.submitted().len(), 5);
  assert_eq!(report.accepted_count(), 4);
  assert_eq!(report.rejected_count(), 1);
  match &report.outcomes[2].result {
    OutcomeResult::Rejected { reason } => assert!(reason.contains("code -2010")),
    other => panic!("expected rejection, got {:?}", other),
  }
  assert!(!report.is_complete_success());
  assert_eq!(report.filled_quantity(), dec!(0.004));
}

#[tokio::test(start_paused = true)]
async fn test_twap_cancel_stops_between_slices() {
  let plan = plan_command(&twap("0.005", "10")).unwrap();

  let mut exchange = MockExchange::new();
  let cancel = tokio::time::sleep(Duration::from_secs(15));
  let report = Executor::execute_until(&plan, &mut exchange, cancel).await;

  assert!(report.cancelled);
  assert_eq!(exchange.submitted().len(), 2);
  assert_eq!(report.outcomes.len(), 2);
  assert!(report.summary().contains("3 order(s) not submitted"));
}

#[tokio::test]
async fn test_grid_end_to_end() {
  let command = Command::Grid(GridArgs {
    symbol: "BTCUSDT".into(),
    lower_price: "40000".into(),
    upper_price: "50000".into(),
    line_count: "5".into(),
    quantity_per_line: "0.001".into(),
  });
  let plan = plan_command(&command).unwrap();
  assert_eq!(plan.kind(), PlanKind::Grid);
  assert_eq!(plan.delay(), Duration::ZERO);

  let mut exchange = MockExchange::new();
  let report = Executor::execute(&plan, &mut exchange).await;

  let prices: Vec<_> = exchange.submitted().iter().filter_map(|r| r.price).collect();
  assert_eq!(prices, vec![dec!(40000), dec!(42500), dec!(45000), dec!(47500), dec!(50000)]);
  assert!(exchange.submitted().iter().all(|r| r.order_type == OrderType::Limit));
  assert_eq!(report.buy_count(), 2);
  assert_eq!(report.sell_count(), 3);
  assert_eq!(report.filled_quantity(), dec!(0));
}

#[test]
fn test_planning_is_deterministic() {
  let command = twap("1", "5");
  assert_eq!(plan_command(&command).unwrap(), plan_command(&command).unwrap());
}
