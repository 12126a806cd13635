use async_trait::async_trait;

use crate::error::SubmitError;
use crate::exchange::traits::Exchange;
use crate::models::order::{OrderAck, OrderId, OrderRequest};
use crate::utils::current_timestamp_ms;

/// A no-op exchange connector that accepts orders without sending them
pub struct DryRunExchange {
  counter: u64,
}

impl DryRunExchange {
  pub fn new() -> Self { Self { counter: 0 } }
}

impl Default for DryRunExchange {
  fn default() -> Self { Self::new() }
}

#[async_trait]
impl Exchange for DryRunExchange {
  async fn submit_order(&mut self, order: OrderRequest) -> Result<OrderAck, SubmitError> {
    self.counter += 1;
    log::info!("[dry-run] would submit: {}", order);
    let id = OrderId(format!("dry-{}-{}-{}", order.symbol, current_timestamp_ms(), self.counter));
    Ok(OrderAck::new(id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::order::{OrderSide, OrderType};
  use rust_decimal_macros::dec;

  #[tokio::test]
  async fn test_dry_run_accepts_with_unique_ids() {
    let mut exchange = DryRunExchange::new();
    let order = OrderRequest::new("BTCUSDT", OrderSide::Buy, OrderType::Market, dec!(0.001));

    let a = exchange.submit_order(order.clone()).await.unwrap();
    let b = exchange.submit_order(order).await.unwrap();

    assert!(a.order_id.0.starts_with("dry-BTCUSDT-"));
    assert_ne!(a.order_id, b.order_id);
  }
}
