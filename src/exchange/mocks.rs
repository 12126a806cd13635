use std::collections::HashSet;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::SubmitError;
use crate::exchange::traits::Exchange;
use crate::models::order::{OrderAck, OrderId, OrderRequest, OrderStatus, OrderType};

/// A mock implementation of the Exchange trait for testing and development
///
/// Records every order it receives, with the (tokio) instant it arrived, and rejects the
/// submissions whose 1-based call numbers were scripted with `reject_calls`.
#[derive(Debug, Default)]
pub struct MockExchange {
    submitted: Vec<OrderRequest>,
    submitted_at: Vec<Instant>,
    reject_calls: HashSet<usize>,
    order_id_counter: u64,
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the given submission attempts (1-based)
    pub fn reject_calls(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.reject_calls.extend(calls);
        self
    }

    pub fn submitted(&self) -> &[OrderRequest] {
        &self.submitted
    }

    pub fn submitted_at(&self) -> &[Instant] {
        &self.submitted_at
    }

    fn generate_order_id(&mut self) -> OrderId {
        self.order_id_counter += 1;
        OrderId(format!("mock-{}", self.order_id_counter))
    }
}

#[async_trait]
impl Exchange for MockExchange {
    async fn submit_order(&mut self, order: OrderRequest) -> Result<OrderAck, SubmitError> {
        self.submitted.push(order.clone());
        self.submitted_at.push(Instant::now());
        let call = self.submitted.len();

        if self.reject_calls.contains(&call) {
            return Err(SubmitError::new(format!("mock rejection of call {}", call))
                .with_status(400)
                .with_code(-2010));
        }

        // Market orders fill immediately; resting orders stay open
        let (status, executed_qty) = match order.order_type {
            OrderType::Market => (OrderStatus::Filled, order.quantity),
            OrderType::Limit | OrderType::StopLimit => (OrderStatus::New, rust_decimal::Decimal::ZERO),
        };

        Ok(OrderAck {
            order_id: self.generate_order_id(),
            status: Some(status),
            executed_qty: Some(executed_qty),
        })
    }
}
