use async_trait::async_trait;

use crate::error::{SubmitError, TradingError};
use crate::models::order::{OrderAck, OrderRequest};

/// The `Exchange` trait defines the interface the execution driver uses to place orders.
/// It is implemented by the Binance SPOT connector, the dry-run connector and test mocks.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Submit a new order to the exchange
    ///
    /// Any non-success response is reported as a `SubmitError` carrying the exchange's reason.
    async fn submit_order(&mut self, order: OrderRequest) -> Result<OrderAck, SubmitError>;

    /// Optional: sync server time for signed requests (default no-op)
    async fn sync_time(&mut self) -> Result<(), TradingError> { Ok(()) }
}
