//! 거래소 연결

pub mod binance_spot;
pub mod dry_run;
pub mod mocks;
pub mod traits;

pub use binance_spot::BinanceSpotExchange;
pub use dry_run::DryRunExchange;
pub use mocks::MockExchange;
pub use traits::Exchange;
