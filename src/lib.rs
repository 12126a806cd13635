//! 바이낸스 현물 CLI 매매 라이브러리
//!
//! 명령 검증, 주문 요청 생성, TWAP / Grid 분할, 순차 실행을 제공합니다.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod exchange;
pub mod models;
pub mod order_core;
pub mod utils;

// 핵심 타입 재노출
pub use crate::error::{SubmitError, TradingError, ValidationError};
pub use crate::models::execution::{ExecutionOutcome, ExecutionReport, OutcomeResult};
pub use crate::models::order::{OrderAck, OrderId, OrderRequest, OrderSide, OrderStatus, OrderType};
pub use crate::models::plan::{PlanKind, StrategyPlan};
pub use crate::exchange::traits::Exchange;

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, TradingError>;
