//! 로깅 유틸리티
//!
//! 로그 초기화 및 주문 이벤트 로그 함수 제공

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::fs::OpenOptions;

use crate::config::LoggingConfig;
use crate::error::{TradingError, ValidationError};
use crate::models::execution::ExecutionReport;
use crate::models::order::{OrderAck, OrderRequest};

/// 로깅 시스템 초기화
///
/// `RUST_LOG` 가 설정되어 있으면 설정 파일의 레벨보다 우선한다.
/// `file_path` 가 있으면 로그를 해당 파일에 이어 쓴다.
pub fn init(config: &LoggingConfig) -> Result<(), TradingError> {
    let mut builder = Builder::new();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());
    let level_filter = parse_level(&log_level);

    builder
        .filter_level(level_filter)
        .format_timestamp_millis();

    if let Some(path) = &config.file_path {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| TradingError::ConfigError(format!("Failed to open log file {}: {}", path, e)))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|e| TradingError::ConfigError(format!("Failed to initialise logger: {}", e)))?;

    log::info!("Logging initialised: level = {}", log_level);

    Ok(())
}

/// 로그 레벨 파싱 (알 수 없는 값은 info)
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 전략 시작 로그
pub fn log_strategy_start(strategy_name: &str, symbol: &str, orders: usize) {
    log::info!("Strategy start: {} - symbol: {} - orders: {}", strategy_name, symbol, orders);
}

/// 전략 종료 로그
pub fn log_strategy_end(strategy_name: &str, symbol: &str, report: &ExecutionReport) {
    log::info!(
        "Strategy end: {} - symbol: {} - success: {} - failed: {} - filled: {}{}",
        strategy_name,
        symbol,
        report.accepted_count(),
        report.rejected_count(),
        report.filled_quantity().normalize(),
        if report.cancelled { " - cancelled" } else { "" }
    );
}

/// 주문 제출 시도 로그
pub fn log_order_attempt(index: usize, total: usize, request: &OrderRequest) {
    log::info!("Order [{}/{}] placing: {}", index, total, request);
}

/// 주문 접수 로그
pub fn log_order_accepted(request: &OrderRequest, ack: &OrderAck) {
    match &ack.status {
        Some(status) => log::info!("Order accepted: {} - orderId: {} - status: {}", request.symbol, ack.order_id, status),
        None => log::info!("Order accepted: {} - orderId: {}", request.symbol, ack.order_id),
    }
}

/// 주문 거부 로그
pub fn log_order_rejected(request: &OrderRequest, reason: &str) {
    log::error!("Order rejected: {} - reason: {}", request, reason);
}

/// 검증 실패 로그
pub fn log_validation_failure(command: &str, error: &ValidationError) {
    log::error!("Validation failed - {}: {}", command, error);
}

/// 오류 로그
pub fn log_error(context: &str, error: &TradingError) {
    log::error!("Error - {}: {}", context, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }
}
