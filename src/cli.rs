//! 명령줄 인터페이스 정의
//!
//! 값은 문자열 그대로 받아 검증기에서 구체적인 오류를 만든다.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::error::ValidationError;
use crate::models::execution::ExecutionReport;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_VALIDATION: u8 = 2;
pub const EXIT_INTERRUPTED: u8 = 130;

#[derive(Debug, Parser)]
#[command(
    name = "xspot",
    version,
    about = "Binance SPOT CLI Trading Bot",
    after_help = "Examples:\n  \
        xspot market BTCUSDT BUY 0.001\n  \
        xspot limit BTCUSDT SELL 0.001 50000\n  \
        xspot stop-limit BTCUSDT BUY 0.001 43000 43100\n  \
        xspot twap BTCUSDT BUY 0.005 10\n  \
        xspot grid BTCUSDT 40000 50000 5 0.001"
)]
pub struct Cli {
    /// Path to a JSON configuration file (defaults to ./config.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Validate and plan orders without sending them to the exchange
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Place a market order
    Market(MarketArgs),
    /// Place a limit order
    Limit(LimitArgs),
    /// Place a stop-limit order
    #[command(name = "stop-limit")]
    StopLimit(StopLimitArgs),
    /// Split a market order into equal slices sent at a fixed interval
    Twap(TwapArgs),
    /// Place limit orders on evenly spaced price levels
    Grid(GridArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Market(_) => "market",
            Command::Limit(_) => "limit",
            Command::StopLimit(_) => "stop-limit",
            Command::Twap(_) => "twap",
            Command::Grid(_) => "grid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct MarketArgs {
    /// Trading pair (e.g., BTCUSDT)
    pub symbol: String,
    /// Order side: BUY or SELL
    pub side: String,
    /// Order quantity
    #[arg(allow_hyphen_values = true)]
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct LimitArgs {
    pub symbol: String,
    pub side: String,
    #[arg(allow_hyphen_values = true)]
    pub quantity: String,
    /// Limit price
    #[arg(allow_hyphen_values = true)]
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct StopLimitArgs {
    pub symbol: String,
    pub side: String,
    #[arg(allow_hyphen_values = true)]
    pub quantity: String,
    /// Stop trigger price
    #[arg(allow_hyphen_values = true)]
    pub stop_price: String,
    /// Limit price after trigger
    #[arg(allow_hyphen_values = true)]
    pub limit_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct TwapArgs {
    pub symbol: String,
    pub side: String,
    /// Total quantity to trade
    #[arg(allow_hyphen_values = true)]
    pub total_quantity: String,
    /// Seconds between each slice
    #[arg(allow_hyphen_values = true)]
    pub interval_seconds: String,
    /// Number of slices (defaults to strategy.twap_slices)
    #[arg(long)]
    pub slices: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct GridArgs {
    pub symbol: String,
    /// Lower bound of the price range
    #[arg(allow_hyphen_values = true)]
    pub lower_price: String,
    /// Upper bound of the price range
    #[arg(allow_hyphen_values = true)]
    pub upper_price: String,
    /// Number of grid levels
    #[arg(allow_hyphen_values = true)]
    pub line_count: String,
    /// Quantity per grid level
    #[arg(allow_hyphen_values = true)]
    pub quantity_per_line: String,
}

/// 프로세스 종료 코드 선택
///
/// 검증 실패는 2, 실행되지 못한 계획(설정/연결 오류)은 1, Ctrl-C 중단은 130.
/// 계획이 끝까지 실행되었다면 거부된 주문이 있어도 0 이다.
pub fn exit_code(validation: Result<(), &ValidationError>, report: Option<&ExecutionReport>) -> u8 {
    match (validation, report) {
        (Err(_), _) => EXIT_VALIDATION,
        (Ok(()), None) => EXIT_ERROR,
        (Ok(()), Some(report)) if report.cancelled => EXIT_INTERRUPTED,
        (Ok(()), Some(_)) => EXIT_SUCCESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::execution::ExecutionOutcome;
    use crate::models::order::{OrderRequest, OrderSide, OrderType};
    use rust_decimal_macros::dec;

    fn report_with_rejection() -> ExecutionReport {
        let mut report = ExecutionReport::new(2);
        let request = OrderRequest::new("BTCUSDT", OrderSide::Buy, OrderType::Market, dec!(0.001));
        report.push(ExecutionOutcome::rejected(request.clone(), "insufficient balance"));
        report.push(ExecutionOutcome::rejected(request, "insufficient balance"));
        report
    }

    #[test]
    fn test_exit_code_policy() {
        let invalid = ValidationError::InvalidSide("HOLD".into());
        assert_eq!(exit_code(Err(&invalid), None), 2);
        assert_eq!(exit_code(Ok(()), None), 1);
        assert_eq!(exit_code(Ok(()), Some(&ExecutionReport::new(0))), 0);

        // 모든 주문이 거부되어도 계획은 실행되었다
        assert_eq!(exit_code(Ok(()), Some(&report_with_rejection())), 0);

        let mut cancelled = report_with_rejection();
        cancelled.cancelled = true;
        assert_eq!(exit_code(Ok(()), Some(&cancelled)), 130);
    }

    #[test]
    fn test_parse_stop_limit() {
        let cli = Cli::try_parse_from(["xspot", "stop-limit", "BTCUSDT", "buy", "0.001", "43000", "43100"]).unwrap();
        assert!(!cli.dry_run);
        match cli.command {
            Command::StopLimit(args) => {
                assert_eq!(args.side, "buy");
                assert_eq!(args.stop_price, "43000");
                assert_eq!(args.limit_price, "43100");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_values_reach_validator() {
        let cli = Cli::try_parse_from(["xspot", "market", "BTCUSDT", "BUY", "-1"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Market(MarketArgs { symbol: "BTCUSDT".into(), side: "BUY".into(), quantity: "-1".into() })
        );
    }

    #[test]
    fn test_twap_slices_and_global_flags() {
        let cli = Cli::try_parse_from(["xspot", "twap", "BTCUSDT", "BUY", "0.005", "10", "--slices", "4", "--dry-run"]).unwrap();
        assert!(cli.dry_run);
        match cli.command {
            Command::Twap(args) => assert_eq!(args.slices, Some(4)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_subcommand_fails() {
        assert!(Cli::try_parse_from(["xspot"]).is_err());
    }
}
