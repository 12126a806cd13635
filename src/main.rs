/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description: Binance SPOT CLI entry point
**/

use std::future::pending;
use std::process::ExitCode;

use clap::Parser;

use xspot::cli::{exit_code, Cli, EXIT_ERROR};
use xspot::config::{Config, LoggingConfig, DEFAULT_CONFIG_PATH};
use xspot::core::{planner, Executor};
use xspot::exchange::{BinanceSpotExchange, DryRunExchange, Exchange};
use xspot::models::execution::{ExecutionReport, OutcomeResult};
use xspot::models::plan::{PlanKind, StrategyPlan};
use xspot::order_core::validator::validate;
use xspot::utils::logging;
use xspot::utils::{current_timestamp_ms, format_timestamp};
use xspot::utils::math::mid_price;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("Unexpected error: {:#}", e);
            eprintln!("\nError: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, anyhow::Error> {
    // 설정 로드
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            // 설정 없이 기본 로거로 오류를 남긴다
            let _ = logging::init(&LoggingConfig::default());
            let source = cli.config.as_ref().map(|p| p.display().to_string());
            logging::log_error(&format!("loading config {}", source.as_deref().unwrap_or(DEFAULT_CONFIG_PATH)), &e);
            eprintln!("\nConfiguration Error: {}", e);
            return Ok(ExitCode::from(EXIT_ERROR));
        }
    };
    if cli.dry_run {
        config.exchange.dry_run = true;
    }

    // 로깅 초기화
    logging::init(&config.logging)?;
    for warning in config.warnings() {
        log::warn!("{}", warning);
    }
    log::info!("xspot {} - CLI command received: {}", xspot::VERSION, cli.command.name());

    // 검증 및 계획 (거래소 접속 전)
    let rules = config.strategy.validation_rules();
    let plan = match validate(&cli.command, &rules, config.strategy.twap_slices)
        .and_then(|validated| planner::plan(&validated, &config.strategy))
    {
        Ok(plan) => plan,
        Err(e) => {
            logging::log_validation_failure(cli.command.name(), &e);
            eprintln!("\nValidation Error: {}", e);
            return Ok(ExitCode::from(exit_code(Err(&e), None)));
        }
    };

    print_plan(&plan);

    let mut exchange = match connect(&config).await {
        Ok(exchange) => exchange,
        Err(e) => {
            logging::log_error("exchange setup", &e);
            eprintln!("\nConfiguration Error: {}", e);
            return Ok(ExitCode::from(exit_code(Ok(()), None)));
        }
    };

    let strategy_name = cli.command.name();
    let symbol = plan.requests().first().map(|r| r.symbol.clone()).unwrap_or_default();
    logging::log_strategy_start(strategy_name, &symbol, plan.len());

    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            pending::<()>().await;
        }
    };
    let report = Executor::execute_until(&plan, exchange.as_mut(), interrupt).await;

    print_report(&report);
    logging::log_strategy_end(strategy_name, &symbol, &report);

    if report.cancelled {
        log::info!("Operation cancelled by user");
        println!("\nOperation cancelled by user");
    }

    Ok(ExitCode::from(exit_code(Ok(()), Some(&report))))
}

/// 설정에 맞는 거래소 연결 생성
async fn connect(config: &Config) -> xspot::Result<Box<dyn Exchange>> {
    if config.exchange.dry_run {
        log::info!("Dry-run mode: orders will not be sent");
        return Ok(Box::new(DryRunExchange::new()));
    }

    let mut exchange = BinanceSpotExchange::from_config(config)?;
    if let Err(e) = exchange.sync_time().await {
        log::warn!("Could not sync time with server: {}", e);
    }
    log::info!("{} client initialized: {}", config.exchange.name, config.exchange.base_url);

    Ok(Box::new(exchange))
}

fn print_plan(plan: &StrategyPlan) {
    let Some(first) = plan.requests().first() else {
        return;
    };

    match plan.kind() {
        PlanKind::Single => {
            println!("\nPlacing {} order...", first.order_type);
            println!("   Symbol:       {}", first.symbol);
            println!("   Side:         {}", first.side);
            println!("   Quantity:     {}", first.quantity);
            if let Some(stop) = first.stop_price {
                println!("   Stop Price:   {}", stop);
            }
            if let Some(price) = first.effective_price() {
                println!("   Limit Price:  {}", price);
            }
        }
        PlanKind::Twap => {
            let total: rust_decimal::Decimal = plan.requests().iter().map(|r| r.quantity).sum();
            println!("\nStarting TWAP Strategy...");
            println!("   Symbol:         {}", first.symbol);
            println!("   Side:           {}", first.side);
            println!("   Total Quantity: {}", total);
            println!("   Slices:         {}", plan.len());
            println!("   Quantity/Slice: {}", first.quantity);
            println!("   Interval:       {}s", plan.delay().as_secs());
            let remaining_ms = i64::try_from(plan.estimated_duration().as_millis()).unwrap_or(i64::MAX);
            let eta = current_timestamp_ms().saturating_add(remaining_ms);
            println!(
                "\n   Estimated completion: {}s (~{} UTC)",
                plan.estimated_duration().as_secs(),
                format_timestamp(eta, "%H:%M:%S")
            );
        }
        PlanKind::Grid => {
            let prices: Vec<String> = plan
                .requests()
                .iter()
                .filter_map(|r| r.price.map(|p| p.to_string()))
                .collect();
            let lower = first.price.unwrap_or_default();
            let upper = plan.requests().last().and_then(|r| r.price).unwrap_or_default();
            println!("\nStarting Grid Strategy...");
            println!("   Symbol:       {}", first.symbol);
            println!("   Price Range:  {} - {}", lower, upper);
            println!("   Grid Levels:  {}", plan.len());
            println!("   Quantity:     {}", first.quantity);
            println!("   Mid Price:    {}", mid_price(lower, upper).round_dp(2));
            println!("\n   Grid Levels: [{}]", prices.join(", "));
        }
    }
    println!("{}", "-".repeat(50));
}

fn print_report(report: &ExecutionReport) {
    let total = report.planned;
    for (i, outcome) in report.outcomes.iter().enumerate() {
        match &outcome.result {
            OutcomeResult::Accepted(ack) => {
                let status = ack.status.as_ref().map(|s| format!(", Status: {}", s)).unwrap_or_default();
                println!("   [{}/{}] {} ✅ Order ID: {}{}", i + 1, total, outcome.request, ack.order_id, status);
            }
            OutcomeResult::Rejected { reason } => {
                println!("   [{}/{}] {} ❌ Failed - {}", i + 1, total, outcome.request, reason);
            }
        }
    }

    println!("\n{}", "=".repeat(50));
    println!("{}", report.summary());
    println!("{}", "=".repeat(50));
}
