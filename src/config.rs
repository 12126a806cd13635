/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::TradingError;
use crate::order_core::validator::{StopLimitRule, ValidationRules};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const SPOT_TESTNET_URL: &str = "https://testnet.binance.vision";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub logging: LoggingConfig,
    pub strategy: StrategyConfig,
    /// 로깅 초기화 전에 발생한 설정 경고
    #[serde(skip)]
    warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub name: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub base_url: String,
    /// 서명 요청의 recvWindow (밀리초)
    pub recv_window_ms: u64,
    /// 요청 타임아웃 (밀리초)
    pub timeout_ms: u64,
    /// true 이면 주문을 거래소로 보내지 않는다
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// TWAP 기본 분할 수
    pub twap_slices: usize,
    /// 수량 소수 자릿수
    pub quantity_decimals: u32,
    /// 가격 소수 자릿수
    pub price_decimals: u32,
    pub stop_limit_rule: StopLimitRule,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        ExchangeConfig {
            name: "Binance Spot Testnet".to_string(),
            api_key: None,
            api_secret: None,
            base_url: SPOT_TESTNET_URL.to_string(),
            recv_window_ms: 60_000,
            timeout_ms: 10_000,
            dry_run: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file_path: None,
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            twap_slices: 5,
            quantity_decimals: 8,
            price_decimals: 2,
            stop_limit_rule: StopLimitRule::Conventional,
        }
    }
}

impl StrategyConfig {
    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            stop_limit_rule: self.stop_limit_rule,
            quantity_decimals: self.quantity_decimals,
        }
    }
}

impl Config {
    /// Load configuration from `config.json` in the working directory, falling back to defaults
    pub fn load() -> Result<Self, TradingError> {
        let config_path = Path::new(DEFAULT_CONFIG_PATH);

        let mut cfg = if config_path.exists() {
            Self::read_file(config_path)?
        } else {
            Config::default()
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Load configuration from an explicit path; the file must exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, TradingError> {
        let mut cfg = Self::read_file(path.as_ref())?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn read_file(path: &Path) -> Result<Self, TradingError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Ok(serde_json::from_str(&contents)?)
    }

    /// Apply environment variable overrides for sensitive/runtime fields
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |keys: &[&str]| keys.iter().filter_map(|k| lookup(k)).find(|v| !v.is_empty());

        if let Some(v) = get(&["EXCHANGE_API_KEY", "API_KEY"]) { self.exchange.api_key = Some(v); }
        if let Some(v) = get(&["EXCHANGE_API_SECRET", "API_SECRET"]) { self.exchange.api_secret = Some(v); }
        if let Some(v) = get(&["EXCHANGE_BASE_URL"]) { self.exchange.base_url = v; }
        if let Some(v) = get(&["DRY_RUN"]) {
            let lower = v.to_lowercase();
            if ["1", "true", "yes"].contains(&lower.as_str()) { self.exchange.dry_run = true; }
            if ["0", "false", "no"].contains(&lower.as_str()) { self.exchange.dry_run = false; }
        }
        if let Some(v) = get(&["LOG_LEVEL"]) { self.logging.level = v; }
        if let Some(v) = get(&["LOG_FILE"]) { self.logging.file_path = Some(v); }
        if let Some(v) = get(&["TWAP_SLICES"]) {
            match v.parse::<usize>() {
                Ok(n) => self.strategy.twap_slices = n,
                Err(_) => self.warnings.push(format!("Ignoring TWAP_SLICES={}: not an integer", v)),
            }
        }
        if let Some(v) = get(&["STOP_LIMIT_RULE"]) {
            match v.parse::<StopLimitRule>() {
                Ok(rule) => self.strategy.stop_limit_rule = rule,
                Err(e) => self.warnings.push(format!("Ignoring STOP_LIMIT_RULE={}: {}", v, e)),
            }
        }
    }

    /// 로딩 중 무시된 값에 대한 경고 (로거가 준비된 뒤 출력)
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// API 자격 증명 반환 (실주문 모드에서만 필요)
    pub fn credentials(&self) -> Result<(&str, &str), TradingError> {
        let key = self.exchange.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            TradingError::ConfigError("API_KEY is not set. Please set API_KEY with your Binance SPOT API key".to_string())
        })?;
        let secret = self.exchange.api_secret.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| {
            TradingError::ConfigError("API_SECRET is not set. Please set API_SECRET with your Binance SPOT API secret".to_string())
        })?;
        Ok((key, secret))
    }
}
