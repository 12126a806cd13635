/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use thiserror::Error;

/// 주문 전송 전에 발생하는 입력 검증 오류
///
/// 어떤 변형이든 명령 전체를 거부하며, 거래소와의 통신은 일어나지 않는다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Invalid side: {0}")]
    InvalidSide(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid price relationship: {0}")]
    InvalidPriceRelationship(String),

    #[error("Invalid slice count: {0}")]
    InvalidSliceCount(String),

    #[error("Invalid grid range: {0}")]
    InvalidGridRange(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),
}

/// 개별 주문 전송 실패. 해당 주문에만 국한된다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SubmitError {
    /// HTTP 상태 코드 (전송 자체가 실패한 경우 None)
    pub status: Option<u16>,
    /// 거래소 오류 코드
    pub code: Option<i64>,
    pub message: String,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        SubmitError { status: None, code: None, message: message.into() }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    /// 로그와 출력에 쓰이는 사유 문자열
    pub fn reason(&self) -> String {
        match (self.status, self.code) {
            (Some(status), Some(code)) => format!("API Error: {} (http {}, code {})", self.message, status, code),
            (Some(status), None) => format!("API Error: {} (http {})", self.message, status),
            (None, Some(code)) => format!("API Error: {} (code {})", self.message, code),
            (None, None) => format!("Request Error: {}", self.message),
        }
    }
}

#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Exchange error: {0}")]
    ExchangeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_error_reason() {
        let err = SubmitError::new("Filter failure: NOTIONAL").with_status(400).with_code(-1013);
        assert_eq!(err.reason(), "API Error: Filter failure: NOTIONAL (http 400, code -1013)");

        let err = SubmitError::new("connection refused");
        assert_eq!(err.reason(), "Request Error: connection refused");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: TradingError = ValidationError::InvalidSide("HOLD".into()).into();
        assert!(matches!(err, TradingError::Validation(ValidationError::InvalidSide(_))));
        assert_eq!(err.to_string(), "Validation error: Invalid side: HOLD");
    }
}
