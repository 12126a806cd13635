//! 시간 관련 유틸리티
//!
//! 시간 변환, 포맷팅 함수 제공

pub mod logging;
pub mod math;

use chrono::{DateTime, TimeZone, Utc};

/// 타임스탬프(밀리초)를 DateTime<Utc>로 변환
pub fn timestamp_to_datetime(timestamp_ms: i64) -> DateTime<Utc> {
  Utc.timestamp_millis_opt(timestamp_ms).single().unwrap_or_default()
}

/// 현재 시간을 타임스탬프(밀리초)로 반환
pub fn current_timestamp_ms() -> i64 {
  Utc::now().timestamp_millis()
}

/// 타임스탬프(밀리초)를 포맷팅된 문자열로 변환
pub fn format_timestamp(timestamp_ms: i64, format: &str) -> String {
  let dt = timestamp_to_datetime(timestamp_ms);
  dt.format(format).to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_timestamp_conversion() {
    let now = current_timestamp_ms();
    let dt = timestamp_to_datetime(now);
    assert_eq!(dt.timestamp_millis(), now);
  }

  #[test]
  fn test_format_timestamp() {
    assert_eq!(format_timestamp(0, "%Y-%m-%d %H:%M:%S"), "1970-01-01 00:00:00");
  }
}
