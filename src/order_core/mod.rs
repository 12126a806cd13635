//! 주문 입력 검증과 주문 요청 생성

pub mod builder;
pub mod validator;
