//! # Data Transfer Objects (DTO) Module
//!
//! HTTP 계층과 주고받는 요청/응답 구조체를 정의합니다.
//!
//! - 요청 본문은 `validator`로 검증합니다 (빈 토큰 거부).
//! - 응답은 항상 [`tokens::response::ApiResponse`] 봉투
//!   (`{data, isSuccess, error: {message, code}}`)를 사용합니다.

pub mod tokens;

pub use tokens::*;
