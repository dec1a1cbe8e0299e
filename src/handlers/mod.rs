//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! 핸들러는 요청 본문을 검증한 뒤 유스케이스를 호출하고, 결과를 표준 응답 봉투로 변환합니다.
//!
//! ```text
//! Client ──► Handlers (이 모듈) ──► Use cases ──► Verifier / Repositories
//! ```

pub mod auth;

pub use auth::AuthState;
