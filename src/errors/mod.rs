//! 에러 처리 모듈
//!
//! 애플리케이션 전역 에러 타입 [`AppError`]와 관련 유틸리티를 제공합니다.

pub mod errors;

pub use errors::*;
