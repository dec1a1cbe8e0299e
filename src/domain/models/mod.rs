//! # Domain Models Module
//!
//! 인증 파이프라인 단계별 결과 타입을 정의합니다.
//!
//! - [`auth`] - ID 토큰 검증 결과([`VerificationResult`])와 로그인 최종 결과([`AuthOutcome`])
//! - [`token`] - JWT 클레임, 토큰 쌍, 토큰 레코드, 발급/갱신 결과
//!
//! 모든 결과 타입은 `Success | Failure` 형태의 열거형이며,
//! 각 단계는 에러를 전파하지 않고 실패를 값으로 반환합니다.

pub mod auth;
pub mod token;

pub use auth::*;
pub use token::*;
