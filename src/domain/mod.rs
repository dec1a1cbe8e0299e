//! # Domain Layer Module
//!
//! 도메인 계층을 구성하는 핵심 모듈로, 인증 흐름 전반에서 공유되는
//! 엔티티, 결과 타입, 요청/응답 DTO를 정의합니다.
//!
//! ## 아키텍처 개요
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── Entities      - 영속 객체 (User)
//! ├── Models        - 단계별 결과 타입 (VerificationResult, CreateTokenResult, AuthOutcome ...)
//! └── DTOs          - HTTP 요청/응답 계약 (ApiResponse 봉투)
//!      │
//!      ▼
//! Application Layer (Services / Use cases)
//!      │
//!      ▼
//! Infrastructure Layer (Repositories, MongoDB, Redis)
//! ```
//!
//! ## 결과 타입 설계
//!
//! 인증 파이프라인의 각 단계(검증 → 프로비저닝 → 발급)는 예외를 던지지 않고
//! 성공/실패를 표현하는 열거형을 반환합니다. 상위 단계는 `match`로 분기하며,
//! 중간 단계의 성공 상태가 최종 결과로 새어나가지 않습니다.
//!
//! ```rust,ignore
//! match verifier.verify(token).await {
//!     VerificationResult::Success(identity) => { /* 프로비저닝 진행 */ }
//!     VerificationResult::Failure(reason) => return AuthOutcome::unauthorized(reason),
//! }
//! ```

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::*;
pub use dto::*;
pub use models::*;
