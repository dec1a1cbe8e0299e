//! 온보딩 인증 서비스 백엔드
//!
//! 피트니스 온보딩 앱의 인증 및 세션 발급 서브시스템입니다.
//! Google/Apple ID 토큰을 검증하고, 이메일 기준으로 사용자를 찾거나 만들고,
//! 자체 액세스/리프레시 토큰을 발급, 갱신, 폐기합니다.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← POST /auth/{google,apple,refresh,logout,logout-all}
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증, 응답 봉투 변환
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Use cases    │ ← 검증 → 사용자 조회/생성 → 토큰 발급
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← UserRepository, TokenStore
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소 (또는 메모리)
//! └─────────────────┘
//! ```

pub mod caching;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
