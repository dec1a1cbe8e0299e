//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 서비스는 저장소 트레이트를 생성자로 주입받으며 `main`에서 한 번 조립됩니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{TokenService, TokenSettings};
//!
//! let token_service = Arc::new(TokenService::new(TokenSettings::from_env()?, token_store));
//! ```

pub mod auth;
