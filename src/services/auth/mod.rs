//! 인증 서비스 모듈
//!
//! 서드파티 ID 토큰 검증, 자체 JWT 발급/갱신/폐기, 그리고 이 둘을 잇는 유스케이스를 제공합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{GoogleTokenVerifier, RegisterOrLoginUserUseCase, TokenService, TokenSettings};
//!
//! let tokens = Arc::new(TokenService::new(TokenSettings::from_env()?, token_store));
//! let google_login = RegisterOrLoginUserUseCase::new(GoogleTokenVerifier::from_env()?, users, tokens);
//!
//! match google_login.execute(&id_token).await {
//!     AuthOutcome::Success { access_token, refresh_token } => { /* ... */ }
//!     AuthOutcome::Failure { message, code } => { /* ... */ }
//! }
//! ```

pub mod apple_auth_service;
pub mod auth_use_cases;
pub mod google_auth_service;
pub mod jwks;
pub mod oauth_verifier;
pub mod token_service;

pub use apple_auth_service::AppleTokenVerifier;
pub use auth_use_cases::*;
pub use google_auth_service::GoogleTokenVerifier;
pub use jwks::JwksCache;
pub use oauth_verifier::{IdTokenVerifier, KeyError, KeyProvider, OAuthTokenVerifier, StaticKeyProvider};
pub use token_service::{TokenRefresher, TokenRepository, TokenService, TokenSettings};
