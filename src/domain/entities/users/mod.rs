//! Users Entity Module
//!
//! 서드파티 ID 토큰으로 검증된 이메일마다 하나씩 생성되는 User 엔티티를 포함합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::domain::entities::users::User;
//!
//! let user = User::new_oauth(
//!     "user@gmail.com".to_string(),
//!     Some("OAuth User".to_string()),
//!     None,
//!     AuthProvider::Google,
//! );
//! ```

pub mod user;

pub use user::User;
