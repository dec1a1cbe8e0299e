//! 사용자 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! [`UserRepository`] 트레이트가 "이메일당 사용자 1명" 규칙을 보장하는
//! 조회-또는-생성 연산을 정의합니다. 구현체는 두 가지입니다.
//!
//! - [`user_repo::MongoUserRepository`]: MongoDB 원자적 upsert + 이메일 유니크 인덱스
//! - [`memory_user_repo::InMemoryUserRepository`]: 로컬 개발/테스트용 메모리 저장소
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::users::UserRepository;
//!
//! let user = user_repo
//!     .get_or_create_user("user@example.com", None, None, AuthProvider::Apple)
//!     .await?;
//! ```

pub mod memory_user_repo;
pub mod user_repo;

use async_trait::async_trait;

use crate::{config::AuthProvider, domain::entities::users::user::User, errors::AppError};

pub use memory_user_repo::InMemoryUserRepository;
pub use user_repo::MongoUserRepository;

/// 사용자 조회/생성 저장소
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 이메일로 사용자를 찾고, 없으면 새로 만듭니다.
    ///
    /// 같은 이메일로 동시에 호출되어도 사용자는 하나만 생성되며
    /// 모든 호출자가 같은 레코드를 받습니다. 이미 존재하는 사용자의
    /// 이름/사진은 덮어쓰지 않고 마지막 로그인 시간만 갱신합니다.
    async fn get_or_create_user(
        &self,
        email: &str,
        name: Option<String>,
        picture_url: Option<String>,
        provider: AuthProvider,
    ) -> Result<User, AppError>;

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    /// 관리자 역할 보유 여부. 존재하지 않는 사용자는 `false`.
    async fn is_administrator(&self, id: &str) -> Result<bool, AppError> {
        Ok(self
            .get_user_by_id(id)
            .await?
            .map(|user| user.is_admin())
            .unwrap_or(false))
    }
}
