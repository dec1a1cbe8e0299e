//! 발급된 토큰 레코드 저장소
//!
//! 토큰 원문이 아니라 `jti` 기준의 [`TokenRecord`]만 보관합니다.
//! 폐기(revoke)와 리프레시 시 유효성 확인에 사용됩니다.

pub mod memory_token_store;
pub mod token_repository;

use async_trait::async_trait;

use crate::{domain::models::token::TokenRecord, errors::AppError};

pub use memory_token_store::InMemoryTokenStore;
pub use token_repository::RedisTokenStore;

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn save(&self, record: &TokenRecord) -> Result<(), AppError>;

    async fn find(&self, token_id: &str) -> Result<Option<TokenRecord>, AppError>;

    /// 토큰 하나를 폐기합니다. 레코드가 없거나 이미 폐기/만료됐으면 `false`.
    async fn revoke(&self, token_id: &str) -> Result<bool, AppError>;

    /// 사용자의 활성 토큰을 모두 폐기합니다. 하나라도 활성에서 폐기로 바뀌면 `true`.
    async fn revoke_all_for_user(&self, user_id: &str) -> Result<bool, AppError>;
}
