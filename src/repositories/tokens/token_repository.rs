//! Redis 기반 토큰 레코드 저장소
//!
//! ## 키 구조
//!
//! - `token:{jti}`: 직렬화된 [`TokenRecord`], 토큰 만료 시각까지 TTL
//! - `user_tokens:{user_id}`: 사용자가 가진 `jti` 집합, 가장 늦게 만료되는 토큰까지 TTL
//!
//! 만료된 레코드는 Redis가 TTL로 정리하므로 별도 청소 작업이 없습니다.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};

use crate::{
    caching::redis::RedisClient,
    domain::models::token::TokenRecord,
    errors::AppError,
    repositories::tokens::TokenStore,
};

pub struct RedisTokenStore {
    redis: Arc<RedisClient>,
}

impl RedisTokenStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    fn token_key(token_id: &str) -> String {
        format!("token:{}", token_id)
    }

    fn user_index_key(user_id: &str) -> String {
        format!("user_tokens:{}", user_id)
    }

    /// 만료까지 남은 초. 이미 만료된 레코드는 `None`.
    ///
    /// 1초 미만으로 남은 레코드도 만료로 봅니다.
    fn remaining_seconds(record: &TokenRecord) -> Option<u64> {
        let remaining = (record.expires_at - Utc::now()).num_seconds();
        (remaining > 0).then_some(remaining as u64)
    }

    /// 활성 레코드를 폐기 상태로 바꿉니다. 실제로 바뀌었을 때만 `true`.
    async fn mark_revoked(&self, token_id: &str) -> Result<bool, AppError> {
        let key = Self::token_key(token_id);
        let Some(mut record) = self.find(token_id).await? else {
            return Ok(false);
        };

        if record.revoked {
            return Ok(false);
        }

        let Some(ttl) = Self::remaining_seconds(&record) else {
            self.redis
                .del(&key)
                .await
                .map_err(|e| AppError::RedisError(e.to_string()))?;
            return Ok(false);
        };

        record.revoked = true;
        self.redis
            .set_with_expiry(&key, &record, ttl)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))?;

        Ok(true)
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn save(&self, record: &TokenRecord) -> Result<(), AppError> {
        let Some(ttl) = Self::remaining_seconds(record) else {
            return Err(AppError::ValidationError("이미 만료된 토큰은 저장할 수 없습니다".to_string()));
        };

        self.redis
            .set_with_expiry(&Self::token_key(&record.token_id), record, ttl)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))?;

        let index_key = Self::user_index_key(&record.user_id);
        self.redis
            .sadd(&index_key, &record.token_id)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))?;
        self.redis
            .extend_expiry(&index_key, ttl)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))?;

        debug!("토큰 레코드 저장: {} ({:?}, TTL {}초)", record.token_id, record.token_type, ttl);
        Ok(())
    }

    async fn find(&self, token_id: &str) -> Result<Option<TokenRecord>, AppError> {
        self.redis
            .get::<TokenRecord>(&Self::token_key(token_id))
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }

    async fn revoke(&self, token_id: &str) -> Result<bool, AppError> {
        self.mark_revoked(token_id).await
    }

    async fn revoke_all_for_user(&self, user_id: &str) -> Result<bool, AppError> {
        let index_key = Self::user_index_key(user_id);
        let token_ids = self
            .redis
            .smembers(&index_key)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))?;

        let mut revoked_any = false;
        for token_id in &token_ids {
            revoked_any |= self.mark_revoked(token_id).await?;
        }

        self.redis
            .del(&index_key)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))?;

        info!("사용자 {}의 토큰 {}개 폐기", user_id, token_ids.len());
        Ok(revoked_any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::token::TokenType;
    use chrono::Duration;

    fn record(expires_in: Duration) -> TokenRecord {
        TokenRecord {
            token_id: "jti-1".to_string(),
            user_id: "user-1".to_string(),
            token_type: TokenType::Access,
            expires_at: Utc::now() + expires_in,
            revoked: false,
        }
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(RedisTokenStore::token_key("abc"), "token:abc");
        assert_eq!(RedisTokenStore::user_index_key("u1"), "user_tokens:u1");
    }

    #[test]
    fn test_remaining_seconds() {
        let ttl = RedisTokenStore::remaining_seconds(&record(Duration::minutes(15))).unwrap();
        assert!(ttl > 890 && ttl <= 900);

        assert!(RedisTokenStore::remaining_seconds(&record(Duration::seconds(-5))).is_none());
    }
}
