//! 메모리 기반 토큰 레코드 저장소

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    domain::models::token::TokenRecord,
    errors::AppError,
    repositories::tokens::TokenStore,
};

/// `jti`를 키로 레코드를 보관합니다. 만료된 레코드는 조회 시 걸러지지 않으며
/// 활성 여부 판단은 호출자가 [`TokenRecord::is_active_at`]으로 합니다.
/// 폐기는 활성 레코드에만 적용되고, 실제로 바뀐 레코드가 있을 때만 `true`입니다.
#[derive(Default)]
pub struct InMemoryTokenStore {
    records: Mutex<HashMap<String, TokenRecord>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, TokenRecord>>, AppError> {
        self.records
            .lock()
            .map_err(|_| AppError::InternalError("토큰 저장소 락이 손상되었습니다".to_string()))
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save(&self, record: &TokenRecord) -> Result<(), AppError> {
        self.lock()?.insert(record.token_id.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, token_id: &str) -> Result<Option<TokenRecord>, AppError> {
        Ok(self.lock()?.get(token_id).cloned())
    }

    async fn revoke(&self, token_id: &str) -> Result<bool, AppError> {
        let now = Utc::now();
        Ok(match self.lock()?.get_mut(token_id) {
            Some(record) if record.is_active_at(now) => {
                record.revoked = true;
                true
            }
            _ => false,
        })
    }

    async fn revoke_all_for_user(&self, user_id: &str) -> Result<bool, AppError> {
        let now = Utc::now();
        let mut revoked_any = false;
        for record in self
            .lock()?
            .values_mut()
            .filter(|r| r.user_id == user_id && r.is_active_at(now))
        {
            record.revoked = true;
            revoked_any = true;
        }
        Ok(revoked_any)
    }
}
