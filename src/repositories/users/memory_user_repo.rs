//! 메모리 기반 사용자 리포지토리
//!
//! `STORAGE_BACKEND=memory`일 때와 테스트에서 사용합니다.
//! 프로세스 재시작 시 모든 사용자가 사라집니다.

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Mutex,
};

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime};

use crate::{
    config::AuthProvider,
    domain::entities::users::user::User,
    errors::AppError,
    repositories::users::UserRepository,
    utils::string_utils::{clean_optional_string, normalize_email, validate_required_string},
};

/// 이메일을 키로 사용자 레코드를 보관합니다.
///
/// 조회와 삽입이 하나의 락 구간에서 처리되므로 같은 이메일에 대한
/// 동시 호출도 사용자를 하나만 만듭니다.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 동기 버전의 조회-또는-생성
    pub fn upsert(
        &self,
        email: &str,
        name: Option<String>,
        picture_url: Option<String>,
        provider: AuthProvider,
    ) -> Result<User, AppError> {
        let email = normalize_email(&validate_required_string(email, "email")?);
        let mut users = self.lock()?;

        let user = match users.entry(email) {
            Entry::Occupied(entry) => {
                let user = entry.into_mut();
                let now = DateTime::now();
                user.last_login_at = Some(now);
                user.updated_at = now;
                user
            }
            Entry::Vacant(entry) => {
                let mut user = User::new_oauth(
                    entry.key().clone(),
                    clean_optional_string(name),
                    clean_optional_string(picture_url),
                    provider,
                );
                user.id = Some(ObjectId::new());
                log::info!("새 사용자 생성: {}", entry.key());
                entry.insert(user)
            }
        };

        Ok(user.clone())
    }

    /// 역할 부여. 대상 사용자가 없으면 `false`.
    #[cfg(test)]
    pub(crate) fn grant_role(&self, email: &str, role: &str) -> Result<bool, AppError> {
        let mut users = self.lock()?;
        match users.get_mut(&normalize_email(email)) {
            Some(user) => {
                if !user.has_role(role) {
                    user.roles.push(role.to_string());
                    user.updated_at = DateTime::now();
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, User>>, AppError> {
        self.users
            .lock()
            .map_err(|_| AppError::InternalError("사용자 저장소 락이 손상되었습니다".to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_or_create_user(
        &self,
        email: &str,
        name: Option<String>,
        picture_url: Option<String>,
        provider: AuthProvider,
    ) -> Result<User, AppError> {
        self.upsert(email, name, picture_url, provider)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let users = self.lock()?;
        Ok(users
            .values()
            .find(|user| user.id_string().as_deref() == Some(id))
            .cloned())
    }
}
