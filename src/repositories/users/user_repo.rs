//! # MongoDB 사용자 리포지토리
//!
//! `users` 컬렉션에 사용자를 저장합니다.
//!
//! ## 동시성
//!
//! 조회-또는-생성은 `find_one_and_update` + `upsert` 한 번으로 처리되며,
//! `email` 유니크 인덱스가 최종 방어선입니다. 두 요청이 동시에 upsert를 시도해
//! 한쪽이 duplicate key(11000) 에러를 받으면 같은 연산을 한 번 더 실행하여
//! 이미 생성된 레코드를 반환합니다.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, DateTime, Document},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    config::AuthProvider,
    db::Database,
    domain::entities::users::user::{User, USER_ROLE},
    errors::{AppError, AppResult, ErrorContext},
    repositories::users::UserRepository,
    utils::string_utils::{clean_optional_string, normalize_email, validate_required_string},
};

const COLLECTION_NAME: &str = "users";
const DUPLICATE_KEY_CODE: i32 = 11000;

pub struct MongoUserRepository {
    db: Arc<Database>,
}

impl MongoUserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<User> {
        self.db.collection::<User>(COLLECTION_NAME)
    }

    /// 컬렉션 인덱스 생성
    ///
    /// - `email_unique`: 이메일 유니크 인덱스 (사용자 중복 생성 방지)
    /// - `created_at`: 가입일 내림차순
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .build();

        self.collection()
            .create_indexes(vec![email_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        info!("✅ users 컬렉션 인덱스 준비 완료");
        Ok(())
    }

    async fn upsert_by_email(&self, email: &str, update: Document) -> Result<Option<User>, mongodb::error::Error> {
        self.collection()
            .find_one_and_update(doc! { "email": email }, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
    }
}

/// 새 사용자일 때만 기록되는 필드는 `$setOnInsert`, 로그인 시각은 매번 `$set`.
fn build_upsert_document(
    email: &str,
    name: Option<String>,
    picture_url: Option<String>,
    provider: AuthProvider,
) -> AppResult<Document> {
    let now = DateTime::now();
    let provider = to_bson(&provider).context("프로바이더 직렬화 실패")?;

    let mut on_insert = doc! {
        "email": email,
        "auth_provider": provider,
        "roles": [USER_ROLE],
        "created_at": now,
    };
    if let Some(name) = name {
        on_insert.insert("name", name);
    }
    if let Some(picture_url) = picture_url {
        on_insert.insert("picture_url", picture_url);
    }

    Ok(doc! {
        "$setOnInsert": on_insert,
        "$set": { "last_login_at": now, "updated_at": now },
    })
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Command(err) => err.code == DUPLICATE_KEY_CODE,
        ErrorKind::Write(WriteFailure::WriteError(err)) => err.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn get_or_create_user(
        &self,
        email: &str,
        name: Option<String>,
        picture_url: Option<String>,
        provider: AuthProvider,
    ) -> Result<User, AppError> {
        let email = normalize_email(&validate_required_string(email, "email")?);
        let update = build_upsert_document(
            &email,
            clean_optional_string(name),
            clean_optional_string(picture_url),
            provider,
        )?;

        let user = match self.upsert_by_email(&email, update.clone()).await {
            Ok(user) => user,
            Err(e) if is_duplicate_key(&e) => {
                // 동시 생성 경합에서 진 쪽: 이제 문서가 존재하므로 매칭됨
                warn!("사용자 동시 생성 감지, 재시도: {}", email);
                self.upsert_by_email(&email, update)
                    .await
                    .map_err(|e| AppError::DatabaseError(e.to_string()))?
            }
            Err(e) => return Err(AppError::DatabaseError(e.to_string())),
        };

        debug!("사용자 조회/생성 완료: {}", email);
        user.ok_or_else(|| AppError::DatabaseError(format!("upsert가 문서를 반환하지 않았습니다: {}", email)))
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}
