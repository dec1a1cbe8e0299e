//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 비밀번호 없이 서드파티 ID 프로바이더(Google, Apple)로만 인증되는 사용자를 표현합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;

/// 관리자 역할 이름
pub const ADMIN_ROLE: &str = "admin";

/// 기본 사용자 역할 이름
pub const USER_ROLE: &str = "user";

/// 사용자 엔티티
///
/// 이메일 주소당 하나만 존재합니다. 최초 로그인 시 생성되고 이후에는 조회만 됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이메일 (unique, 정규화된 소문자)
    pub email: String,
    /// 표시 이름 (Apple 로그인은 제공하지 않을 수 있음)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 프로필 이미지 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    /// 최초 가입 시 사용한 인증 프로바이더
    pub auth_provider: AuthProvider,
    /// 사용자 역할
    pub roles: Vec<String>,
    /// 마지막 로그인 시간
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    /// 생성 시간
    pub created_at: DateTime,
    /// 수정 시간
    pub updated_at: DateTime,
}

impl User {
    /// 새 OAuth 사용자 생성
    ///
    /// ID는 저장소가 할당합니다. 기본 역할은 `user`입니다.
    pub fn new_oauth(
        email: String,
        name: Option<String>,
        picture_url: Option<String>,
        auth_provider: AuthProvider,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            name,
            picture_url,
            auth_provider,
            roles: vec![USER_ROLE.to_string()],
            last_login_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}
