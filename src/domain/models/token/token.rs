//! JWT 인증 토큰 구조체 및 페어링 된 세트
//!
//! RFC 7519 JWT 표준 클레임과 2개의 용도별 토큰(액세스/리프레시)을 페어링 한 정보,
//! 그리고 토큰 저장소에 보관되는 토큰 레코드를 정의합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 토큰 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// 요청 단위 인가에 사용하는 단기 토큰
    Access,
    /// 새 액세스 토큰 발급에만 사용하는 장기 토큰
    Refresh,
}

/// 서비스가 발급하는 JWT의 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: 사용자 ID
    pub sub: String,
    /// JWT ID: 토큰 고유 식별자 (저장소 키)
    pub jti: String,
    pub token_type: TokenType,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// 액세스/리프레시 토큰 쌍
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

/// 리프레시로 새로 발급된 액세스 토큰
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// 토큰 저장소에 보관되는 발급 기록
///
/// 토큰 원문은 저장하지 않고 `jti`로만 식별합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token_id: String,
    pub user_id: String,
    pub token_type: TokenType,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl TokenRecord {
    pub fn from_claims(claims: &TokenClaims) -> Self {
        Self {
            token_id: claims.jti.clone(),
            user_id: claims.sub.clone(),
            token_type: claims.token_type,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now),
            revoked: false,
        }
    }

    /// 만료되지 않았고 폐기되지 않은 레코드인지 확인
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

/// 토큰 쌍 발급 결과
#[derive(Debug, Clone, PartialEq)]
pub enum CreateTokenResult {
    Success(TokenPair),
    Failure(Option<String>),
}

/// 액세스 토큰 갱신 결과
///
/// `Failure`는 토큰 자체가 거부된 경우(401), `Unavailable`은 저장소 장애 등
/// 서버 내부 사정으로 처리하지 못한 경우(500)입니다.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshResult {
    Success(AccessToken),
    Failure(Option<String>),
    Unavailable(String),
}

impl RefreshResult {
    pub fn failure(reason: impl Into<String>) -> Self {
        RefreshResult::Failure(Some(reason.into()))
    }
}
