//! # 서드파티 ID 토큰 검증
//!
//! Google과 Apple이 발급한 OIDC ID 토큰을 검증하여 [`VerifiedIdentity`]로 변환합니다.
//! 프로바이더별 차이(발급자, 키 위치, 프로필 클레임 유무)는 설정값으로만 표현되고
//! 검증 절차 자체는 [`IdTokenVerifier`] 하나가 담당합니다.
//!
//! ## 검증 순서
//!
//! ```text
//! header 디코딩 → 알고리즘 허용 목록 → kid로 공개키 조회
//!   → 서명/exp/iss/aud 검증 → email 필수 → email_verified 확인
//! ```
//!
//! 어느 단계에서 실패하든 [`VerificationResult::Failure`]에 사유를 담아 반환하며
//! 에러나 패닉이 호출자에게 전파되지 않습니다.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    config::AuthProvider,
    domain::models::auth::{VerificationResult, VerifiedIdentity},
};

/// 서드파티 ID 토큰 검증기
#[async_trait]
pub trait OAuthTokenVerifier: Send + Sync {
    async fn verify(&self, identity_token: &str) -> VerificationResult;

    fn provider(&self) -> AuthProvider;
}

/// 서명 키 조회 실패 사유
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// 키 엔드포인트에 접근할 수 없거나 응답이 잘못됨
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("unknown signing key")]
    UnknownKey,
}

/// 토큰 header의 `kid`에 해당하는 검증 키 공급자
#[async_trait]
pub trait KeyProvider: Send + Sync {
    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, KeyError>;
}

/// 고정된 대칭 키를 돌려주는 키 공급자
///
/// 로컬 개발과 테스트에서 HS256으로 서명한 ID 토큰을 검증할 때 사용합니다.
pub struct StaticKeyProvider {
    key: DecodingKey,
}

impl StaticKeyProvider {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
        }
    }
}

#[async_trait]
impl KeyProvider for StaticKeyProvider {
    async fn decoding_key(&self, _kid: Option<&str>) -> Result<DecodingKey, KeyError> {
        Ok(self.key.clone())
    }
}

/// Apple은 `email_verified`를 bool 또는 문자열로 보냅니다.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlexibleBool {
    Bool(bool),
    Text(String),
}

impl FlexibleBool {
    fn as_bool(&self) -> bool {
        match self {
            FlexibleBool::Bool(value) => *value,
            FlexibleBool::Text(value) => value.eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    email: Option<String>,
    email_verified: Option<FlexibleBool>,
    name: Option<String>,
    picture: Option<String>,
}

/// 프로바이더 공통 OIDC ID 토큰 검증기
pub struct IdTokenVerifier {
    provider: AuthProvider,
    keys: Arc<dyn KeyProvider>,
    algorithms: Vec<Algorithm>,
    issuers: Vec<String>,
    audiences: Vec<String>,
    /// `name`/`picture` 클레임을 신원 정보에 반영할지 여부
    profile_claims: bool,
}

impl IdTokenVerifier {
    pub fn new(
        provider: AuthProvider,
        keys: Arc<dyn KeyProvider>,
        algorithms: Vec<Algorithm>,
        issuers: Vec<String>,
        audiences: Vec<String>,
        profile_claims: bool,
    ) -> Self {
        if audiences.is_empty() {
            warn!("{} 클라이언트 ID가 설정되지 않았습니다. 모든 토큰이 거부됩니다", provider);
        }

        Self {
            provider,
            keys,
            algorithms,
            issuers,
            audiences,
            profile_claims,
        }
    }

    pub fn provider(&self) -> AuthProvider {
        self.provider
    }

    pub async fn verify(&self, identity_token: &str) -> VerificationResult {
        let result = self.verify_inner(identity_token).await;

        match &result {
            VerificationResult::Success(identity) => {
                debug!("{} ID 토큰 검증 성공: {}", self.provider, identity.email);
            }
            VerificationResult::Failure(reason) => {
                warn!(
                    "{} ID 토큰 검증 실패: {}",
                    self.provider,
                    reason.as_deref().unwrap_or("unknown")
                );
            }
        }

        result
    }

    async fn verify_inner(&self, identity_token: &str) -> VerificationResult {
        let header = match decode_header(identity_token) {
            Ok(header) => header,
            Err(_) => return VerificationResult::failure("malformed token"),
        };

        if !self.algorithms.contains(&header.alg) {
            return VerificationResult::failure("unsupported algorithm");
        }

        let key = match self.keys.decoding_key(header.kid.as_deref()).await {
            Ok(key) => key,
            Err(KeyError::Unavailable(_)) => {
                return VerificationResult::failure("identity provider unavailable");
            }
            Err(KeyError::UnknownKey) => return VerificationResult::failure("unknown signing key"),
        };

        let mut validation = Validation::new(header.alg);
        validation.algorithms = self.algorithms.clone();
        validation.set_issuer(self.issuers.as_slice());
        validation.set_audience(self.audiences.as_slice());
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        let claims = match decode::<IdTokenClaims>(identity_token, &key, &validation) {
            Ok(data) => data.claims,
            Err(e) => return VerificationResult::failure(describe_jwt_error(e.kind())),
        };

        if claims
            .email_verified
            .as_ref()
            .is_some_and(|verified| !verified.as_bool())
        {
            return VerificationResult::failure("email not verified");
        }

        let (name, picture) = if self.profile_claims {
            (claims.name, claims.picture)
        } else {
            (None, None)
        };

        match VerifiedIdentity::from_claims(claims.email, name, picture) {
            Some(identity) => VerificationResult::Success(identity),
            None => VerificationResult::failure("email claim missing"),
        }
    }
}

fn describe_jwt_error(kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::ExpiredSignature => "expired".to_string(),
        ErrorKind::InvalidIssuer => "issuer mismatch".to_string(),
        ErrorKind::InvalidAudience => "audience mismatch".to_string(),
        ErrorKind::InvalidSignature => "invalid signature".to_string(),
        ErrorKind::InvalidAlgorithm => "unsupported algorithm".to_string(),
        ErrorKind::ImmatureSignature => "token not yet valid".to_string(),
        ErrorKind::MissingRequiredClaim(claim) => format!("missing claim: {}", claim),
        _ => "malformed token".to_string(),
    }
}
