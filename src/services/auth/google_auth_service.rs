//! # Google ID 토큰 검증
//!
//! 모바일 앱이 Google Sign-In으로 받은 ID 토큰을 검증합니다.
//! 서버는 인가 코드를 교환하지 않으며 토큰의 서명과 클레임만 확인합니다.
//!
//! | 항목 | 값 |
//! |------|-----|
//! | 발급자 (`iss`) | `accounts.google.com`, `https://accounts.google.com` |
//! | 공개키 | `https://www.googleapis.com/oauth2/v3/certs` |
//! | 대상 (`aud`) | `GOOGLE_CLIENT_IDS` |
//! | 프로필 클레임 | `name`, `picture` |

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use jsonwebtoken::Algorithm;

use crate::{
    config::{AuthProvider, GoogleOAuthConfig, JwksConfig},
    domain::models::auth::VerificationResult,
    errors::AppError,
    services::auth::{
        jwks::JwksCache,
        oauth_verifier::{IdTokenVerifier, KeyProvider, OAuthTokenVerifier},
    },
};

pub struct GoogleTokenVerifier {
    inner: IdTokenVerifier,
}

impl GoogleTokenVerifier {
    pub fn new(keys: Arc<dyn KeyProvider>, client_ids: Vec<String>, algorithms: Vec<Algorithm>) -> Self {
        Self {
            inner: IdTokenVerifier::new(
                AuthProvider::Google,
                keys,
                algorithms,
                GoogleOAuthConfig::issuers(),
                client_ids,
                true,
            ),
        }
    }

    /// 환경 변수 설정으로 JWKS 기반 검증기를 만듭니다.
    pub fn from_env() -> Result<Self, AppError> {
        let keys = JwksCache::new(
            GoogleOAuthConfig::jwks_uri(),
            Duration::from_secs(JwksConfig::cache_ttl_seconds()),
            Duration::from_secs(JwksConfig::request_timeout_seconds()),
        )
        .map_err(|e| AppError::ConfigurationError(e.to_string()))?;

        Ok(Self::new(
            Arc::new(keys),
            GoogleOAuthConfig::client_ids(),
            vec![Algorithm::RS256],
        ))
    }
}

#[async_trait]
impl OAuthTokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, identity_token: &str) -> VerificationResult {
        self.inner.verify(identity_token).await
    }

    fn provider(&self) -> AuthProvider {
        self.inner.provider()
    }
}
