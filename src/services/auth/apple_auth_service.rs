//! # Apple ID 토큰 검증
//!
//! Sign in with Apple이 발급한 ID 토큰을 검증합니다.
//! Apple ID 토큰에는 이름과 프로필 사진이 없으므로 신원 정보의 두 필드는 항상 `None`입니다.
//! 사용자가 "나의 이메일 가리기"를 선택한 경우 이메일은 릴레이 주소
//! (`...@privaterelay.appleid.com`)이며 그대로 사용자 식별에 쓰입니다.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use jsonwebtoken::Algorithm;

use crate::{
    config::{AppleOAuthConfig, AuthProvider, JwksConfig},
    domain::models::auth::VerificationResult,
    errors::AppError,
    services::auth::{
        jwks::JwksCache,
        oauth_verifier::{IdTokenVerifier, KeyProvider, OAuthTokenVerifier},
    },
};

pub struct AppleTokenVerifier {
    inner: IdTokenVerifier,
}

impl AppleTokenVerifier {
    pub fn new(keys: Arc<dyn KeyProvider>, client_ids: Vec<String>, algorithms: Vec<Algorithm>) -> Self {
        Self {
            inner: IdTokenVerifier::new(
                AuthProvider::Apple,
                keys,
                algorithms,
                AppleOAuthConfig::issuers(),
                client_ids,
                false,
            ),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let keys = JwksCache::new(
            AppleOAuthConfig::jwks_uri(),
            Duration::from_secs(JwksConfig::cache_ttl_seconds()),
            Duration::from_secs(JwksConfig::request_timeout_seconds()),
        )
        .map_err(|e| AppError::ConfigurationError(e.to_string()))?;

        Ok(Self::new(
            Arc::new(keys),
            AppleOAuthConfig::client_ids(),
            vec![Algorithm::RS256],
        ))
    }
}

#[async_trait]
impl OAuthTokenVerifier for AppleTokenVerifier {
    async fn verify(&self, identity_token: &str) -> VerificationResult {
        self.inner.verify(identity_token).await
    }

    fn provider(&self) -> AuthProvider {
        self.inner.provider()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::{
        jwks::test_support::{jwks_document, serve},
        oauth_verifier::{test_support::*, StaticKeyProvider},
    };
    use serde_json::json;

    const BUNDLE_ID: &str = "com.example.onboarding";

    fn verifier() -> AppleTokenVerifier {
        AppleTokenVerifier::new(
            Arc::new(StaticKeyProvider::from_secret(TEST_SECRET)),
            vec![BUNDLE_ID.to_string()],
            vec![Algorithm::HS256],
        )
    }

    #[actix_web::test]
    async fn test_identity_has_no_profile() {
        let token = sign(&claims("https://appleid.apple.com", BUNDLE_ID, "relay@privaterelay.appleid.com"));

        match verifier().verify(&token).await {
            VerificationResult::Success(identity) => {
                assert_eq!(identity.email, "relay@privaterelay.appleid.com");
                assert!(identity.name.is_none());
                assert!(identity.picture_url.is_none());
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_string_email_verified() {
        let mut c = claims("https://appleid.apple.com", BUNDLE_ID, "a@x.com");
        c["email_verified"] = json!("true");
        assert!(verifier().verify(&sign(&c)).await.is_success());

        c["email_verified"] = json!("false");
        assert_eq!(
            verifier().verify(&sign(&c)).await,
            VerificationResult::failure("email not verified")
        );
    }

    #[actix_web::test]
    async fn test_rejects_google_issuer() {
        let token = sign(&claims("https://accounts.google.com", BUNDLE_ID, "a@x.com"));
        assert_eq!(
            verifier().verify(&token).await,
            VerificationResult::failure("issuer mismatch")
        );
        assert_eq!(verifier().provider(), AuthProvider::Apple);
    }

    #[actix_web::test]
    async fn test_verifies_rs256_token_against_jwks() {
        let endpoint = serve(200, jwks_document(&["apple-1"])).await;
        let keys = JwksCache::new(&endpoint.uri, Duration::from_secs(300), Duration::from_secs(2)).unwrap();
        let verifier = AppleTokenVerifier::new(Arc::new(keys), vec![BUNDLE_ID.to_string()], vec![Algorithm::RS256]);

        let mut c = claims("https://appleid.apple.com", BUNDLE_ID, "relay@privaterelay.appleid.com");
        c["email_verified"] = json!("true");
        match verifier.verify(&sign_rs256(&c, "apple-1")).await {
            VerificationResult::Success(identity) => {
                assert_eq!(identity.email, "relay@privaterelay.appleid.com");
                assert!(identity.name.is_none());
            }
            other => panic!("expected success, got {:?}", other),
        }

        c["aud"] = json!("com.someone.else");
        assert_eq!(
            verifier.verify(&sign_rs256(&c, "apple-1")).await,
            VerificationResult::failure("audience mismatch")
        );
        assert_eq!(endpoint.hits(), 1);
    }
}
