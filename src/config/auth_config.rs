//! # Authentication Configuration Module
//!
//! OAuth 프로바이더(Google, Apple), JWT 토큰, JWKS 캐시 등
//! 인증 관련 설정을 관리하는 모듈입니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ### Google / Apple ID 토큰 검증
//! ```bash
//! # 쉼표로 구분된 OAuth 클라이언트 ID 목록 (ID 토큰의 aud 클레임과 비교)
//! export GOOGLE_CLIENT_IDS="1234.apps.googleusercontent.com,5678.apps.googleusercontent.com"
//! export APPLE_CLIENT_IDS="com.example.onboarding"
//! ```
//!
//! ### JWT 토큰 설정
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_ACCESS_TTL_MINUTES="15"
//! export JWT_REFRESH_TTL_DAYS="30"
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{GoogleOAuthConfig, JwtConfig, AuthProvider};
//!
//! let audiences = GoogleOAuthConfig::client_ids();
//! let secret = JwtConfig::secret();
//! let provider = AuthProvider::from_str("apple")?;
//! ```

use std::env;

use crate::utils::string_utils::split_comma_separated;

/// 기본 JWT 시크릿 (개발용)
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key";

pub struct GoogleOAuthConfig;

impl GoogleOAuthConfig {
    /// 허용되는 OAuth 클라이언트 ID 목록 (`aud` 검증용)
    pub fn client_ids() -> Vec<String> {
        split_comma_separated(&env::var("GOOGLE_CLIENT_IDS").unwrap_or_default())
    }

    pub fn jwks_uri() -> String {
        env::var("GOOGLE_JWKS_URI")
            .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v3/certs".to_string())
    }

    pub fn issuers() -> Vec<String> {
        vec![
            "accounts.google.com".to_string(),
            "https://accounts.google.com".to_string(),
        ]
    }
}

pub struct AppleOAuthConfig;

impl AppleOAuthConfig {
    /// 허용되는 번들 ID / 서비스 ID 목록 (`aud` 검증용)
    pub fn client_ids() -> Vec<String> {
        split_comma_separated(&env::var("APPLE_CLIENT_IDS").unwrap_or_default())
    }

    pub fn jwks_uri() -> String {
        env::var("APPLE_JWKS_URI")
            .unwrap_or_else(|_| "https://appleid.apple.com/auth/keys".to_string())
    }

    pub fn issuers() -> Vec<String> {
        vec!["https://appleid.apple.com".to_string()]
    }
}

pub struct JwksConfig;

impl JwksConfig {
    /// JWKS 캐시 유지 시간 (초)
    pub fn cache_ttl_seconds() -> u64 {
        env::var("JWKS_CACHE_TTL_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600)
    }

    /// JWKS 요청 타임아웃 (초)
    pub fn request_timeout_seconds() -> u64 {
        env::var("JWKS_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5)
    }
}

pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                DEFAULT_JWT_SECRET.to_string()
            })
    }

    pub fn issuer() -> String {
        env::var("JWT_ISSUER").unwrap_or_else(|_| "onboarding-auth".to_string())
    }

    pub fn access_ttl_minutes() -> i64 {
        env::var("JWT_ACCESS_TTL_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .unwrap_or(15)
    }

    pub fn refresh_ttl_days() -> i64 {
        env::var("JWT_REFRESH_TTL_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30)
    }
}

/// 서드파티 ID 프로바이더
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,

    Apple,
}

impl AuthProvider {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "google" => Ok(AuthProvider::Google),
            "apple" => Ok(AuthProvider::Apple),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
            AuthProvider::Apple => "apple",
        }
    }
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_from_string() {
        assert_eq!(AuthProvider::from_str("google").unwrap(), AuthProvider::Google);
        assert_eq!(AuthProvider::from_str("apple").unwrap(), AuthProvider::Apple);

        // 대소문자 무관 테스트
        assert_eq!(AuthProvider::from_str("GOOGLE").unwrap(), AuthProvider::Google);
        assert_eq!(AuthProvider::from_str("Apple").unwrap(), AuthProvider::Apple);

        // 지원하지 않는 프로바이더 테스트
        assert!(AuthProvider::from_str("facebook").is_err());
        assert!(AuthProvider::from_str("").is_err());
    }

    #[test]
    fn test_auth_provider_roundtrip() {
        for provider_str in ["google", "apple"] {
            let provider = AuthProvider::from_str(provider_str).unwrap();
            assert_eq!(provider.as_str(), provider_str);
            assert_eq!(provider.to_string(), provider_str);
        }
    }

    #[test]
    fn test_auth_provider_serialization() {
        let json = serde_json::to_string(&AuthProvider::Apple).unwrap();
        assert_eq!(json, "\"apple\"");

        let deserialized: AuthProvider = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, AuthProvider::Apple);
    }

    #[test]
    fn test_provider_issuers() {
        assert!(GoogleOAuthConfig::issuers().contains(&"https://accounts.google.com".to_string()));
        assert_eq!(AppleOAuthConfig::issuers(), vec!["https://appleid.apple.com".to_string()]);
    }
}
