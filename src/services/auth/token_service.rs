//! JWT 토큰 관리 서비스 구현
//!
//! 액세스/리프레시 토큰 쌍의 발급, 리프레시, 폐기를 담당합니다.
//!
//! - 서명: HMAC-SHA256 (`JWT_SECRET`)
//! - 모든 토큰은 고유한 `jti`를 가지며, 발급 시 [`TokenRecord`]가 [`TokenStore`]에 기록됩니다.
//! - 리프레시 토큰은 재사용 가능합니다. 만료되거나 폐기되기 전까지 몇 번이든
//!   새 액세스 토큰을 받을 수 있으며, 리프레시 자체가 리프레시 토큰을 바꾸지 않습니다.
//!
//! 발급/갱신/폐기는 모두 결과 타입이나 `bool`을 반환하며 에러를 던지지 않습니다.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    config::{Environment, JwtConfig, DEFAULT_JWT_SECRET},
    domain::models::token::{
        AccessToken, CreateTokenResult, RefreshResult, TokenClaims, TokenPair, TokenRecord, TokenType,
    },
    errors::AppError,
    repositories::tokens::TokenStore,
    services::auth::auth_use_cases::{FAILED_TO_CREATE_TOKEN, TOKEN_STORE_UNAVAILABLE},
    utils::string_utils::mask_token,
};

/// 토큰 발급/폐기 계약
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// 사용자에게 액세스/리프레시 토큰 쌍을 발급합니다.
    async fn create_token(&self, user_id: &str) -> CreateTokenResult;

    /// 액세스 또는 리프레시 토큰 하나를 폐기합니다.
    ///
    /// 토큰을 해석할 수 없거나 활성 레코드가 없으면 `false`.
    async fn revoke_token(&self, token: &str) -> bool;

    /// 사용자의 모든 토큰을 폐기합니다.
    async fn revoke_all_tokens(&self, user_id: &str) -> bool;
}

/// 리프레시 토큰으로 새 액세스 토큰을 발급하는 계약
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> RefreshResult;

    /// 유효한 리프레시 토큰이면 소유자 ID를 반환합니다.
    ///
    /// 거부된 토큰은 `Ok(None)`, 저장소를 조회하지 못하면 `Err`.
    async fn refresh_token_owner(&self, refresh_token: &str) -> Result<Option<String>, AppError>;
}

/// 토큰 서명/수명 설정
///
/// 생성 시 `access_ttl < refresh_ttl`을 검증하므로 이 타입의 값은 항상 순서가 맞습니다.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    secret: String,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenSettings {
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, AppError> {
        let secret = secret.into();

        if secret.is_empty() {
            return Err(AppError::ConfigurationError("JWT 시크릿이 비어 있습니다".to_string()));
        }
        if access_ttl <= Duration::zero() {
            return Err(AppError::ConfigurationError(
                "액세스 토큰 수명은 0보다 커야 합니다".to_string(),
            ));
        }
        if access_ttl >= refresh_ttl {
            return Err(AppError::ConfigurationError(format!(
                "액세스 토큰 수명({}초)은 리프레시 토큰 수명({}초)보다 짧아야 합니다",
                access_ttl.num_seconds(),
                refresh_ttl.num_seconds()
            )));
        }

        Ok(Self {
            secret,
            issuer: issuer.into(),
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        let secret = JwtConfig::secret();
        if secret == DEFAULT_JWT_SECRET && Environment::current().is_production() {
            return Err(AppError::ConfigurationError(
                "운영 환경에서는 JWT_SECRET을 반드시 설정해야 합니다".to_string(),
            ));
        }

        let access_minutes = JwtConfig::access_ttl_minutes();
        let refresh_days = JwtConfig::refresh_ttl_days();
        Self::new(
            secret,
            JwtConfig::issuer(),
            ttl_from(Duration::try_minutes(access_minutes), "JWT_ACCESS_TTL_MINUTES", access_minutes)?,
            ttl_from(Duration::try_days(refresh_days), "JWT_REFRESH_TTL_DAYS", refresh_days)?,
        )
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    fn ttl_for(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        }
    }
}

/// 범위를 벗어난 수명 설정은 시작 시점에 거부
fn ttl_from(ttl: Option<Duration>, name: &str, value: i64) -> Result<Duration, AppError> {
    ttl.ok_or_else(|| AppError::ConfigurationError(format!("{} 값이 허용 범위를 벗어났습니다: {}", name, value)))
}

/// JWT 토큰 관리 서비스
pub struct TokenService {
    settings: TokenSettings,
    store: Arc<dyn TokenStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(settings: TokenSettings, store: Arc<dyn TokenStore>) -> Self {
        let encoding_key = EncodingKey::from_secret(settings.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(settings.secret.as_bytes());

        Self {
            settings,
            store,
            encoding_key,
            decoding_key,
        }
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// 지정한 발급 시각 기준으로 토큰 쌍을 발급합니다.
    pub async fn create_token_at(&self, user_id: &str, issued_at: DateTime<Utc>) -> CreateTokenResult {
        match self.issue_pair(user_id, issued_at).await {
            Ok(pair) => {
                info!("토큰 쌍 발급: 사용자 {}", user_id);
                CreateTokenResult::Success(pair)
            }
            Err(e) => {
                error!("토큰 쌍 발급 실패 (사용자 {}): {}", user_id, e);
                CreateTokenResult::Failure(Some(e.to_string()))
            }
        }
    }

    async fn issue_pair(&self, user_id: &str, issued_at: DateTime<Utc>) -> Result<TokenPair, AppError> {
        if user_id.trim().is_empty() {
            return Err(AppError::ValidationError("사용자 ID가 없습니다".to_string()));
        }

        let (access_token, access_claims) = self.sign(user_id, TokenType::Access, issued_at)?;
        let (refresh_token, refresh_claims) = self.sign(user_id, TokenType::Refresh, issued_at)?;

        let access = TokenRecord::from_claims(&access_claims);
        let refresh = TokenRecord::from_claims(&refresh_claims);
        self.store.save(&access).await?;
        self.store.save(&refresh).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
        })
    }

    fn sign(
        &self,
        user_id: &str,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, TokenClaims), AppError> {
        let claims = TokenClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type,
            iss: self.settings.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.settings.ttl_for(token_type)).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))?;

        Ok((token, claims))
    }

    /// 서명과 발급자를 검증하고 클레임을 추출합니다.
    ///
    /// `validate_exp`가 `false`면 만료된 토큰도 통과합니다 (폐기용).
    pub fn decode_token(&self, token: &str, validate_exp: bool) -> Result<TokenClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = validate_exp;
        validation.set_issuer(&[self.settings.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError("토큰이 만료되었습니다".to_string())
                }
                _ => AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string()),
            })
    }

    /// 리프레시 토큰을 검증하고 저장소의 활성 레코드까지 확인합니다.
    async fn verify_refresh_token(&self, refresh_token: &str) -> Result<TokenClaims, RefreshResult> {
        let claims = self.decode_token(refresh_token, true).map_err(|e| match e {
            AppError::AuthenticationError(msg) => RefreshResult::failure(msg),
            other => RefreshResult::failure(other.to_string()),
        })?;

        if claims.token_type != TokenType::Refresh {
            return Err(RefreshResult::failure("리프레시 토큰이 아닙니다"));
        }

        let record = self.store.find(&claims.jti).await.map_err(|e| {
            error!("토큰 저장소 조회 실패: {}", e);
            RefreshResult::Unavailable(TOKEN_STORE_UNAVAILABLE.to_string())
        })?;

        match record {
            Some(record) if record.is_active_at(Utc::now()) => Ok(claims),
            Some(_) => Err(RefreshResult::failure("폐기된 리프레시 토큰입니다")),
            None => Err(RefreshResult::failure("알 수 없는 리프레시 토큰입니다")),
        }
    }
}

#[async_trait]
impl TokenRepository for TokenService {
    async fn create_token(&self, user_id: &str) -> CreateTokenResult {
        self.create_token_at(user_id, Utc::now()).await
    }

    async fn revoke_token(&self, token: &str) -> bool {
        let claims = match self.decode_token(token, false) {
            Ok(claims) => claims,
            Err(_) => {
                debug!("폐기 요청 토큰 해석 실패: {}", mask_token(token));
                return false;
            }
        };

        match self.store.find(&claims.jti).await {
            Ok(Some(record)) if record.is_active_at(Utc::now()) => {}
            Ok(_) => return false,
            Err(e) => {
                error!("토큰 저장소 조회 실패: {}", e);
                return false;
            }
        }

        match self.store.revoke(&claims.jti).await {
            Ok(revoked) => {
                info!("토큰 폐기: {} ({:?})", claims.jti, claims.token_type);
                revoked
            }
            Err(e) => {
                error!("토큰 폐기 실패: {}", e);
                false
            }
        }
    }

    async fn revoke_all_tokens(&self, user_id: &str) -> bool {
        match self.store.revoke_all_for_user(user_id).await {
            Ok(revoked) => revoked,
            Err(e) => {
                error!("사용자 {} 토큰 일괄 폐기 실패: {}", user_id, e);
                false
            }
        }
    }
}

#[async_trait]
impl TokenRefresher for TokenService {
    async fn refresh(&self, refresh_token: &str) -> RefreshResult {
        let claims = match self.verify_refresh_token(refresh_token).await {
            Ok(claims) => claims,
            Err(failure) => {
                warn!("리프레시 거부: {:?}", failure);
                return failure;
            }
        };

        let issued = async {
            let (token, access_claims) = self.sign(&claims.sub, TokenType::Access, Utc::now())?;
            let record = TokenRecord::from_claims(&access_claims);
            self.store.save(&record).await?;
            Ok::<_, AppError>(AccessToken {
                token,
                expires_at: record.expires_at,
            })
        }
        .await;

        match issued {
            Ok(access) => {
                debug!("액세스 토큰 갱신: 사용자 {}", claims.sub);
                RefreshResult::Success(access)
            }
            Err(e) => {
                error!("액세스 토큰 갱신 실패: {}", e);
                RefreshResult::Unavailable(FAILED_TO_CREATE_TOKEN.to_string())
            }
        }
    }

    async fn refresh_token_owner(&self, refresh_token: &str) -> Result<Option<String>, AppError> {
        match self.verify_refresh_token(refresh_token).await {
            Ok(claims) => Ok(Some(claims.sub)),
            Err(RefreshResult::Unavailable(reason)) => Err(AppError::InternalError(reason)),
            Err(_) => Ok(None),
        }
    }
}
