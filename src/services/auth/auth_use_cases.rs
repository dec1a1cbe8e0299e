//! # 인증 유스케이스
//!
//! HTTP 계층이 호출하는 로그인, 리프레시, 로그아웃 흐름입니다.
//!
//! ## 로그인/가입
//!
//! ```text
//! ID 토큰 검증 ──실패──► 401 (검증 실패 사유)
//!      │
//!      ▼
//! 사용자 조회/생성 ──실패──► 500 "Failed to provision user"
//!      │
//!      ▼
//! 토큰 쌍 발급 ──실패──► 500 "Failed to create token"
//!      │
//!      ▼
//! Success(access, refresh)
//! ```
//!
//! 각 단계는 순서대로 실행되며 실패하면 즉시 중단됩니다.
//! 검증기는 제네릭 파라미터로 고정되므로 Google/Apple 라우트는 각자의 유스케이스를 가집니다.

use std::sync::Arc;

use log::{error, info, warn};

use crate::{
    domain::models::{
        auth::{AuthOutcome, VerificationResult},
        token::{CreateTokenResult, RefreshResult},
    },
    errors::AppError,
    repositories::users::UserRepository,
    services::auth::{
        oauth_verifier::OAuthTokenVerifier,
        token_service::{TokenRefresher, TokenRepository},
    },
};

pub const INVALID_IDENTITY_TOKEN: &str = "Invalid identity token";
pub const FAILED_TO_PROVISION_USER: &str = "Failed to provision user";
pub const FAILED_TO_CREATE_TOKEN: &str = "Failed to create token";
pub const TOKEN_STORE_UNAVAILABLE: &str = "Token store unavailable";

/// 서드파티 ID 토큰으로 로그인하거나 처음이면 가입시키는 유스케이스
pub struct RegisterOrLoginUserUseCase<V: OAuthTokenVerifier> {
    verifier: V,
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
}

impl<V: OAuthTokenVerifier> RegisterOrLoginUserUseCase<V> {
    pub fn new(verifier: V, users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenRepository>) -> Self {
        Self {
            verifier,
            users,
            tokens,
        }
    }

    pub async fn execute(&self, identity_token: &str) -> AuthOutcome {
        let provider = self.verifier.provider();

        let identity = match self.verifier.verify(identity_token).await {
            VerificationResult::Success(identity) => identity,
            VerificationResult::Failure(reason) => {
                return AuthOutcome::unauthorized(
                    reason.unwrap_or_else(|| INVALID_IDENTITY_TOKEN.to_string()),
                );
            }
        };

        let user = match self
            .users
            .get_or_create_user(&identity.email, identity.name, identity.picture_url, provider)
            .await
        {
            Ok(user) => user,
            Err(e) => {
                error!("사용자 조회/생성 실패 ({}): {}", provider, e);
                return AuthOutcome::internal(FAILED_TO_PROVISION_USER);
            }
        };

        let Some(user_id) = user.id_string() else {
            error!("저장된 사용자에 ID가 없습니다: {}", user.email);
            return AuthOutcome::internal(FAILED_TO_PROVISION_USER);
        };

        match self.tokens.create_token(&user_id).await {
            CreateTokenResult::Success(pair) => {
                info!("{} 로그인 성공: {}", provider, user.email);
                AuthOutcome::Success {
                    access_token: pair.access_token,
                    refresh_token: pair.refresh_token,
                }
            }
            CreateTokenResult::Failure(reason) => {
                warn!(
                    "토큰 발급 실패 ({}): {}",
                    user.email,
                    reason.as_deref().unwrap_or("unknown")
                );
                AuthOutcome::internal(FAILED_TO_CREATE_TOKEN)
            }
        }
    }
}

/// 리프레시 토큰으로 새 액세스 토큰을 발급하는 유스케이스
pub struct RefreshTokenUseCase {
    refresher: Arc<dyn TokenRefresher>,
}

impl RefreshTokenUseCase {
    pub fn new(refresher: Arc<dyn TokenRefresher>) -> Self {
        Self { refresher }
    }

    pub async fn execute(&self, refresh_token: &str) -> RefreshResult {
        self.refresher.refresh(refresh_token).await
    }
}

/// 토큰 폐기 유스케이스
pub struct LogoutUseCase {
    tokens: Arc<dyn TokenRepository>,
    refresher: Arc<dyn TokenRefresher>,
}

impl LogoutUseCase {
    pub fn new(tokens: Arc<dyn TokenRepository>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self { tokens, refresher }
    }

    /// 토큰 하나를 폐기합니다. 이미 폐기됐거나 알 수 없는 토큰이면 `false`.
    pub async fn execute(&self, token: &str) -> bool {
        self.tokens.revoke_token(token).await
    }

    /// 리프레시 토큰 소유자의 모든 토큰을 폐기합니다.
    pub async fn execute_all(&self, refresh_token: &str) -> Result<bool, AppError> {
        let user_id = self
            .refresher
            .refresh_token_owner(refresh_token)
            .await?
            .ok_or_else(|| AppError::AuthenticationError("유효하지 않은 리프레시 토큰입니다".to_string()))?;

        Ok(self.tokens.revoke_all_tokens(&user_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AuthProvider,
        domain::entities::users::user::User,
        repositories::users::InMemoryUserRepository,
        services::auth::{
            oauth_verifier::{test_support::*, StaticKeyProvider},
            token_service::{test_support::*, TokenService},
            GoogleTokenVerifier,
        },
    };
    use async_trait::async_trait;
    use jsonwebtoken::Algorithm;

    const GOOGLE_CLIENT: &str = "web-client";

    fn google_verifier() -> GoogleTokenVerifier {
        GoogleTokenVerifier::new(
            Arc::new(StaticKeyProvider::from_secret(TEST_SECRET)),
            vec![GOOGLE_CLIENT.to_string()],
            vec![Algorithm::HS256],
        )
    }

    fn google_token(email: &str) -> String {
        sign(&claims("https://accounts.google.com", GOOGLE_CLIENT, email))
    }

    struct FailingUsers;

    #[async_trait]
    impl UserRepository for FailingUsers {
        async fn get_or_create_user(
            &self,
            _email: &str,
            _name: Option<String>,
            _picture_url: Option<String>,
            _provider: AuthProvider,
        ) -> Result<User, AppError> {
            Err(AppError::DatabaseError("connection reset".to_string()))
        }

        async fn get_user_by_id(&self, _id: &str) -> Result<Option<User>, AppError> {
            Err(AppError::DatabaseError("connection reset".to_string()))
        }
    }

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        tokens: Arc<TokenService>,
        login: RegisterOrLoginUserUseCase<GoogleTokenVerifier>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let (service, _) = memory_service();
        let tokens = Arc::new(service);
        let login = RegisterOrLoginUserUseCase::new(google_verifier(), users.clone(), tokens.clone());
        Fixture { users, tokens, login }
    }

    #[actix_web::test]
    async fn test_new_user_login_succeeds() {
        let f = fixture();

        let AuthOutcome::Success { access_token, refresh_token } =
            f.login.execute(&google_token("new@x.com")).await
        else {
            panic!("login failed");
        };

        assert_eq!(f.users.len(), 1);
        let claims = f.tokens.decode_token(&access_token, true).unwrap();
        let user = f.users.get_user_by_id(&claims.sub).await.unwrap().unwrap();
        assert_eq!(user.email, "new@x.com");
        assert_eq!(user.auth_provider, AuthProvider::Google);
        assert_ne!(access_token, refresh_token);
    }

    #[actix_web::test]
    async fn test_returning_user_gets_same_id() {
        let f = fixture();

        let first = f.login.execute(&google_token("back@x.com")).await;
        let second = f.login.execute(&google_token("back@x.com")).await;

        let sub = |outcome: &AuthOutcome| match outcome {
            AuthOutcome::Success { access_token, .. } => {
                f.tokens.decode_token(access_token, true).unwrap().sub
            }
            other => panic!("expected success, got {:?}", other),
        };
        assert_eq!(sub(&first), sub(&second));
        assert_eq!(f.users.len(), 1);
    }

    #[actix_web::test]
    async fn test_invalid_identity_token_is_unauthorized() {
        let f = fixture();

        let outcome = f.login.execute("definitely-not-a-jwt").await;
        assert_eq!(outcome, AuthOutcome::unauthorized("malformed token"));
        assert!(f.users.is_empty());

        let wrong_audience = sign(&claims("https://accounts.google.com", "other-client", "a@x.com"));
        assert_eq!(
            f.login.execute(&wrong_audience).await,
            AuthOutcome::unauthorized("audience mismatch")
        );
        assert!(f.users.is_empty());
    }

    #[actix_web::test]
    async fn test_token_store_failure_is_internal_error() {
        let users = Arc::new(InMemoryUserRepository::new());
        let tokens = Arc::new(TokenService::new(settings(), Arc::new(FailingTokenStore)));
        let login = RegisterOrLoginUserUseCase::new(google_verifier(), users.clone(), tokens);

        let outcome = login.execute(&google_token("a@x.com")).await;
        assert_eq!(outcome, AuthOutcome::internal(FAILED_TO_CREATE_TOKEN));
        assert_eq!(
            outcome,
            AuthOutcome::Failure {
                message: "Failed to create token".to_string(),
                code: 500
            }
        );
        // 사용자는 이미 생성됨, 재시도 시 같은 사용자로 수렴
        assert_eq!(users.len(), 1);
    }

    #[actix_web::test]
    async fn test_provisioning_failure_is_internal_error() {
        let (service, _) = memory_service();
        let login = RegisterOrLoginUserUseCase::new(
            google_verifier(),
            Arc::new(FailingUsers),
            Arc::new(service),
        );

        assert_eq!(
            login.execute(&google_token("a@x.com")).await,
            AuthOutcome::internal(FAILED_TO_PROVISION_USER)
        );
    }

    #[actix_web::test]
    async fn test_refresh_use_case() {
        let f = fixture();
        let refresh = RefreshTokenUseCase::new(f.tokens.clone());

        let AuthOutcome::Success { access_token, refresh_token } =
            f.login.execute(&google_token("r@x.com")).await
        else {
            panic!("login failed");
        };

        match refresh.execute(&refresh_token).await {
            RefreshResult::Success(access) => {
                assert_ne!(access.token, access_token);
                assert!(access.expires_at > chrono::Utc::now());
            }
            other => panic!("expected success, got {:?}", other),
        }

        assert!(matches!(refresh.execute(&access_token).await, RefreshResult::Failure(_)));
    }

    #[actix_web::test]
    async fn test_logout_flows() {
        let f = fixture();
        let logout = LogoutUseCase::new(f.tokens.clone(), f.tokens.clone());
        let refresh = RefreshTokenUseCase::new(f.tokens.clone());

        let AuthOutcome::Success { access_token, refresh_token } =
            f.login.execute(&google_token("bye@x.com")).await
        else {
            panic!("login failed");
        };

        assert!(logout.execute(&access_token).await);
        assert!(!logout.execute(&access_token).await);
        assert!(matches!(refresh.execute(&refresh_token).await, RefreshResult::Success(_)));

        assert!(logout.execute_all(&refresh_token).await.unwrap());
        assert!(matches!(refresh.execute(&refresh_token).await, RefreshResult::Failure(_)));
        assert!(matches!(
            logout.execute_all(&refresh_token).await,
            Err(AppError::AuthenticationError(_))
        ));
    }
}
