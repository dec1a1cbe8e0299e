//! Authentication HTTP Handlers
//!
//! 인증 관련 HTTP 엔드포인트를 처리하는 핸들러 함수들입니다.
//! 모든 응답은 `{data, isSuccess, error: {message, code}}` 봉투를 사용합니다.
//!
//! # Endpoints
//!
//! - `POST /auth/google` - Google ID 토큰으로 로그인/가입
//! - `POST /auth/apple` - Apple ID 토큰으로 로그인/가입
//! - `POST /auth/refresh` - 리프레시 토큰으로 액세스 토큰 갱신
//! - `POST /auth/logout` - 토큰 하나 폐기
//! - `POST /auth/logout-all` - 리프레시 토큰 소유자의 모든 토큰 폐기

use std::sync::Arc;

use actix_web::{http::StatusCode, post, web, HttpResponse};
use validator::Validate;

use crate::{
    domain::{
        dto::tokens::{
            request::{OAuthLoginRequest, TokenRequest},
            response::{ApiResponse, RevokeResponse, TokenResponse},
        },
        models::{auth::AuthOutcome, token::RefreshResult},
    },
    errors::AppError,
    repositories::users::UserRepository,
    services::auth::{
        AppleTokenVerifier, GoogleTokenVerifier, LogoutUseCase, RefreshTokenUseCase,
        RegisterOrLoginUserUseCase, TokenService,
    },
};

/// 핸들러가 공유하는 유스케이스 묶음
pub struct AuthState {
    pub google_login: RegisterOrLoginUserUseCase<GoogleTokenVerifier>,
    pub apple_login: RegisterOrLoginUserUseCase<AppleTokenVerifier>,
    pub refresh: RefreshTokenUseCase,
    pub logout: LogoutUseCase,
}

impl AuthState {
    pub fn new(
        google: GoogleTokenVerifier,
        apple: AppleTokenVerifier,
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            google_login: RegisterOrLoginUserUseCase::new(google, users.clone(), tokens.clone()),
            apple_login: RegisterOrLoginUserUseCase::new(apple, users, tokens.clone()),
            refresh: RefreshTokenUseCase::new(tokens.clone()),
            logout: LogoutUseCase::new(tokens.clone(), tokens),
        }
    }
}

/// Google ID 토큰 로그인
///
/// # Endpoint
/// `POST /auth/google`
#[post("/google")]
pub async fn google_login(
    state: web::Data<AuthState>,
    payload: web::Json<OAuthLoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let outcome = state.google_login.execute(&payload.oauth_token).await;
    Ok(outcome_response(outcome))
}

/// Apple ID 토큰 로그인
///
/// # Endpoint
/// `POST /auth/apple`
#[post("/apple")]
pub async fn apple_login(
    state: web::Data<AuthState>,
    payload: web::Json<OAuthLoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let outcome = state.apple_login.execute(&payload.oauth_token).await;
    Ok(outcome_response(outcome))
}

/// 액세스 토큰 갱신
///
/// 리프레시 토큰은 교체되지 않으므로 응답의 `refreshToken`은 요청한 토큰 그대로입니다.
///
/// # Endpoint
/// `POST /auth/refresh`
#[post("/refresh")]
pub async fn refresh_token(
    state: web::Data<AuthState>,
    payload: web::Json<TokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    match state.refresh.execute(&payload.token).await {
        RefreshResult::Success(access) => Ok(HttpResponse::Ok().json(ApiResponse::success(TokenResponse {
            access_token: access.token,
            refresh_token: payload.into_inner().token,
        }))),
        RefreshResult::Unavailable(reason) => {
            Ok(failure_response(reason, StatusCode::INTERNAL_SERVER_ERROR.as_u16()))
        }
        RefreshResult::Failure(reason) => Err(AppError::AuthenticationError(
            reason.unwrap_or_else(|| "Invalid refresh token".to_string()),
        )),
    }
}

/// 토큰 하나 폐기
///
/// 이미 폐기됐거나 알 수 없는 토큰이어도 200으로 응답하며 `revoked: false`를 돌려줍니다.
///
/// # Endpoint
/// `POST /auth/logout`
#[post("/logout")]
pub async fn logout(
    state: web::Data<AuthState>,
    payload: web::Json<TokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let revoked = state.logout.execute(&payload.token).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(RevokeResponse { revoked })))
}

/// 모든 기기에서 로그아웃
///
/// # Endpoint
/// `POST /auth/logout-all`
#[post("/logout-all")]
pub async fn logout_all(
    state: web::Data<AuthState>,
    payload: web::Json<TokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let revoked = state.logout.execute_all(&payload.token).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(RevokeResponse { revoked })))
}

fn outcome_response(outcome: AuthOutcome) -> HttpResponse {
    match outcome {
        AuthOutcome::Success {
            access_token: access,
            refresh_token: refresh,
        } => HttpResponse::Ok().json(ApiResponse::success(TokenResponse {
            access_token: access,
            refresh_token: refresh,
        })),
        AuthOutcome::Failure { message, code } => failure_response(message, code),
    }
}

fn failure_response(message: String, code: u16) -> HttpResponse {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(ApiResponse::<()>::failure(message, code))
}
