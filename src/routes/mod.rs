//! API 라우트 설정 모듈
//!
//! 인증 엔드포인트와 헬스체크를 등록합니다.
//! 핸들러가 사용하는 [`AuthState`](crate::handlers::AuthState)는 `main`에서
//! `app_data`로 주입합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let app = App::new()
//!     .app_data(web::Data::new(auth_state))
//!     .configure(configure_all_routes);
//! ```

use actix_web::{error::JsonPayloadError, web, HttpRequest};
use serde_json::json;

use crate::{errors::AppError, handlers};

/// 요청 본문 최대 크기 (ID 토큰은 수 KB 수준)
const JSON_PAYLOAD_LIMIT: usize = 16 * 1024;

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());

    // Health check endpoint
    cfg.service(health_check);

    configure_auth_routes(cfg);
}

/// 인증 라우트
///
/// - `POST /auth/google`
/// - `POST /auth/apple`
/// - `POST /auth/refresh`
/// - `POST /auth/logout`
/// - `POST /auth/logout-all`
///
/// ```bash
/// curl -X POST http://localhost:8080/auth/google \
///   -H "Content-Type: application/json" \
///   -d '{"oauthToken":"eyJhbGciOiJSUzI1NiIsImtpZCI6..."}'
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(handlers::auth::google_login)
            .service(handlers::auth::apple_login)
            .service(handlers::auth::refresh_token)
            .service(handlers::auth::logout)
            .service(handlers::auth::logout_all),
    );
}

/// JSON 파싱 실패도 표준 응답 봉투(400)로 응답합니다.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_PAYLOAD_LIMIT)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            log::debug!("요청 본문 파싱 실패: {}", err);
            AppError::ValidationError(format!("Invalid request body: {}", err)).into()
        })
}

#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "onboarding_auth_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
