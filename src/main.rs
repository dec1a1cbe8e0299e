//! 온보딩 인증 서비스 메인 애플리케이션
//!
//! 설정을 읽어 저장소, 검증기, 토큰 서비스를 조립하고 Actix-web HTTP 서버를 구동합니다.

use std::{io, sync::Arc};

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{http::header, middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use onboarding_auth_service::{
    caching::redis::RedisClient,
    config::{MongoConfig, RateLimitConfig, RedisConfig, ServerConfig, StorageBackend, StorageConfig},
    db::Database,
    errors::AppError,
    handlers::AuthState,
    repositories::{
        tokens::{InMemoryTokenStore, RedisTokenStore, TokenStore},
        users::{InMemoryUserRepository, MongoUserRepository, UserRepository},
    },
    routes::configure_all_routes,
    services::auth::{AppleTokenVerifier, GoogleTokenVerifier, TokenService, TokenSettings},
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 온보딩 인증 서비스 시작중...");

    let state = build_auth_state().await.map_err(|e| {
        error!("❌ 서비스 초기화 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(web::Data::new(state)).await
}

/// 저장소와 서비스를 생성자 주입으로 조립합니다.
async fn build_auth_state() -> Result<AuthState, AppError> {
    let (users, token_store) = initialize_data_stores().await?;

    let tokens = Arc::new(TokenService::new(TokenSettings::from_env()?, token_store));
    info!(
        "🔑 토큰 수명: 액세스 {}분, 리프레시 {}일",
        tokens.settings().access_ttl().num_minutes(),
        tokens.settings().refresh_ttl().num_days()
    );

    Ok(AuthState::new(
        GoogleTokenVerifier::from_env()?,
        AppleTokenVerifier::from_env()?,
        users,
        tokens,
    ))
}

/// `STORAGE_BACKEND`에 따라 사용자/토큰 저장소를 준비합니다.
async fn initialize_data_stores() -> Result<(Arc<dyn UserRepository>, Arc<dyn TokenStore>), AppError> {
    match StorageConfig::backend() {
        StorageBackend::Memory => {
            info!("💾 메모리 저장소 사용 (재시작 시 데이터 소실)");
            Ok((
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryTokenStore::new()),
            ))
        }
        StorageBackend::Mongo => {
            info!("📡 데이터베이스 연결 중...");

            let database = Arc::new(
                Database::new(&MongoConfig::uri(), &MongoConfig::database_name())
                    .await
                    .map_err(|e| AppError::DatabaseError(e.to_string()))?,
            );
            let users = MongoUserRepository::new(database);
            users.create_indexes().await?;

            let redis = Arc::new(
                RedisClient::new(&RedisConfig::url())
                    .await
                    .map_err(|e| AppError::RedisError(e.to_string()))?,
            );

            Ok((Arc::new(users), Arc::new(RedisTokenStore::new(redis))))
        }
    }
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate limiting, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
async fn start_http_server(state: web::Data<AuthState>) -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let rate_limit = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("잘못된 Rate Limiting 설정"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit.per_second, rate_limit.burst_size
    );

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(state.clone())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    // 로거 초기화 전이므로 결과는 stderr로 출력
    let loaded = match profile.as_str() {
        "prod" => dotenv::from_filename(".env.prod").map(|_| ".env.prod"),
        "dev" => dotenv::from_filename(".env.dev").map(|_| ".env.dev"),
        _ => dotenv().map(|_| ".env"),
    };

    match loaded {
        Ok(file) => eprintln!("[{}] {} 파일 로드 됨", profile, file),
        Err(e) => eprintln!("[{}] 환경 파일 로드 실패: {}", profile, e),
    }
}

/// 로깅 시스템을 초기화합니다
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=info")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// CORS 설정을 구성합니다
///
/// 모바일 앱은 CORS를 사용하지 않으며, 로컬 웹 개발 도구의 접근만 허용합니다.
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600)
}
