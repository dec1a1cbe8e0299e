//! 캐싱 계층 모듈
//!
//! Redis 클라이언트를 제공합니다. 발급된 토큰 레코드와
//! 사용자별 토큰 색인이 TTL과 함께 저장됩니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let redis = RedisClient::new("redis://localhost:6379").await?;
//! redis.set_with_expiry("token:abc", &record, 900).await?;
//! let record: Option<TokenRecord> = redis.get("token:abc").await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
