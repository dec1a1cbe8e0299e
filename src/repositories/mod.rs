//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! 저장소는 트레이트로 정의되고 구현체는 시작 시점에 선택되어
//! 생성자 주입으로 서비스에 전달됩니다.
//!
//! - [`users::UserRepository`]: 사용자 조회/생성 (MongoDB 또는 메모리)
//! - [`tokens::TokenStore`]: 발급 토큰 레코드 (Redis 또는 메모리)

pub mod tokens;
pub mod users;
