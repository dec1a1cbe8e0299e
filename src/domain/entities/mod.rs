//! # Domain Entities Module
//!
//! 영속 저장소에 보관되는 도메인 엔티티들을 정의합니다.
//! 현재는 이메일 단위로 한 번만 생성되는 [`users::user::User`]만 포함합니다.
//!
//! ### MongoDB 매핑
//! - **BSON 직렬화**: `serde`와 `bson` 크레이트를 통한 자동 변환
//! - **ObjectId 지원**: MongoDB의 `_id` 필드와 매핑
//! - **유니크 인덱스**: `email` 필드에 유니크 제약 (동시 최초 로그인 경합 해소)

pub mod users;

pub use users::user::User;
