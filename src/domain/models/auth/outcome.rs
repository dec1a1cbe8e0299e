//! 로그인 유스케이스의 최종 결과

use actix_web::http::StatusCode;

/// 로그인/가입 시도의 최종 결과
///
/// 성공은 토큰 쌍 전체를, 실패는 호출자용 메시지와 HTTP 상태 코드 분류를 담습니다.
/// 부분적으로 채워진 상태는 존재하지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Success {
        access_token: String,
        refresh_token: String,
    },
    Failure {
        message: String,
        code: u16,
    },
}

impl AuthOutcome {
    /// 신원 검증 실패 (401)
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AuthOutcome::Failure {
            message: message.into(),
            code: StatusCode::UNAUTHORIZED.as_u16(),
        }
    }

    /// 내부/저장소 실패 (500)
    pub fn internal(message: impl Into<String>) -> Self {
        AuthOutcome::Failure {
            message: message.into(),
            code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_codes() {
        assert_eq!(
            AuthOutcome::unauthorized("expired"),
            AuthOutcome::Failure { message: "expired".to_string(), code: 401 }
        );
        assert_eq!(
            AuthOutcome::internal("Failed to create token"),
            AuthOutcome::Failure { message: "Failed to create token".to_string(), code: 500 }
        );
        assert!(!AuthOutcome::internal("x").is_success());
    }
}
