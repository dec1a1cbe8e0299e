//! 서드파티 ID 토큰 검증 결과 모델

use crate::utils::string_utils::clean_optional_string;

/// 검증을 통과한 신원 정보
///
/// 하나의 로그인 시도 안에서만 존재하며 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    /// 이메일 (필수, 비어있지 않음)
    pub email: String,
    pub name: Option<String>,
    pub picture_url: Option<String>,
}

impl VerifiedIdentity {
    /// 클레임 값으로 신원 정보 생성
    ///
    /// 이메일이 비어있으면 `None`을 반환합니다. 이름/사진은 공백이면 `None`으로 정리됩니다.
    pub fn from_claims(
        email: Option<String>,
        name: Option<String>,
        picture_url: Option<String>,
    ) -> Option<Self> {
        let email = clean_optional_string(email)?;

        Some(Self {
            email,
            name: clean_optional_string(name),
            picture_url: clean_optional_string(picture_url),
        })
    }
}

/// ID 토큰 검증 결과
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationResult {
    Success(VerifiedIdentity),
    Failure(Option<String>),
}

impl VerificationResult {
    pub fn failure(reason: impl Into<String>) -> Self {
        VerificationResult::Failure(Some(reason.into()))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, VerificationResult::Success(_))
    }
}
