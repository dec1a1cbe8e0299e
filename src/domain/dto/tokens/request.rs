use serde::Deserialize;
use validator::Validate;

/// `POST /auth/google`, `POST /auth/apple` 요청 본문
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OAuthLoginRequest {
    /// 서드파티 프로바이더가 발급한 ID 토큰
    #[validate(length(min = 1, message = "oauthToken은(는) 필수입니다"))]
    pub oauth_token: String,
}

/// `POST /auth/refresh`, `/auth/logout`, `/auth/logout-all` 요청 본문
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "token은(는) 필수입니다"))]
    pub token: String,
}
