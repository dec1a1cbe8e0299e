use serde::{Deserialize, Serialize};

/// 모든 응답에 사용하는 표준 봉투
///
/// ```json
/// { "data": { ... }, "isSuccess": true, "error": null }
/// { "data": null, "isSuccess": false, "error": { "message": "expired", "code": 401 } }
/// ```
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub is_success: bool,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub code: u16,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            is_success: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, code: u16) -> Self {
        Self {
            data: None,
            is_success: false,
            error: Some(ApiErrorBody {
                message: message.into(),
                code,
            }),
        }
    }
}

/// 로그인/갱신 성공 시 `data`에 담기는 토큰
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// 토큰 폐기 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevokeResponse {
    pub revoked: bool,
}
