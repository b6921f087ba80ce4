//! 캘린더 파이프라인 에러 타입.

use thiserror::Error;

/// 캘린더 수집 에러.
///
/// 폴백 체인의 오케스트레이터는 이 에러들을 단계별로 흡수합니다.
/// 소스 하나의 실패는 체인을 다음 단계로 진행시킬 뿐입니다.
#[derive(Debug, Error)]
pub enum CalendarError {
    /// HTTP 요청 실패
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    /// 소스 API 에러 응답
    #[error("소스 API 에러 {status}: {body}")]
    Api {
        /// HTTP 상태 코드
        status: u16,
        /// 응답 본문
        body: String,
    },

    /// Rate limit 초과
    #[error("Rate limit 초과")]
    RateLimited,

    /// 추출 전략 모두 실패
    #[error("페이로드 추출 실패: {0}")]
    NotFound(String),

    /// JSON 복구 실패 (여는 중괄호 경계를 찾을 수 없음)
    #[error("JSON 복구 실패: {0}")]
    Repair(String),

    /// 복구 후에도 JSON 파싱 실패
    #[error("파싱 실패: {0}")]
    Parse(String),
}

/// 캘린더 작업을 위한 Result 타입.
pub type CalendarResult<T> = Result<T, CalendarError>;
