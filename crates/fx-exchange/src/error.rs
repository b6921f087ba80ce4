//! 거래 백엔드 에러 타입.

use fx_core::Timeframe;
use thiserror::Error;

/// 거래 백엔드 관련 에러.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// 네트워크/연결 에러
    #[error("Connection error: {0}")]
    Connection(String),

    /// 인증/권한 에러
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// API 에러 코드
    #[error("API error {code}: {message}")]
    Api { code: i32, message: String },

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    Parse(String),

    /// 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 세션 상태 에러 (로그아웃된 세션 사용 등)
    #[error("Session error: {0}")]
    Session(String),

    /// 타임프레임별 캔들 조회 실패
    #[error("Error getting {timeframe} data: {cause}")]
    Fetch {
        /// 실패한 타임프레임
        timeframe: Timeframe,
        /// 원인
        cause: String,
    },
}

impl ExchangeError {
    /// 재시도 가능한 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExchangeError::Connection(_) | ExchangeError::Timeout(_)
        )
    }
}
