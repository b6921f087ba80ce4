//! 게이트웨이의 공통 에러 타입.
//!
//! 이 모듈은 설정 로드와 입력 검증에서 사용되는 에러 타입을 정의합니다.
//! 거래 세션과 캘린더 파이프라인은 각자의 크레이트에 별도 에러 타입을 가집니다.

use thiserror::Error;

/// 핵심 게이트웨이 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
