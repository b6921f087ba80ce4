//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `GET /` - 서비스 안내
//! - `GET /health` - 헬스 체크
//! - `POST /get-forex-data` - 멀티 타임프레임 캔들 조회
//! - `GET /get-economic-calendar` - 경제 캘린더 조회

pub mod calendar;
pub mod forex;
pub mod health;

pub use calendar::{calendar_router, CalendarFilters, CalendarResponse};
pub use forex::{forex_router, ForexDataRequest, ForexDataResponse, MultiTimeframeData};
pub use health::{health_router, HealthResponse, ServiceInfoResponse};

use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// API 에러 응답 본문.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    /// 에러 코드
    pub code: String,
    /// 에러 메시지
    pub message: String,
}

impl ApiError {
    /// 새 에러 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_router())
        .merge(forex_router())
        .merge(calendar_router())
}
