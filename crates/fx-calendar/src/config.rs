//! 캘린더 소스 설정.

use serde::{Deserialize, Serialize};

/// 기본 캘린더 페이지 URL.
pub const DEFAULT_SCRAPE_URL: &str = "https://www.investing.com/economic-calendar/";

/// 캘린더 파이프라인 설정.
///
/// 벤더 API는 선택 사항입니다. URL이 설정되지 않은 단계는 체인에서
/// 건너뜁니다. 스크랩 단계는 항상 구성됩니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CalendarConfig {
    /// 1순위 벤더 API URL
    pub primary_api_url: Option<String>,
    /// 1순위 벤더 API 키
    pub primary_api_key: Option<String>,
    /// 2순위 벤더 API URL
    pub secondary_api_url: Option<String>,
    /// 캘린더 페이지 URL (스크랩/테이블 단계)
    pub scrape_url: String,
    /// 호출당 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            primary_api_url: None,
            primary_api_key: None,
            secondary_api_url: None,
            scrape_url: DEFAULT_SCRAPE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl CalendarConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # 환경변수
    /// - `CALENDAR_PRIMARY_API_URL`: 1순위 벤더 API URL
    /// - `CALENDAR_PRIMARY_API_KEY`: 1순위 벤더 API 키
    /// - `CALENDAR_SECONDARY_API_URL`: 2순위 벤더 API URL
    /// - `CALENDAR_SCRAPE_URL`: 캘린더 페이지 URL
    /// - `CALENDAR_TIMEOUT_SECS`: 호출당 타임아웃 (기본값: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            primary_api_url: std::env::var("CALENDAR_PRIMARY_API_URL").ok(),
            primary_api_key: std::env::var("CALENDAR_PRIMARY_API_KEY").ok(),
            secondary_api_url: std::env::var("CALENDAR_SECONDARY_API_URL").ok(),
            scrape_url: std::env::var("CALENDAR_SCRAPE_URL").unwrap_or(defaults.scrape_url),
            timeout_secs: std::env::var("CALENDAR_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}
