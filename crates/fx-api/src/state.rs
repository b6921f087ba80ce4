//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! `AppState`는 Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.
//! 거래 세션 자체는 공유하지 않습니다. 세션은 요청마다 새로 열립니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use fx_calendar::CalendarFetcher;
use fx_exchange::SessionProvider;

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 거래 세션 제공자. 요청마다 로그인/로그아웃
    pub sessions: Arc<dyn SessionProvider>,

    /// 캘린더 폴백 체인
    pub calendar: Arc<CalendarFetcher>,

    /// API 버전
    pub version: String,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// 새 애플리케이션 상태 생성.
    pub fn new(sessions: Arc<dyn SessionProvider>, calendar: Arc<CalendarFetcher>) -> Self {
        Self {
            sessions,
            calendar,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
        }
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 상태 생성.
///
/// 시뮬레이션 세션과, 라우팅 불가능한 주소를 바라보는 캘린더 체인을
/// 사용합니다. 네트워크 없이도 합성 단계까지 빠르게 내려갑니다.
pub fn create_test_state() -> AppState {
    use fx_calendar::CalendarConfig;
    use fx_exchange::SimulatedSessionProvider;

    let config = CalendarConfig {
        primary_api_url: None,
        primary_api_key: None,
        secondary_api_url: None,
        scrape_url: "http://127.0.0.1:9/economic-calendar".to_string(),
        timeout_secs: 2,
    };

    AppState::new(
        Arc::new(SimulatedSessionProvider::new()),
        Arc::new(CalendarFetcher::new(config)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_has_version() {
        let state = create_test_state();
        assert!(!state.version.is_empty());
        assert!(state.uptime_secs() >= 0);
    }
}
