//! 폴백 체인 오케스트레이터.
//!
//! 데이터 소스를 우선순위 순서로 시도합니다:
//! (a) 1순위 벤더 API → (b) 2순위 벤더 API → (c) 페이지 스크랩(인라인
//! JSON) → (d) 같은 페이지의 테이블 파싱 → (e) 합성 데이터.
//!
//! 소스 단계의 예외는 모두 흡수됩니다. 한 단계의 실패는 체인을 다음
//! 단계로 진행시킬 뿐, 일반적인 가용성 문제로 에러를 올리지 않습니다.
//! 뒤 단계는 앞 단계를 보상하도록 정의되어 있으므로 단계들은 엄격히
//! 우선순위 순서로 실행됩니다. 재시도는 하지 않습니다.

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, info, warn};

use fx_core::{CalendarEvent, EventFilter, SourceResult};

use crate::config::CalendarConfig;
use crate::sources::scrape::{CalendarScraper, BROWSER_USER_AGENT};
use crate::sources::synthetic;
use crate::sources::table::parse_calendar_table;
use crate::sources::vendor::{PrimaryCalendarApi, SecondaryCalendarApi};

/// 캘린더 폴백 체인.
///
/// 요청 간 공유 가능한 불변 구조체입니다. 내부 `reqwest::Client`는
/// 커넥션 풀만 공유하며 요청별 상태는 없습니다.
pub struct CalendarFetcher {
    primary: Option<PrimaryCalendarApi>,
    secondary: Option<SecondaryCalendarApi>,
    scraper: CalendarScraper,
}

impl CalendarFetcher {
    /// 설정에서 체인 구성.
    ///
    /// URL이 설정되지 않은 벤더 단계는 체인에서 빠집니다.
    pub fn new(config: CalendarConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        let primary = config.primary_api_url.as_ref().map(|url| {
            PrimaryCalendarApi::new(client.clone(), url.clone(), config.primary_api_key.clone())
        });
        let secondary = config
            .secondary_api_url
            .as_ref()
            .map(|url| SecondaryCalendarApi::new(client.clone(), url.clone()));
        let scraper = CalendarScraper::new(client, config.scrape_url.clone());

        Self {
            primary,
            secondary,
            scraper,
        }
    }

    /// 필터를 적용한 캘린더 조회.
    ///
    /// 선택 규칙:
    /// - 필터 적용 후 이벤트가 하나 이상 남는 첫 단계가 승리
    /// - 남는 단계가 없으면 마지막 성공-했지만-빈 결과 반환
    /// - 모든 단계가 실패하면 합성 생성기의 결과 반환 (합성은 실패하지 않음)
    pub async fn fetch_calendar(&self, filter: &EventFilter) -> SourceResult {
        let mut last_empty: Option<SourceResult> = None;

        // (a) 1순위 벤더 API
        if let Some(primary) = &self.primary {
            match primary.fetch().await {
                Ok(events) => {
                    if let Some(hit) = settle("primary-api", events, filter, &mut last_empty) {
                        return hit;
                    }
                }
                Err(e) => warn!("Primary calendar API failed: {}", e),
            }
        } else {
            debug!("Primary calendar API not configured, skipping");
        }

        // (b) 2순위 벤더 API
        if let Some(secondary) = &self.secondary {
            match secondary.fetch().await {
                Ok(events) => {
                    if let Some(hit) = settle("secondary-api", events, filter, &mut last_empty) {
                        return hit;
                    }
                }
                Err(e) => warn!("Secondary calendar API failed: {}", e),
            }
        } else {
            debug!("Secondary calendar API not configured, skipping");
        }

        // (c)+(d)는 같은 페이지를 공유. 페이지는 한 번만 가져옴
        match self.scraper.fetch_page().await {
            Ok(page) => {
                // (c) 인라인 JSON 스크랩
                match self.scraper.events_from_inline(&page) {
                    Ok(events) => {
                        if let Some(hit) = settle("site-scrape", events, filter, &mut last_empty) {
                            return hit;
                        }
                    }
                    Err(e) => warn!("Inline calendar extraction failed: {}", e),
                }

                // (d) 같은 페이지의 테이블 파싱
                let events = parse_calendar_table(&page, Utc::now().date_naive());
                if let Some(hit) = settle("site-table", events, filter, &mut last_empty) {
                    return hit;
                }
            }
            Err(e) => warn!("Calendar page fetch failed, skipping scrape stages: {}", e),
        }

        // (e) 합성 데이터. 절대 실패하지 않는 종단 단계
        let events = synthetic::generate(Utc::now().date_naive());
        if let Some(hit) = settle(synthetic::SOURCE_NAME, events, filter, &mut last_empty) {
            return hit;
        }

        last_empty.unwrap_or_else(|| SourceResult::empty(synthetic::SOURCE_NAME))
    }
}

/// 단계 결과 정산: 필터 적용 후 비어 있지 않으면 성공 결과를 반환하고,
/// 비어 있으면 마지막-빈-결과로 기록합니다.
fn settle(
    source: &str,
    events: Vec<CalendarEvent>,
    filter: &EventFilter,
    last_empty: &mut Option<SourceResult>,
) -> Option<SourceResult> {
    let total = events.len();
    let filtered = filter.apply(events);

    if filtered.is_empty() {
        debug!(source, total, "Stage succeeded but no events passed the filter");
        *last_empty = Some(SourceResult::empty(source));
        None
    } else {
        info!(source, events = filtered.len(), "Calendar resolved");
        Some(SourceResult::success(source, filtered))
    }
}
