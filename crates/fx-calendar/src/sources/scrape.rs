//! 캘린더 페이지 스크랩 소스.
//!
//! 공개 캘린더 페이지를 가져와 인라인 스크립트의 JavaScript 리터럴을
//! 추출(`extract`) → 복구(`repair`) → 엄격 파싱 → 캘린더 서브트리 탐색
//! 순서로 처리합니다. 파싱된 JSON이 날짜 목록을 고정된 키에 노출한다는
//! 보장이 없으므로 후보 키를 순서대로 조사한 뒤 깊이 제한 재귀 탐색으로
//! 넘어갑니다.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use fx_core::{normalize_time_label, CalendarEvent, Impact};

use super::parse_event_date;
use crate::currency::code_for_country;
use crate::extract::extract;
use crate::repair::repair;
use crate::{CalendarError, CalendarResult};

/// 스크랩 요청에 쓰는 브라우저 User-Agent.
///
/// 캘린더 페이지는 기본 HTTP 클라이언트 UA를 차단합니다.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 서브트리 탐색에서 먼저 조사하는 최상위 후보 키.
const CANDIDATE_KEYS: &[&str] = &["days", "calendar", "events", "data"];

/// 재귀 서브트리 탐색의 최대 깊이.
const MAX_SEARCH_DEPTH: usize = 6;

/// 캘린더 페이지 스크래퍼.
pub struct CalendarScraper {
    client: Client,
    url: String,
}

impl CalendarScraper {
    /// 새 스크래퍼 생성.
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// 캘린더 페이지 HTML 가져오기.
    ///
    /// 반환된 페이지는 인라인 스크랩 단계와 테이블 파싱 단계가
    /// 공유합니다. 체인은 페이지를 한 번만 가져옵니다.
    pub async fn fetch_page(&self) -> CalendarResult<String> {
        let response = self
            .client
            .get(&self.url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CalendarError::RateLimited);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CalendarError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let html = response.text().await?;
        debug!(bytes = html.len(), "Calendar page fetched");
        Ok(html)
    }

    /// 인라인 스크립트 페이로드에서 이벤트 추출.
    ///
    /// 추출 → 복구 → 파싱 → 서브트리 탐색. 어느 단계의 실패든 호출자
    /// (폴백 체인)가 흡수합니다.
    pub fn events_from_inline(&self, page: &str) -> CalendarResult<Vec<CalendarEvent>> {
        let extraction = extract(page)?;
        info!(strategy = extraction.strategy, "Inline payload located");

        let fixed = repair(&extraction.payload)?;
        let root: Value = serde_json::from_str(&fixed)
            .map_err(|e| CalendarError::Parse(format!("복구된 페이로드 파싱 실패: {}", e)))?;

        let days = find_day_list(&root).ok_or_else(|| {
            CalendarError::NotFound("파싱된 페이로드에 날짜 목록 없음".to_string())
        })?;

        let events: Vec<CalendarEvent> = days.iter().flat_map(normalize_day).collect();
        debug!(events = events.len(), "Inline payload normalized");
        Ok(events)
    }
}

/// 파싱된 JSON에서 날짜 목록 찾기.
///
/// 최상위 후보 키를 순서대로 조사한 뒤, 깊이 제한 재귀 탐색으로 `days`
/// 배열을 가진 첫 중첩 객체를 찾습니다.
pub(crate) fn find_day_list(root: &Value) -> Option<&Vec<Value>> {
    if let Value::Object(map) = root {
        for key in CANDIDATE_KEYS {
            match map.get(*key) {
                Some(Value::Array(days)) => return Some(days),
                Some(Value::Object(inner)) => {
                    if let Some(Value::Array(days)) = inner.get("days") {
                        return Some(days);
                    }
                }
                _ => {}
            }
        }
    }
    search_nested(root, 0)
}

/// `days` 배열을 가진 첫 중첩 객체를 깊이 제한으로 탐색.
fn search_nested(value: &Value, depth: usize) -> Option<&Vec<Value>> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(days)) = map.get("days") {
                return Some(days);
            }
            map.values().find_map(|v| search_nested(v, depth + 1))
        }
        Value::Array(items) => items.iter().find_map(|v| search_nested(v, depth + 1)),
        _ => None,
    }
}

/// 날짜 객체 하나를 이벤트 목록으로 정규화.
fn normalize_day(day: &Value) -> Vec<CalendarEvent> {
    let Some(date) = day
        .get("date")
        .and_then(Value::as_str)
        .and_then(parse_event_date)
    else {
        return Vec::new();
    };

    let events = match day.get("events").or_else(|| day.get("items")) {
        Some(Value::Array(events)) => events,
        _ => return Vec::new(),
    };

    events
        .iter()
        .filter_map(|record| normalize_record(date, record))
        .collect()
}

/// 이벤트 레코드 하나를 정규화.
///
/// 소스 개정판마다 필드 이름이 다르므로 후보 키를 순서대로 조사합니다.
fn normalize_record(date: chrono::NaiveDate, record: &Value) -> Option<CalendarEvent> {
    let name = first_string(record, &["name", "event", "title"])?;
    let currency = first_string(record, &["currency", "ccy"])
        .map(|c| c.trim().to_uppercase())
        .filter(|c| c.len() == 3 && c.chars().all(|ch| ch.is_ascii_alphabetic()))
        .or_else(|| {
            first_string(record, &["country"])
                .as_deref()
                .and_then(code_for_country)
                .map(|code| code.to_string())
        })?;

    let impact_label =
        first_string(record, &["impact", "importance", "volatility"]).unwrap_or_default();
    let time = first_string(record, &["time", "timeLabel", "time_label"])
        .map(|t| normalize_time_label(&t))
        .unwrap_or_else(|| "All Day".to_string());

    let mut event = CalendarEvent::new(date, time, currency, Impact::classify(&impact_label), name);
    event.forecast = first_string(record, &["forecast", "estimate"]);
    event.actual = first_string(record, &["actual"]);
    event.previous = first_string(record, &["previous", "prev"]);
    Some(event)
}

/// 후보 키들 중 첫 번째로 존재하는 비어 있지 않은 값을 문자열로 반환.
fn first_string(record: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match record.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}
