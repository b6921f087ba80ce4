//! 벤더 캘린더 API 소스.
//!
//! 두 벤더의 응답 형식이 다릅니다:
//! - 1순위: 이벤트 레코드의 평탄한 배열, API 키 헤더 인증
//! - 2순위: `{"events": [...]}` 래퍼, 숫자 importance(1~3)
//!
//! 소스별 필드를 정규화된 `CalendarEvent`로 변환하는 것은 각 소스의
//! 책임입니다.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use fx_core::{normalize_time_label, CalendarEvent, Impact};

use super::parse_event_date;
use crate::currency::code_for_country;
use crate::{CalendarError, CalendarResult};

/// 1순위 벤더 API 클라이언트.
pub struct PrimaryCalendarApi {
    client: Client,
    url: String,
    api_key: Option<String>,
}

/// 1순위 벤더의 이벤트 레코드.
#[derive(Debug, Deserialize)]
struct PrimaryEvent {
    date: String,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    impact: Option<String>,
    event: String,
    #[serde(default)]
    forecast: Option<String>,
    #[serde(default)]
    actual: Option<String>,
    #[serde(default)]
    previous: Option<String>,
}

impl PrimaryCalendarApi {
    /// 새 클라이언트 생성.
    pub fn new(client: Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
        }
    }

    /// 캘린더 이벤트 조회.
    pub async fn fetch(&self) -> CalendarResult<Vec<CalendarEvent>> {
        let mut request = self.client.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CalendarError::RateLimited);
        }

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CalendarError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let records: Vec<PrimaryEvent> = serde_json::from_str(&body)
            .map_err(|e| CalendarError::Parse(format!("1순위 벤더 응답 파싱 실패: {}", e)))?;

        debug!(records = records.len(), "Primary vendor API responded");
        Ok(records.into_iter().filter_map(normalize_primary).collect())
    }
}

/// 1순위 벤더 레코드를 정규화된 이벤트로 변환.
///
/// 날짜나 통화를 결정할 수 없는 레코드는 조용히 건너뜁니다.
fn normalize_primary(record: PrimaryEvent) -> Option<CalendarEvent> {
    let date = parse_event_date(&record.date)?;
    let currency = resolve_currency(record.currency.as_deref(), record.country.as_deref())?;
    let impact = Impact::classify(record.impact.as_deref().unwrap_or(""));
    let time = normalize_time_label(record.time.as_deref().unwrap_or(""));

    let mut event = CalendarEvent::new(date, time, currency, impact, record.event);
    event.forecast = non_empty(record.forecast);
    event.actual = non_empty(record.actual);
    event.previous = non_empty(record.previous);
    Some(event)
}

/// 2순위 벤더 API 클라이언트.
pub struct SecondaryCalendarApi {
    client: Client,
    url: String,
}

/// 2순위 벤더 응답 래퍼.
#[derive(Debug, Deserialize)]
struct SecondaryResponse {
    events: Vec<SecondaryEvent>,
}

/// 2순위 벤더의 이벤트 레코드.
#[derive(Debug, Deserialize)]
struct SecondaryEvent {
    date: String,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    /// 숫자 importance: 1(낮음) ~ 3(높음)
    #[serde(default)]
    importance: Option<i64>,
    title: String,
    #[serde(default)]
    estimate: Option<serde_json::Value>,
    #[serde(default)]
    actual: Option<serde_json::Value>,
    #[serde(default)]
    previous: Option<serde_json::Value>,
}

impl SecondaryCalendarApi {
    /// 새 클라이언트 생성.
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// 캘린더 이벤트 조회.
    pub async fn fetch(&self) -> CalendarResult<Vec<CalendarEvent>> {
        let response = self.client.get(&self.url).send().await?;
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CalendarError::RateLimited);
        }

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CalendarError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SecondaryResponse = serde_json::from_str(&body)
            .map_err(|e| CalendarError::Parse(format!("2순위 벤더 응답 파싱 실패: {}", e)))?;

        debug!(records = parsed.events.len(), "Secondary vendor API responded");
        Ok(parsed
            .events
            .into_iter()
            .filter_map(normalize_secondary)
            .collect())
    }
}

/// 2순위 벤더 레코드를 정규화된 이벤트로 변환.
fn normalize_secondary(record: SecondaryEvent) -> Option<CalendarEvent> {
    let date = parse_event_date(&record.date)?;
    let currency = resolve_currency(record.currency.as_deref(), record.country.as_deref())?;
    // 숫자 importance는 이 벤더의 고정 스키마이므로 직접 매핑
    let impact = match record.importance {
        Some(1) => Impact::Low,
        Some(2) => Impact::Medium,
        Some(3) => Impact::High,
        Some(other) => {
            warn!(importance = other, "Unexpected importance value");
            Impact::Unknown(other.to_string())
        }
        None => Impact::Unknown(String::new()),
    };
    let time = normalize_time_label(record.time.as_deref().unwrap_or(""));

    let mut event = CalendarEvent::new(date, time, currency, impact, record.title);
    event.forecast = value_to_string(record.estimate);
    event.actual = value_to_string(record.actual);
    event.previous = value_to_string(record.previous);
    Some(event)
}

/// 통화 코드 결정: currency 필드 우선, 없으면 country 필드를 역변환.
fn resolve_currency(currency: Option<&str>, country: Option<&str>) -> Option<String> {
    if let Some(code) = currency {
        let code = code.trim().to_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Some(code);
        }
    }
    country
        .and_then(code_for_country)
        .map(|code| code.to_string())
}

/// 비어 있지 않은 값만 유지.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// 숫자 또는 문자열 값을 표시 문자열로 변환.
fn value_to_string(value: Option<serde_json::Value>) -> Option<String> {
    match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
