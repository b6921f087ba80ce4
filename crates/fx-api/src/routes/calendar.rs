//! 경제 캘린더 endpoint.
//!
//! 폴백 체인이 모든 소스 장애를 흡수하므로 이 엔드포인트는 일반적인
//! 가용성 문제로 실패하지 않습니다. 최악의 경우에도 합성 데이터를
//! 반환합니다.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use fx_calendar::normalize;
use fx_core::{CalendarEvent, EventFilter};

use crate::state::AppState;

// ==================== 요청/응답 타입 ====================

/// 캘린더 조회 쿼리.
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// 통화 필터 (예: "USD,EUR", "EURUSD", "XAU/USD")
    pub currencies: Option<String>,
    /// 영향도 필터 (기본값: "all")
    pub impact: Option<String>,
}

/// 적용된 필터 echo.
#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarFilters {
    /// 정규화된 통화 코드
    pub currencies: Vec<String>,
    /// 영향도 필터 텍스트
    pub impact: String,
}

/// 캘린더 조회 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarResponse {
    /// 처리 상태 ("success")
    pub status: String,
    /// 필터와 정렬이 적용된 이벤트
    pub events: Vec<CalendarEvent>,
    /// 이벤트 개수
    pub total_events: usize,
    /// 이벤트를 제공한 소스 이름
    pub source: String,
    /// 적용된 필터
    pub filters: CalendarFilters,
}

// ==================== Handler ====================

/// 경제 캘린더 조회.
///
/// GET /get-economic-calendar?currencies=USD,EUR&impact=High
pub async fn get_economic_calendar(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CalendarQuery>,
) -> Json<CalendarResponse> {
    let currencies = normalize(query.currencies.as_deref().unwrap_or(""));
    let impact = query.impact.unwrap_or_else(|| "all".to_string());

    let filter = EventFilter::new(currencies.clone(), impact.clone());
    let result = state.calendar.fetch_calendar(&filter).await;

    info!(
        source = %result.source,
        events = result.events.len(),
        "Calendar request served"
    );

    Json(CalendarResponse {
        status: "success".to_string(),
        total_events: result.events.len(),
        events: result.events,
        source: result.source,
        filters: CalendarFilters { currencies, impact },
    })
}

/// 캘린더 라우터 생성.
pub fn calendar_router() -> Router<Arc<AppState>> {
    Router::new().route("/get-economic-calendar", get(get_economic_calendar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::state::create_test_state;

    async fn fetch(uri: &str) -> CalendarResponse {
        let state = Arc::new(create_test_state());
        let app = calendar_router().with_state(state);

        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_calendar_without_filters() {
        let parsed = fetch("/get-economic-calendar").await;

        // 테스트 상태에서는 스크랩이 불가능하므로 합성 소스로 내려감
        assert_eq!(parsed.status, "success");
        assert_eq!(parsed.source, "synthetic");
        assert_eq!(parsed.total_events, parsed.events.len());
        assert!(!parsed.events.is_empty());
        assert!(parsed.filters.currencies.is_empty());
        assert_eq!(parsed.filters.impact, "all");
    }

    #[tokio::test]
    async fn test_calendar_currency_and_impact_filter() {
        let parsed = fetch("/get-economic-calendar?currencies=USD,EUR&impact=High").await;

        assert!(!parsed.events.is_empty());
        for event in &parsed.events {
            assert!(event.currency == "USD" || event.currency == "EUR");
            assert_eq!(event.impact.label(), "High");
        }
        assert_eq!(parsed.filters.currencies, vec!["USD", "EUR"]);
    }

    #[tokio::test]
    async fn test_calendar_pair_notation_filter() {
        let parsed = fetch("/get-economic-calendar?currencies=EURUSD").await;

        assert_eq!(parsed.filters.currencies, vec!["EUR", "USD"]);
        for event in &parsed.events {
            assert!(event.currency == "EUR" || event.currency == "USD");
        }
    }
}
