//! 폴백 체인 통합 테스트.
//!
//! mockito 서버로 각 단계의 실제 HTTP 동작을 재현합니다.

use fx_calendar::{CalendarConfig, CalendarFetcher};
use fx_core::{EventFilter, SourceStatus};

/// 인라인 JavaScript 리터럴이 포함된 캘린더 페이지.
///
/// 따옴표 없는 키, 작은따옴표, 후행 쉼표, undefined. 복구 엔진이
/// 처리해야 하는 형태 그대로입니다.
const CALENDAR_PAGE: &str = r#"<html><head></head><body>
<script type="text/javascript">
window.calendarComponentStates[1] = {
    days: [
        {
            date: '2026-08-05',
            events: [
                {name: 'CPI YoY', currency: 'USD', impact: 'High', time: '8:30', forecast: '3.2%', previous: '3.4%'},
                {name: 'ZEW Economic Sentiment', currency: 'EUR', impact: 'Orange', time: '10:00', actual: undefined},
                {name: 'GDP QoQ', currency: 'GBP', impact: 'low', time: '7:00'},
            ],
        },
    ],
};
</script>
</body></html>"#;

#[tokio::test]
async fn test_error_then_empty_then_scrape_wins() {
    let mut server = mockito::Server::new_async().await;

    // (a) 1순위 벤더: 서버 에러
    let primary = server
        .mock("GET", "/primary")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    // (b) 2순위 벤더: 성공했지만 빈 목록
    let secondary = server
        .mock("GET", "/secondary")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"events": []}"#)
        .create_async()
        .await;

    // (c) 캘린더 페이지: 이벤트 3개
    let page = server
        .mock("GET", "/calendar-page")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(CALENDAR_PAGE)
        .create_async()
        .await;

    let config = CalendarConfig {
        primary_api_url: Some(format!("{}/primary", server.url())),
        primary_api_key: Some("test-key".to_string()),
        secondary_api_url: Some(format!("{}/secondary", server.url())),
        scrape_url: format!("{}/calendar-page", server.url()),
        timeout_secs: 5,
    };

    let fetcher = CalendarFetcher::new(config);
    let result = fetcher.fetch_calendar(&EventFilter::default()).await;

    // 스크랩 단계가 승리하고 합성 생성기는 호출되지 않음
    assert_eq!(result.source, "site-scrape");
    assert_eq!(result.status, SourceStatus::Success);
    assert_eq!(result.events.len(), 3);

    // (날짜, 시각) 오름차순 정렬
    assert_eq!(result.events[0].event, "GDP QoQ");
    assert_eq!(result.events[0].time, "07:00");
    assert_eq!(result.events[1].event, "CPI YoY");
    assert_eq!(result.events[2].event, "ZEW Economic Sentiment");

    primary.assert_async().await;
    secondary.assert_async().await;
    page.assert_async().await;
}

#[tokio::test]
async fn test_primary_short_circuits_chain() {
    let mut server = mockito::Server::new_async().await;

    let primary = server
        .mock("GET", "/primary")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"date":"2026-08-05","time":"8:30am","currency":"USD","impact":"High","event":"Nonfarm Payrolls"}]"#,
        )
        .create_async()
        .await;

    // 뒤 단계가 호출되면 안 됨
    let page = server
        .mock("GET", "/calendar-page")
        .with_status(200)
        .with_body(CALENDAR_PAGE)
        .expect(0)
        .create_async()
        .await;

    let config = CalendarConfig {
        primary_api_url: Some(format!("{}/primary", server.url())),
        primary_api_key: None,
        secondary_api_url: None,
        scrape_url: format!("{}/calendar-page", server.url()),
        timeout_secs: 5,
    };

    let fetcher = CalendarFetcher::new(config);
    let result = fetcher.fetch_calendar(&EventFilter::default()).await;

    assert_eq!(result.source, "primary-api");
    assert_eq!(result.events.len(), 1);

    primary.assert_async().await;
    page.assert_async().await;
}

#[tokio::test]
async fn test_inline_failure_falls_back_to_table_on_same_page() {
    let mut server = mockito::Server::new_async().await;

    // 인라인 스크립트가 없는 페이지. 테이블 마크업만 존재
    let table_page = r#"<html><body><table>
        <tr><th>Time</th><th>Cur.</th><th>Imp.</th><th>Event</th></tr>
        <tr><td>8:30</td><td>USD</td><td>High</td><td>Nonfarm Payrolls</td><td>187K</td><td>180K</td><td>175K</td></tr>
    </table></body></html>"#;

    let page = server
        .mock("GET", "/calendar-page")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(table_page)
        .expect(1)
        .create_async()
        .await;

    let config = CalendarConfig {
        primary_api_url: None,
        primary_api_key: None,
        secondary_api_url: None,
        scrape_url: format!("{}/calendar-page", server.url()),
        timeout_secs: 5,
    };

    let fetcher = CalendarFetcher::new(config);
    let result = fetcher.fetch_calendar(&EventFilter::default()).await;

    // 페이지는 한 번만 가져오고(expect(1)) 테이블 단계가 복원
    assert_eq!(result.source, "site-table");
    assert_eq!(result.events.len(), 1);
    assert_eq!(result.events[0].event, "Nonfarm Payrolls");

    page.assert_async().await;
}

#[tokio::test]
async fn test_currency_filter_excludes_other_currencies() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/calendar-page")
        .with_status(200)
        .with_body(CALENDAR_PAGE)
        .create_async()
        .await;

    let config = CalendarConfig {
        primary_api_url: None,
        primary_api_key: None,
        secondary_api_url: None,
        scrape_url: format!("{}/calendar-page", server.url()),
        timeout_secs: 5,
    };

    let fetcher = CalendarFetcher::new(config);
    let filter = EventFilter::new(vec!["USD".to_string(), "EUR".to_string()], "all");
    let result = fetcher.fetch_calendar(&filter).await;

    assert_eq!(result.events.len(), 2);
    assert!(result
        .events
        .iter()
        .all(|e| e.currency == "USD" || e.currency == "EUR"));
}
