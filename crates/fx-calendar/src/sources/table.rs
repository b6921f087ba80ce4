//! HTML 테이블 파싱 소스.
//!
//! 인라인 스크립트 추출이 전부 실패했을 때, 같은 페이지의 캘린더 테이블
//! 마크업에서 이벤트를 복원합니다. 관례적인 열 배치를 가정합니다:
//! 시각, 통화, 영향도, 이벤트, 실제치, 예측치, 이전치.

use chrono::NaiveDate;
use scraper::{Html, Selector};
use tracing::debug;

use fx_core::{normalize_time_label, CalendarEvent, Impact};

/// 페이지의 캘린더 테이블에서 이벤트 추출.
///
/// 테이블 행이 없거나 형식이 맞지 않으면 빈 목록을 반환합니다.
/// 이 단계에서 빈 결과는 에러가 아닙니다.
pub fn parse_calendar_table(html: &str, default_date: NaiveDate) -> Vec<CalendarEvent> {
    let document = Html::parse_document(html);

    let row_selector = match Selector::parse("tr") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };
    let cell_selector = match Selector::parse("td") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut events = Vec::new();

    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();

        if cells.len() < 4 {
            continue;
        }

        // 통화 열이 3글자 코드가 아니면 데이터 행이 아님 (헤더, 날짜 구분 행 등)
        let currency = cells[1].to_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            continue;
        }

        let event_name = cells[3].clone();
        if event_name.is_empty() {
            continue;
        }

        // 영향도는 셀 텍스트 우선, 없으면 행의 class 속성에서 복원
        let impact_label = if cells[2].is_empty() {
            row.value().attr("class").unwrap_or("").to_string()
        } else {
            cells[2].clone()
        };

        let mut event = CalendarEvent::new(
            default_date,
            normalize_time_label(&cells[0]),
            currency,
            Impact::classify(&impact_label),
            event_name,
        );
        event.actual = data_cell(cells.get(4));
        event.forecast = data_cell(cells.get(5));
        event.previous = data_cell(cells.get(6));
        events.push(event);
    }

    debug!(events = events.len(), "Calendar table parsed");
    events
}

/// 데이터 셀 정리: 빈 값과 자리표시자는 제외.
fn data_cell(cell: Option<&String>) -> Option<String> {
    cell.map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty() && c != "-" && c != "\u{a0}")
}
