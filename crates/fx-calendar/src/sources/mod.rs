//! 캘린더 데이터 소스.
//!
//! 각 소스는 소스별 레코드를 정규화된 `CalendarEvent`로 변환하는
//! `Result` 반환 함수를 제공합니다. 폴백 체인은 이 함수들을 우선순위
//! 순서로 합성합니다.

pub mod scrape;
pub mod synthetic;
pub mod table;
pub mod vendor;

use chrono::NaiveDate;

/// 소스가 쓰는 다양한 날짜 표기 파싱.
pub(crate) fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    // ISO 날짜시간 ("2026-08-05T08:30:00")의 날짜 부분
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(parse_event_date("2026-08-05"), Some(expected));
        assert_eq!(parse_event_date("2026/08/05"), Some(expected));
        assert_eq!(parse_event_date("20260805"), Some(expected));
        assert_eq!(parse_event_date("08/05/2026"), Some(expected));
        assert_eq!(parse_event_date("2026-08-05T08:30:00"), Some(expected));
        assert_eq!(parse_event_date("not a date"), None);
    }
}
