//! 합성 캘린더 데이터 생성기.
//!
//! 폴백 체인의 종단 단계로, 절대 실패하지 않습니다. 같은 날짜에 대해
//! 항상 같은 데이터를 만들도록 날짜로 시드된 RNG를 사용합니다.
//! 수치는 자리표시자일 뿐 계약이 아닙니다.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fx_core::{CalendarEvent, Impact};

/// 합성 소스 이름.
pub const SOURCE_NAME: &str = "synthetic";

/// 샘플 이벤트 템플릿: (시각, 통화, 영향도, 이름, 기준값, 단위).
const TEMPLATES: &[(&str, &str, Impact, &str, f64, &str)] = &[
    ("08:30", "USD", Impact::High, "Nonfarm Payrolls", 180.0, "K"),
    ("08:30", "USD", Impact::Medium, "Initial Jobless Claims", 230.0, "K"),
    ("10:00", "USD", Impact::Low, "Wholesale Inventories MoM", 0.4, "%"),
    ("09:00", "EUR", Impact::High, "CPI YoY", 2.4, "%"),
    ("10:00", "EUR", Impact::Medium, "ZEW Economic Sentiment", 42.0, ""),
    ("07:00", "GBP", Impact::High, "GDP QoQ", 0.3, "%"),
    ("23:50", "JPY", Impact::Medium, "Trade Balance", 320.0, "B"),
    ("All Day", "CHF", Impact::Holiday, "Bank Holiday", 0.0, ""),
];

/// 하루치 합성 이벤트 생성.
///
/// 같은 날짜에는 항상 같은 결과를 반환합니다.
pub fn generate(date: NaiveDate) -> Vec<CalendarEvent> {
    let mut rng = StdRng::seed_from_u64(date.num_days_from_ce() as u64);

    TEMPLATES
        .iter()
        .map(|(time, currency, impact, name, base, unit)| {
            let mut event =
                CalendarEvent::new(date, *time, *currency, impact.clone(), *name);
            if *base != 0.0 {
                let jitter = rng.gen_range(0.95..1.05);
                let drift = rng.gen_range(0.95..1.05);
                event.forecast = Some(format_value(base * jitter, unit));
                event.previous = Some(format_value(base * jitter * drift, unit));
            }
            event
        })
        .collect()
}

/// 값을 표시 문자열로 포맷.
fn format_value(value: f64, unit: &str) -> String {
    format!("{:.1}{}", value, unit)
}
