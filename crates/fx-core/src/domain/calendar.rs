//! 경제 캘린더 도메인 모델.
//!
//! 이 모듈은 여러 데이터 소스의 이질적인 레코드를 하나의 정규화된
//! 스키마로 통합하기 위한 타입을 정의합니다:
//! - `CalendarEvent`: 정규화된 캘린더 이벤트
//! - `Impact`: 퍼지 분류를 지원하는 영향도
//! - `EventFilter`: 통화/영향도 필터
//! - `SourceResult`: 폴백 체인의 단계별 결과

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 영향도 분류에 사용되는 키워드 패밀리.
///
/// 소스마다 영향도 표기가 다르기 때문에 (색상 이름, 자유 텍스트 등)
/// 키워드 패밀리로 통합합니다. 패밀리 목록은 코드가 아니라 설정 데이터로
/// 취급하며, 숫자 표기("1"~"3")는 의도적으로 어떤 패밀리에도 넣지 않습니다.
#[derive(Debug, Clone)]
pub struct ImpactKeywords {
    /// High 패밀리
    pub high: Vec<String>,
    /// Medium 패밀리
    pub medium: Vec<String>,
    /// Low 패밀리
    pub low: Vec<String>,
    /// Holiday 패밀리
    pub holiday: Vec<String>,
}

impl Default for ImpactKeywords {
    fn default() -> Self {
        Self {
            high: vec!["high".to_string(), "red".to_string()],
            medium: vec![
                "medium".to_string(),
                "moderate".to_string(),
                "orange".to_string(),
                "yellow".to_string(),
            ],
            low: vec!["low".to_string(), "green".to_string()],
            holiday: vec!["holiday".to_string()],
        }
    }
}

/// 경제 이벤트의 영향도.
///
/// `Unknown`은 분류되지 않은 원본 레이블을 그대로 보존합니다.
/// 필터의 정확 일치 비교가 원본 텍스트를 기준으로 동작해야 하기 때문입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Impact {
    /// 낮은 영향
    Low,
    /// 중간 영향
    Medium,
    /// 높은 영향
    High,
    /// 공휴일
    Holiday,
    /// 분류되지 않은 원본 레이블
    Unknown(String),
}

impl Impact {
    /// 표시 레이블 반환.
    pub fn label(&self) -> &str {
        match self {
            Impact::Low => "Low",
            Impact::Medium => "Medium",
            Impact::High => "High",
            Impact::Holiday => "Holiday",
            Impact::Unknown(raw) => raw,
        }
    }

    /// 기본 키워드 패밀리로 원본 레이블을 분류합니다.
    pub fn classify(raw: &str) -> Impact {
        Self::classify_with(raw, &ImpactKeywords::default())
    }

    /// 주어진 키워드 패밀리로 원본 레이블을 분류합니다.
    ///
    /// 패밀리는 High → Medium → Low → Holiday 순서로 검사합니다.
    /// "yellow"가 Low의 "low"를 부분 문자열로 포함하기 때문에
    /// Medium을 먼저 검사해야 합니다.
    pub fn classify_with(raw: &str, keywords: &ImpactKeywords) -> Impact {
        let label = raw.trim();
        let lower = label.to_lowercase();

        let families = [
            (&keywords.high, Impact::High),
            (&keywords.medium, Impact::Medium),
            (&keywords.low, Impact::Low),
            (&keywords.holiday, Impact::Holiday),
        ];

        for (words, impact) in families {
            if words.iter().any(|w| lower.contains(w.as_str())) {
                return impact;
            }
        }

        Impact::Unknown(label.to_string())
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Impact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Impact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Impact::classify(&raw))
    }
}

/// 정규화된 경제 캘린더 이벤트.
///
/// 생성 후 변경되지 않으며, 한 응답의 수명 동안만 유지됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// 이벤트 날짜
    pub date: NaiveDate,
    /// 시각 레이블 ("08:30") 또는 텍스트 레이블 ("All Day", "Tentative")
    pub time: String,
    /// 3글자 통화 코드
    pub currency: String,
    /// 영향도
    pub impact: Impact,
    /// 이벤트 이름
    pub event: String,
    /// 예측치
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<String>,
    /// 실제치
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// 이전치
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

impl CalendarEvent {
    /// 필수 필드만으로 새 이벤트를 생성합니다.
    pub fn new(
        date: NaiveDate,
        time: impl Into<String>,
        currency: impl Into<String>,
        impact: Impact,
        event: impl Into<String>,
    ) -> Self {
        Self {
            date,
            time: time.into(),
            currency: currency.into(),
            impact,
            event: event.into(),
            forecast: None,
            actual: None,
            previous: None,
        }
    }

    /// (날짜, 시각) 기준 정렬 키.
    ///
    /// 시각은 0이 채워진 문자열을 가정하고 사전식으로 비교합니다.
    pub fn sort_key(&self) -> (NaiveDate, &str) {
        (self.date, self.time.as_str())
    }
}

/// 시각 레이블 정규화.
///
/// 정렬이 사전식 비교로 동작하려면 시각이 0으로 채워져 있어야 합니다.
/// "8:30" → "08:30", "8:30am" → "08:30", "1:15pm" → "13:15".
/// 시각이 아닌 레이블("All Day", "Tentative")은 그대로 반환합니다.
pub fn normalize_time_label(raw: &str) -> String {
    let label = raw.trim();
    if label.is_empty() {
        return "All Day".to_string();
    }

    let lower = label.to_lowercase();
    let (clock, meridiem) = if let Some(stripped) = lower.strip_suffix("am") {
        (stripped.trim(), Some(false))
    } else if let Some(stripped) = lower.strip_suffix("pm") {
        (stripped.trim(), Some(true))
    } else {
        (lower.as_str(), None)
    };

    let mut parts = clock.splitn(2, ':');
    if let (Some(h), Some(m)) = (parts.next(), parts.next()) {
        if let (Ok(hour), Ok(minute)) = (h.trim().parse::<u32>(), m.trim().parse::<u32>()) {
            if hour < 24 && minute < 60 {
                let hour = match meridiem {
                    Some(true) if hour < 12 => hour + 12,
                    Some(false) if hour == 12 => 0,
                    _ => hour,
                };
                return format!("{:02}:{:02}", hour, minute);
            }
        }
    }

    label.to_string()
}

/// 통화/영향도 이벤트 필터.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// 통화 코드 집합 (대문자). 비어 있으면 모든 통화를 통과시킵니다.
    pub currencies: Vec<String>,
    /// 영향도 필터 텍스트. "all"(대소문자 무관)은 영향도 필터를 우회합니다.
    pub impact: String,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            currencies: Vec::new(),
            impact: "all".to_string(),
        }
    }
}

impl EventFilter {
    /// 새 필터 생성.
    pub fn new(currencies: Vec<String>, impact: impl Into<String>) -> Self {
        Self {
            currencies,
            impact: impact.into(),
        }
    }

    /// 영향도 필터가 비활성인지 확인.
    pub fn passes_all_impacts(&self) -> bool {
        self.impact.is_empty() || self.impact.eq_ignore_ascii_case("all")
    }

    /// 이벤트가 이 필터를 통과하는지 확인.
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        if !self.currencies.is_empty() && !self.currencies.contains(&event.currency) {
            return false;
        }
        if self.passes_all_impacts() {
            return true;
        }
        impact_matches(&self.impact, &event.impact)
    }

    /// 필터를 적용하고 (날짜, 시각) 오름차순으로 정렬합니다.
    pub fn apply(&self, events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
        let mut filtered: Vec<CalendarEvent> =
            events.into_iter().filter(|e| self.matches(e)).collect();
        filtered.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        filtered
    }
}

/// 영향도 필터 텍스트와 이벤트 영향도 비교.
///
/// 기록된 레이블과의 정확 일치를 먼저 검사하고, 그 다음 키워드 패밀리로
/// 비교합니다. 분류되지 않는 필터 텍스트(예: "3")는 동일한 원본 레이블을
/// 가진 이벤트에만 일치합니다.
fn impact_matches(filter: &str, impact: &Impact) -> bool {
    if impact.label().eq_ignore_ascii_case(filter.trim()) {
        return true;
    }
    match Impact::classify(filter) {
        Impact::Unknown(_) => false,
        classified => classified == *impact,
    }
}

/// 폴백 체인 단계의 결과 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// 하나 이상의 이벤트 확보
    Success,
    /// 단계는 성공했지만 필터 통과 이벤트 없음
    Empty,
    /// 단계 실패 (체인은 다음 단계로 진행)
    Error,
}

/// 하나의 데이터 소스가 만들어낸 결과.
///
/// 오케스트레이터는 status가 `Success`이고 이벤트가 비어 있지 않은 첫 결과에서
/// 체인을 멈춥니다.
#[derive(Debug, Clone, Serialize)]
pub struct SourceResult {
    /// 소스 이름
    pub source: String,
    /// 결과 상태
    pub status: SourceStatus,
    /// 필터와 정렬이 적용된 이벤트
    pub events: Vec<CalendarEvent>,
}

impl SourceResult {
    /// 성공 결과 생성.
    pub fn success(source: impl Into<String>, events: Vec<CalendarEvent>) -> Self {
        Self {
            source: source.into(),
            status: SourceStatus::Success,
            events,
        }
    }

    /// 빈 결과 생성.
    pub fn empty(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            status: SourceStatus::Empty,
            events: Vec::new(),
        }
    }

    /// 에러 결과 생성.
    pub fn error(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            status: SourceStatus::Error,
            events: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(currency: &str, impact: Impact) -> CalendarEvent {
        CalendarEvent::new(
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            "08:30",
            currency,
            impact,
            "Test Event",
        )
    }

    #[test]
    fn test_classify_exact_labels() {
        assert_eq!(Impact::classify("High"), Impact::High);
        assert_eq!(Impact::classify("medium"), Impact::Medium);
        assert_eq!(Impact::classify("LOW"), Impact::Low);
        assert_eq!(Impact::classify("Holiday"), Impact::Holiday);
    }

    #[test]
    fn test_classify_color_families() {
        assert_eq!(Impact::classify("red"), Impact::High);
        assert_eq!(Impact::classify("Orange"), Impact::Medium);
        assert_eq!(Impact::classify("yellow"), Impact::Medium);
        assert_eq!(Impact::classify("green"), Impact::Low);
    }

    #[test]
    fn test_classify_numeric_stays_unknown() {
        // 숫자 표기는 패밀리에 속하지 않음
        assert_eq!(Impact::classify("3"), Impact::Unknown("3".to_string()));
        assert_eq!(Impact::classify("1"), Impact::Unknown("1".to_string()));
    }

    #[test]
    fn test_orange_event_matches_medium_filter() {
        let e = event("USD", Impact::classify("Orange"));
        let filter = EventFilter::new(vec![], "Medium");
        assert!(filter.matches(&e));
    }

    #[test]
    fn test_numeric_impact_only_matches_exact_text() {
        let e = event("USD", Impact::classify("3"));
        assert!(EventFilter::new(vec![], "3").matches(&e));
        assert!(!EventFilter::new(vec![], "High").matches(&e));
        assert!(!EventFilter::new(vec![], "Medium").matches(&e));
    }

    #[test]
    fn test_impact_all_bypasses_filtering() {
        let e = event("USD", Impact::Unknown("whatever".to_string()));
        assert!(EventFilter::new(vec![], "all").matches(&e));
        assert!(EventFilter::new(vec![], "ALL").matches(&e));
    }

    #[test]
    fn test_currency_membership() {
        let filter = EventFilter::new(vec!["USD".to_string(), "EUR".to_string()], "all");
        assert!(filter.matches(&event("USD", Impact::High)));
        assert!(filter.matches(&event("EUR", Impact::Low)));
        assert!(!filter.matches(&event("GBP", Impact::High)));

        // 빈 통화 필터는 모든 통화 통과
        let open = EventFilter::new(vec![], "all");
        assert!(open.matches(&event("JPY", Impact::Low)));
    }

    #[test]
    fn test_apply_sorts_by_date_then_time() {
        let d1 = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let mut e1 = event("USD", Impact::High);
        e1.date = d2;
        e1.time = "01:00".to_string();
        let mut e2 = event("USD", Impact::High);
        e2.date = d1;
        e2.time = "14:00".to_string();
        let mut e3 = event("USD", Impact::High);
        e3.date = d1;
        e3.time = "08:30".to_string();

        let sorted = EventFilter::default().apply(vec![e1, e2, e3]);
        assert_eq!(sorted[0].time, "08:30");
        assert_eq!(sorted[1].time, "14:00");
        assert_eq!(sorted[2].date, d2);
    }

    #[test]
    fn test_normalize_time_label() {
        assert_eq!(normalize_time_label("8:30"), "08:30");
        assert_eq!(normalize_time_label("08:30"), "08:30");
        assert_eq!(normalize_time_label("8:30am"), "08:30");
        assert_eq!(normalize_time_label("1:15pm"), "13:15");
        assert_eq!(normalize_time_label("12:00am"), "00:00");
        assert_eq!(normalize_time_label("12:30pm"), "12:30");
        assert_eq!(normalize_time_label("All Day"), "All Day");
        assert_eq!(normalize_time_label(""), "All Day");
    }

    #[test]
    fn test_impact_serialization() {
        let high = serde_json::to_string(&Impact::High).unwrap();
        assert_eq!(high, "\"High\"");
        let raw = serde_json::to_string(&Impact::Unknown("3".to_string())).unwrap();
        assert_eq!(raw, "\"3\"");

        let parsed: Impact = serde_json::from_str("\"Orange\"").unwrap();
        assert_eq!(parsed, Impact::Medium);
    }
}
