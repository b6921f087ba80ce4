//! 도메인 모델.

pub mod calendar;

pub use calendar::{
    normalize_time_label, CalendarEvent, EventFilter, Impact, ImpactKeywords, SourceResult,
    SourceStatus,
};
