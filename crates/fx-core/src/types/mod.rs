//! 기본 시장 데이터 타입.

pub mod candle;
pub mod timeframe;

pub use candle::{Candle, PRICE_SCALE};
pub use timeframe::Timeframe;
