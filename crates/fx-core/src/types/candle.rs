//! OHLC 캔들 구조체.
//!
//! 캔들은 요청-응답 사이클 동안만 유지되며 생성 후 변경되지 않습니다.
//! 영속화는 하지 않습니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 가격의 소수점 자릿수.
///
/// 거래 백엔드가 반환하는 호가를 다섯 자리로 반올림합니다.
pub const PRICE_SCALE: u32 = 5;

/// 하나의 OHLC 가격 캔들.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시간
    pub time: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    ///
    /// 모든 가격은 `PRICE_SCALE` 자리로 반올림됩니다.
    pub fn new(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> Self {
        Self {
            time,
            open: open.round_dp(PRICE_SCALE),
            high: high.round_dp(PRICE_SCALE),
            low: low.round_dp(PRICE_SCALE),
            close: close.round_dp(PRICE_SCALE),
        }
    }

    /// 상승 캔들인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 고가-저가 범위를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }
}
