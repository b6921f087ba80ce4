//! 시뮬레이션 거래 세션.
//!
//! 네트워크 없이 결정적인 캔들 데이터를 생성합니다. 테스트와 로컬 개발에서
//! 실제 백엔드 대신 사용합니다.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use fx_core::{Candle, Timeframe};

use crate::traits::{SessionCredentials, SessionProvider, TradingSession};
use crate::{ExchangeError, ExchangeResult};

/// 시뮬레이션 세션 제공자.
pub struct SimulatedSessionProvider {
    logouts: Arc<AtomicUsize>,
    fail_history: bool,
}

impl SimulatedSessionProvider {
    /// 정상 동작하는 제공자 생성.
    pub fn new() -> Self {
        Self {
            logouts: Arc::new(AtomicUsize::new(0)),
            fail_history: false,
        }
    }

    /// history 호출이 항상 실패하는 제공자 생성 (에러 경로 테스트용).
    pub fn failing() -> Self {
        Self {
            logouts: Arc::new(AtomicUsize::new(0)),
            fail_history: true,
        }
    }

    /// 지금까지의 로그아웃 횟수 반환.
    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedSessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for SimulatedSessionProvider {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn login(
        &self,
        credentials: &SessionCredentials,
    ) -> ExchangeResult<Arc<dyn TradingSession>> {
        if credentials.username.is_empty() {
            return Err(ExchangeError::Unauthorized(
                "username must not be empty".to_string(),
            ));
        }

        Ok(Arc::new(SimulatedSession {
            logouts: Arc::clone(&self.logouts),
            fail_history: self.fail_history,
        }))
    }
}

/// 시뮬레이션 세션.
pub struct SimulatedSession {
    logouts: Arc<AtomicUsize>,
    fail_history: bool,
}

#[async_trait]
impl TradingSession for SimulatedSession {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn get_history(
        &self,
        instrument: &str,
        timeframe: Timeframe,
        count: u32,
    ) -> ExchangeResult<Vec<Candle>> {
        if self.fail_history {
            return Err(ExchangeError::Connection(
                "simulated connection failure".to_string(),
            ));
        }

        Ok(generate_candles(instrument, timeframe, count))
    }

    async fn logout(&self) -> ExchangeResult<()> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// 상품/타임프레임별 시드.
fn seed_for(instrument: &str, timeframe: Timeframe) -> u64 {
    let name_hash = instrument
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
    name_hash ^ timeframe.as_secs()
}

/// 상품의 기준 가격 (스케일 5의 정수 틱).
fn base_ticks(instrument: &str) -> i64 {
    match instrument {
        "GBP/USD" => 127_000,
        "EUR/USD" => 108_500,
        "USD/JPY" => 14_750_000,
        "XAU/USD" => 245_000_000,
        _ => 100_000,
    }
}

/// 결정적인 랜덤 워크 캔들 생성.
///
/// 틱(스케일 5의 정수) 단위로 계산하여 부동소수점 없이 정확한 다섯 자리
/// 가격을 만듭니다. 캔들은 시간 오름차순으로 반환됩니다.
fn generate_candles(instrument: &str, timeframe: Timeframe, count: u32) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(seed_for(instrument, timeframe));
    let step = Duration::seconds(timeframe.as_secs() as i64);
    let now = Utc::now();

    let mut price = base_ticks(instrument);
    let mut candles = Vec::with_capacity(count as usize);

    for i in (0..count).rev() {
        let time = now - step * (i as i32 + 1);
        let open = price;
        let close = open + rng.gen_range(-80..=80);
        let high = open.max(close) + rng.gen_range(0..=30);
        let low = open.min(close) - rng.gen_range(0..=30);
        price = close;

        candles.push(Candle::new(
            time,
            Decimal::new(open, 5),
            Decimal::new(high, 5),
            Decimal::new(low, 5),
            Decimal::new(close, 5),
        ));
    }

    candles
}
