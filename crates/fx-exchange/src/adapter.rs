//! 타임프레임별 캔들 조회 어댑터.
//!
//! 멀티 타임프레임 요청 하나가 하나의 세션을 사용합니다. 어댑터는
//! 타임프레임마다 history를 호출하고, 어느 하나라도 실패하면 전체 요청을
//! 중단합니다 (all-or-nothing). 세션 해제는 `with_session`이 보장합니다.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

use fx_core::{Candle, Timeframe};

use crate::traits::{SessionCredentials, SessionProvider, TradingSession};
use crate::{ExchangeError, ExchangeResult};

/// 타임프레임별 요청 캔들 개수.
#[derive(Debug, Clone, Copy)]
pub struct CandleCounts {
    /// 일봉 개수
    pub d1: u32,
    /// 4시간봉 개수
    pub h4: u32,
    /// 1시간봉 개수
    pub h1: u32,
    /// 15분봉 개수
    pub m15: u32,
    /// 5분봉 개수
    pub m5: u32,
    /// 1분봉 개수
    pub m1: u32,
}

/// 한 상품의 멀티 타임프레임 캔들 묶음.
#[derive(Debug, Clone)]
pub struct MultiTimeframeSeries {
    /// 일봉
    pub daily: Vec<Candle>,
    /// 4시간봉
    pub h4: Vec<Candle>,
    /// 1시간봉
    pub h1: Vec<Candle>,
    /// 15분봉
    pub m15: Vec<Candle>,
    /// 5분봉
    pub m5: Vec<Candle>,
    /// 1분봉
    pub m1: Vec<Candle>,
}

/// 한 타임프레임의 캔들 조회.
///
/// 세션 에러를 실패한 타임프레임이 명시된 `ExchangeError::Fetch`로
/// 변환합니다.
pub async fn fetch_candles(
    session: &dyn TradingSession,
    instrument: &str,
    timeframe: Timeframe,
    count: u32,
) -> ExchangeResult<Vec<Candle>> {
    let candles = session
        .get_history(instrument, timeframe, count)
        .await
        .map_err(|e| ExchangeError::Fetch {
            timeframe,
            cause: e.to_string(),
        })?;

    debug!(
        instrument,
        timeframe = %timeframe,
        count = candles.len(),
        "Fetched candles"
    );

    Ok(candles)
}

/// 모든 타임프레임의 캔들 조회.
///
/// 타임프레임은 우선순위 순서(일봉 → 분봉)로 순차 조회합니다.
/// 하나라도 실패하면 즉시 전체 요청이 실패합니다.
pub async fn fetch_all_timeframes(
    session: &dyn TradingSession,
    instrument: &str,
    counts: &CandleCounts,
) -> ExchangeResult<MultiTimeframeSeries> {
    info!(instrument, "Fetching multi-timeframe history");

    let series = MultiTimeframeSeries {
        daily: fetch_candles(session, instrument, Timeframe::D1, counts.d1).await?,
        h4: fetch_candles(session, instrument, Timeframe::H4, counts.h4).await?,
        h1: fetch_candles(session, instrument, Timeframe::H1, counts.h1).await?,
        m15: fetch_candles(session, instrument, Timeframe::M15, counts.m15).await?,
        m5: fetch_candles(session, instrument, Timeframe::M5, counts.m5).await?,
        m1: fetch_candles(session, instrument, Timeframe::M1, counts.m1).await?,
    };

    info!(
        instrument,
        daily = series.daily.len(),
        h1 = series.h1.len(),
        m15 = series.m15.len(),
        "Multi-timeframe history fetched"
    );

    Ok(series)
}

/// 범위가 지정된 세션으로 작업 실행.
///
/// 로그인 → 작업 → 로그아웃 순서로 실행하며, 작업의 성공/실패와 무관하게
/// 로그아웃을 시도합니다. 로그아웃 실패는 경고로만 기록하고 작업의 결과를
/// 그대로 반환합니다.
pub async fn with_session<T, F, Fut>(
    provider: &dyn SessionProvider,
    credentials: &SessionCredentials,
    operation: F,
) -> ExchangeResult<T>
where
    F: FnOnce(Arc<dyn TradingSession>) -> Fut,
    Fut: Future<Output = ExchangeResult<T>>,
{
    let session = provider.login(credentials).await?;

    let result = operation(Arc::clone(&session)).await;

    if let Err(e) = session.logout().await {
        warn!("Error during logout: {}", e);
    }

    result
}
