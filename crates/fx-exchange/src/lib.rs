//! 거래 백엔드 연결 및 캔들 데이터 처리.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - TradingSession / SessionProvider trait: 거래 백엔드 통합 인터페이스
//! - FXCM 스타일 REST 커넥터 (로그인 / history / 로그아웃)
//! - 타임프레임별 캔들 조회 어댑터
//! - 시뮬레이션 세션 (테스트용)

pub mod adapter;
pub mod connector;
pub mod error;
pub mod simulated;
pub mod traits;

pub use adapter::{fetch_all_timeframes, fetch_candles, with_session, CandleCounts, MultiTimeframeSeries};
pub use connector::fxcm::{
    FxcmConfig, FxcmSession, FxcmSessionProvider, DEFAULT_CONNECTION, DEFAULT_HOST_URL,
};
pub use error::*;
pub use simulated::{SimulatedSession, SimulatedSessionProvider};
pub use traits::*;
