//! FXCM 스타일 거래 백엔드 REST 커넥터.
//!
//! 지원 기능:
//! - 세션 로그인 (POST /trading/login)
//! - 과거 캔들 조회 (GET /candles)
//! - 세션 로그아웃 (POST /trading/logout)

mod client;
mod config;

pub use client::{FxcmSession, FxcmSessionProvider, SessionStatus};
pub use config::{FxcmConfig, DEFAULT_CONNECTION, DEFAULT_HOST_URL};
