//! 거래 세션 trait 정의.
//!
//! 거래 백엔드는 외부 협력자로 취급합니다: 로그인으로 세션을 얻고,
//! 세션으로 캔들을 조회하고, 모든 종료 경로에서 로그아웃합니다.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use fx_core::{Candle, Timeframe};

use crate::ExchangeError;

/// 거래 백엔드 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 세션 로그인 자격증명.
///
/// 요청마다 새로 전달되며 저장되지 않습니다. 비밀번호는 로그에
/// 노출되지 않도록 `SecretString`으로 감쌉니다.
#[derive(Debug)]
pub struct SessionCredentials {
    /// 계정 이름
    pub username: String,
    /// 비밀번호
    pub password: SecretString,
    /// 백엔드 호스트 URL
    pub host_url: String,
    /// 연결 종류 (예: "Real", "Demo")
    pub connection: String,
}

impl SessionCredentials {
    /// 새 자격증명 생성.
    pub fn new(
        username: impl Into<String>,
        password: SecretString,
        host_url: impl Into<String>,
        connection: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password,
            host_url: host_url.into(),
            connection: connection.into(),
        }
    }
}

/// 로그인된 거래 세션.
///
/// 세션은 요청 간에 재사용하지 않습니다. 하나의 요청이 하나의 세션을
/// 열고 닫습니다.
#[async_trait]
pub trait TradingSession: Send + Sync {
    /// 세션이 연결된 백엔드 이름 반환.
    fn name(&self) -> &str;

    /// 과거 캔들 조회.
    ///
    /// # 인자
    /// * `instrument` - 상품 (예: "GBP/USD")
    /// * `timeframe` - 타임프레임
    /// * `count` - 최대 캔들 개수
    async fn get_history(
        &self,
        instrument: &str,
        timeframe: Timeframe,
        count: u32,
    ) -> ExchangeResult<Vec<Candle>>;

    /// 세션 로그아웃.
    async fn logout(&self) -> ExchangeResult<()>;
}

/// 세션 로그인을 제공하는 백엔드.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// 백엔드 이름 반환.
    fn name(&self) -> &str;

    /// 자격증명으로 로그인하여 새 세션 반환.
    async fn login(&self, credentials: &SessionCredentials) -> ExchangeResult<Arc<dyn TradingSession>>;
}
