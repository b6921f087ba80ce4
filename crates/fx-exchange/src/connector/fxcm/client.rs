//! FXCM REST API 클라이언트.
//!
//! 세션 수명 주기는 외부 백엔드가 관리합니다. 로그인으로 세션 토큰을
//! 발급받고, 모든 history 호출에 토큰을 실어 보내고, 로그아웃으로
//! 토큰을 폐기합니다. 세션은 요청 간에 재사용하지 않습니다.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use fx_core::{Candle, Timeframe};

use super::config::FxcmConfig;
use crate::traits::{SessionCredentials, SessionProvider, TradingSession};
use crate::{ExchangeError, ExchangeResult};

/// 세션 연결 상태.
///
/// 백엔드의 상태 콜백에 대응하며, 전이는 tracing 이벤트로 기록됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// 연결 시도 중
    Connecting,
    /// 연결됨
    Connected,
    /// 연결 해제됨
    Disconnected,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Connecting => write!(f, "Connecting"),
            SessionStatus::Connected => write!(f, "Connected"),
            SessionStatus::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// 로그인 요청 본문.
#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    connection: &'a str,
}

/// 로그인 응답.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    /// 세션 토큰
    session_id: String,
}

/// history 응답의 캔들 행.
///
/// 백엔드는 Bid 호가 기준의 OHLC를 반환합니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CandleRow {
    /// "YYYY-MM-DD HH:MM:SS" 형식의 캔들 시작 시각
    date: String,
    bid_open: Decimal,
    bid_high: Decimal,
    bid_low: Decimal,
    bid_close: Decimal,
}

/// history 응답.
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    candles: Vec<CandleRow>,
}

/// FXCM 세션 제공자.
///
/// 로그인 호출마다 새 세션을 만듭니다. 세션 공유나 토큰 캐싱은 하지
/// 않습니다. 백엔드가 세션 재사용을 허용하지 않기 때문입니다.
pub struct FxcmSessionProvider {
    config: FxcmConfig,
}

impl FxcmSessionProvider {
    /// 새 세션 제공자 생성.
    pub fn new(config: FxcmConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionProvider for FxcmSessionProvider {
    fn name(&self) -> &str {
        "fxcm"
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

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| ExchangeError::Connection(format!("HTTP client 생성 실패: {}", e)))?;

        info!(
            username = %credentials.username,
            connection = %credentials.connection,
            "Session status: {}",
            SessionStatus::Connecting
        );

        let url = format!("{}/trading/login", base_url(&credentials.host_url));
        let request_body = LoginRequest {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
            connection: &credentials.connection,
        };

        let response = client
            .post(&url)
            .header("Content-Type", "application/json; charset=utf-8")
            .json(&request_body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Connection(e.to_string()))?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            error!("Login rejected: {} - {}", status, body);
            return Err(ExchangeError::Unauthorized(body));
        }
        if !status.is_success() {
            error!("Login failed: {} - {}", status, body);
            return Err(ExchangeError::Api {
                code: status.as_u16() as i32,
                message: body,
            });
        }

        let resp: LoginResponse = serde_json::from_str(&body)
            .map_err(|e| ExchangeError::Parse(format!("Failed to parse login response: {}", e)))?;

        info!("Session status: {}", SessionStatus::Connected);

        Ok(Arc::new(FxcmSession {
            client,
            base_url: base_url(&credentials.host_url).to_string(),
            session_id: resp.session_id,
            closed: RwLock::new(false),
        }))
    }
}

/// 로그인된 FXCM 세션.
pub struct FxcmSession {
    client: Client,
    base_url: String,
    session_id: String,
    /// 로그아웃 이후의 사용을 거부하기 위한 플래그
    closed: RwLock<bool>,
}

#[async_trait]
impl TradingSession for FxcmSession {
    fn name(&self) -> &str {
        "fxcm"
    }

    async fn get_history(
        &self,
        instrument: &str,
        timeframe: Timeframe,
        count: u32,
    ) -> ExchangeResult<Vec<Candle>> {
        if *self.closed.read().await {
            return Err(ExchangeError::Session(
                "session already logged out".to_string(),
            ));
        }

        let url = format!("{}/candles", self.base_url);
        let count_param = count.to_string();

        let response = self
            .client
            .get(&url)
            .header("X-Session-Id", &self.session_id)
            .query(&[
                ("instrument", instrument),
                ("timeframe", timeframe.to_vendor_code()),
                ("count", count_param.as_str()),
            ])
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Connection(e.to_string()))?;

        if !status.is_success() {
            error!("History request failed: {} - {}", status, body);
            return Err(ExchangeError::Api {
                code: status.as_u16() as i32,
                message: body,
            });
        }

        debug!(
            instrument,
            timeframe = %timeframe,
            "History response: {} bytes",
            body.len()
        );

        let resp: HistoryResponse = serde_json::from_str(&body).map_err(|e| {
            ExchangeError::Parse(format!("Failed to parse history response: {}", e))
        })?;

        let candles = resp
            .candles
            .into_iter()
            .map(row_to_candle)
            .collect::<ExchangeResult<Vec<Candle>>>()?;

        Ok(candles)
    }

    async fn logout(&self) -> ExchangeResult<()> {
        let mut closed = self.closed.write().await;
        if *closed {
            return Ok(());
        }

        let url = format!("{}/trading/logout", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("X-Session-Id", &self.session_id)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            warn!("Logout returned {}", response.status());
        }

        *closed = true;
        info!("Session status: {}", SessionStatus::Disconnected);
        Ok(())
    }
}

/// 캔들 행을 도메인 캔들로 변환.
///
/// 가격은 `Candle::new`에서 다섯 자리로 반올림됩니다.
fn row_to_candle(row: CandleRow) -> ExchangeResult<Candle> {
    let naive = NaiveDateTime::parse_from_str(&row.date, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| ExchangeError::Parse(format!("Invalid candle date '{}': {}", row.date, e)))?;
    let time = DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc);

    Ok(Candle::new(
        time,
        row.bid_open,
        row.bid_high,
        row.bid_low,
        row.bid_close,
    ))
}

/// 호스트 URL에서 REST 기본 URL 도출.
///
/// 역사적으로 호스트 URL은 `.../Hosts.jsp` 디스커버리 문서를 가리키므로
/// 마지막 경로 조각을 떼어냅니다.
fn base_url(host_url: &str) -> &str {
    let trimmed = host_url.trim_end_matches('/');
    let path_start = match trimmed.find("://") {
        Some(idx) => idx + 3,
        None => 0,
    };
    match trimmed[path_start..].rfind('/') {
        Some(rel) => {
            let idx = path_start + rel;
            if trimmed[idx + 1..].contains('.') {
                &trimmed[..idx]
            } else {
                trimmed
            }
        }
        None => trimmed,
    }
}

/// reqwest 에러를 도메인 에러로 변환.
fn map_reqwest_error(err: reqwest::Error) -> ExchangeError {
    if err.is_timeout() {
        ExchangeError::Timeout(err.to_string())
    } else {
        ExchangeError::Connection(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use secrecy::SecretString;

    fn test_credentials(host_url: String) -> SessionCredentials {
        SessionCredentials::new("demo-user", SecretString::new("pass".into()), host_url, "Demo")
    }

    #[test]
    fn test_base_url_strips_discovery_document() {
        assert_eq!(
            base_url("http://www.fxcorporate.com/Hosts.jsp"),
            "http://www.fxcorporate.com"
        );
        assert_eq!(base_url("http://host.example.com/api/"), "http://host.example.com/api");
        // 경로 없는 호스트는 그대로 사용
        assert_eq!(base_url("http://127.0.0.1:9898"), "http://127.0.0.1:9898");
    }

    #[test]
    fn test_row_to_candle_rounds_prices() {
        let row = CandleRow {
            date: "2026-08-05 10:00:00".to_string(),
            bid_open: dec!(1.2345678),
            bid_high: dec!(1.2350009),
            bid_low: dec!(1.2340001),
            bid_close: dec!(1.2347899),
        };
        let candle = row_to_candle(row).unwrap();
        assert_eq!(candle.open, dec!(1.23457));
        assert_eq!(candle.close, dec!(1.23479));
    }

    #[test]
    fn test_row_to_candle_rejects_bad_date() {
        let row = CandleRow {
            date: "05/08/2026".to_string(),
            bid_open: dec!(1.1),
            bid_high: dec!(1.1),
            bid_low: dec!(1.1),
            bid_close: dec!(1.1),
        };
        assert!(matches!(row_to_candle(row), Err(ExchangeError::Parse(_))));
    }

    #[tokio::test]
    async fn test_login_history_logout_round_trip() {
        let mut server = mockito::Server::new_async().await;

        let login_mock = server
            .mock("POST", "/trading/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"session_id":"sess-1"}"#)
            .create_async()
            .await;

        let history_mock = server
            .mock("GET", "/candles")
            .match_query(mockito::Matcher::Any)
            .match_header("X-Session-Id", "sess-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candles":[{"Date":"2026-08-05 10:00:00","BidOpen":1.2345678,"BidHigh":1.235,"BidLow":1.234,"BidClose":1.2347899}]}"#,
            )
            .create_async()
            .await;

        let logout_mock = server
            .mock("POST", "/trading/logout")
            .match_header("X-Session-Id", "sess-1")
            .with_status(200)
            .create_async()
            .await;

        let provider = FxcmSessionProvider::new(FxcmConfig::default());
        let session = provider
            .login(&test_credentials(server.url()))
            .await
            .unwrap();

        let candles = session
            .get_history("GBP/USD", Timeframe::H1, 1)
            .await
            .unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].open, dec!(1.23457));

        session.logout().await.unwrap();

        // 로그아웃 이후 history는 거부
        let err = session.get_history("GBP/USD", Timeframe::H1, 1).await;
        assert!(matches!(err, Err(ExchangeError::Session(_))));

        login_mock.assert_async().await;
        history_mock.assert_async().await;
        logout_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/trading/login")
            .with_status(401)
            .with_body("invalid credentials")
            .create_async()
            .await;

        let provider = FxcmSessionProvider::new(FxcmConfig::default());
        let result = provider.login(&test_credentials(server.url())).await;
        assert!(matches!(result, Err(ExchangeError::Unauthorized(_))));
    }
}
