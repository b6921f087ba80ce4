//! 멀티 타임프레임 캔들 조회 endpoint.
//!
//! 요청마다 거래 백엔드에 로그인하고, 타임프레임별 캔들을 순차 조회한 뒤,
//! 성공/실패와 무관하게 로그아웃합니다. 어느 타임프레임이든 실패하면
//! 전체 요청이 실패합니다 (all-or-nothing).

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use fx_core::Candle;
use fx_exchange::{fetch_all_timeframes, with_session, CandleCounts, SessionCredentials};

use crate::routes::ApiError;
use crate::state::AppState;

// ==================== 요청/응답 타입 ====================

/// 멀티 타임프레임 캔들 요청.
#[derive(Debug, Deserialize)]
pub struct ForexDataRequest {
    /// 계정 이름
    pub username: String,
    /// 비밀번호
    pub password: SecretString,
    /// 백엔드 호스트 URL
    #[serde(default = "default_host_url")]
    pub url: String,
    /// 연결 종류
    #[serde(default = "default_connection")]
    pub connection: String,
    /// 상품
    #[serde(default = "default_instrument")]
    pub instrument: String,
    /// 일봉 개수
    #[serde(default = "default_candles_d1")]
    pub candles_d1: u32,
    /// 4시간봉 개수
    #[serde(default = "default_candles_h4")]
    pub candles_h4: u32,
    /// 1시간봉 개수
    #[serde(default = "default_candles_h1")]
    pub candles_h1: u32,
    /// 15분봉 개수
    #[serde(default = "default_candles_m15")]
    pub candles_m15: u32,
    /// 5분봉 개수
    #[serde(default = "default_candles_m5")]
    pub candles_m5: u32,
    /// 1분봉 개수
    #[serde(default = "default_candles_m1")]
    pub candles_m1: u32,
}

fn default_host_url() -> String {
    fx_exchange::DEFAULT_HOST_URL.to_string()
}

fn default_connection() -> String {
    fx_exchange::DEFAULT_CONNECTION.to_string()
}

fn default_instrument() -> String {
    "GBP/USD".to_string()
}

fn default_candles_d1() -> u32 {
    60
}

fn default_candles_h4() -> u32 {
    300
}

fn default_candles_h1() -> u32 {
    1200
}

fn default_candles_m15() -> u32 {
    300
}

fn default_candles_m5() -> u32 {
    500
}

fn default_candles_m1() -> u32 {
    500
}

/// 멀티 타임프레임 캔들 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct ForexDataResponse {
    /// 처리 상태 ("success")
    pub status: String,
    /// 캔들 데이터
    pub data: MultiTimeframeData,
}

/// 타임프레임별 캔들 데이터.
#[derive(Debug, Serialize, Deserialize)]
pub struct MultiTimeframeData {
    /// 상품
    pub instrument: String,
    /// 응답 생성 시각 (ISO 8601)
    pub timestamp: String,
    /// 일봉
    pub daily: Vec<Candle>,
    /// 4시간봉
    #[serde(rename = "H4")]
    pub h4: Vec<Candle>,
    /// 1시간봉
    #[serde(rename = "H1")]
    pub h1: Vec<Candle>,
    /// 15분봉
    #[serde(rename = "M15")]
    pub m15: Vec<Candle>,
    /// 5분봉
    #[serde(rename = "M5")]
    pub m5: Vec<Candle>,
    /// 1분봉
    #[serde(rename = "M1")]
    pub m1: Vec<Candle>,
}

// ==================== Handler ====================

/// 멀티 타임프레임 캔들 조회.
///
/// POST /get-forex-data
pub async fn get_forex_data(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ForexDataRequest>,
) -> Result<Json<ForexDataResponse>, (StatusCode, Json<ApiError>)> {
    let ForexDataRequest {
        username,
        password,
        url,
        connection,
        instrument,
        candles_d1,
        candles_h4,
        candles_h1,
        candles_m15,
        candles_m5,
        candles_m1,
    } = request;

    info!(instrument = %instrument, connection = %connection, "Forex data request received");

    let credentials = SessionCredentials::new(username, password, url, connection);
    let counts = CandleCounts {
        d1: candles_d1,
        h4: candles_h4,
        h1: candles_h1,
        m15: candles_m15,
        m5: candles_m5,
        m1: candles_m1,
    };

    let fetch_instrument = instrument.clone();
    let result = with_session(state.sessions.as_ref(), &credentials, |session| {
        let instrument = fetch_instrument;
        async move { fetch_all_timeframes(session.as_ref(), &instrument, &counts).await }
    })
    .await;

    match result {
        Ok(series) => {
            info!(
                instrument = %instrument,
                daily = series.daily.len(),
                h1 = series.h1.len(),
                m15 = series.m15.len(),
                "Forex data request served"
            );
            Ok(Json(ForexDataResponse {
                status: "success".to_string(),
                data: MultiTimeframeData {
                    instrument,
                    timestamp: chrono::Utc::now().to_rfc3339(),
                    daily: series.daily,
                    h4: series.h4,
                    h1: series.h1,
                    m15: series.m15,
                    m5: series.m5,
                    m1: series.m1,
                },
            }))
        }
        Err(e) => {
            error!("Failed to fetch forex data: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(
                    "FETCH_FAILED",
                    format!("Failed to fetch forex data: {}", e),
                )),
            ))
        }
    }
}

/// 캔들 조회 라우터 생성.
pub fn forex_router() -> Router<Arc<AppState>> {
    Router::new().route("/get-forex-data", post(get_forex_data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use fx_calendar::{CalendarConfig, CalendarFetcher};
    use fx_exchange::SimulatedSessionProvider;

    fn state_with(provider: Arc<SimulatedSessionProvider>) -> Arc<AppState> {
        let config = CalendarConfig {
            primary_api_url: None,
            primary_api_key: None,
            secondary_api_url: None,
            scrape_url: "http://127.0.0.1:9/economic-calendar".to_string(),
            timeout_secs: 2,
        };
        Arc::new(AppState::new(
            provider,
            Arc::new(CalendarFetcher::new(config)),
        ))
    }

    fn post_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/get-forex-data")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_forex_data_with_defaults() {
        let provider = Arc::new(SimulatedSessionProvider::new());
        let app = forex_router().with_state(state_with(Arc::clone(&provider)));

        let response = app
            .oneshot(post_request(r#"{"username":"demo","password":"pass"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ForexDataResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(parsed.status, "success");
        assert_eq!(parsed.data.instrument, "GBP/USD");
        assert_eq!(parsed.data.daily.len(), 60);
        assert_eq!(parsed.data.h1.len(), 1200);
        assert_eq!(parsed.data.m15.len(), 300);

        // 세션은 반드시 해제됨
        assert_eq!(provider.logout_count(), 1);
    }

    #[tokio::test]
    async fn test_forex_data_failure_returns_500_and_logs_out() {
        let provider = Arc::new(SimulatedSessionProvider::failing());
        let app = forex_router().with_state(state_with(Arc::clone(&provider)));

        let response = app
            .oneshot(post_request(
                r#"{"username":"demo","password":"pass","instrument":"EUR/USD"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();

        // 실패한 타임프레임이 에러 메시지에 명시됨
        assert!(error.message.contains("D1"));

        // 실패 경로에서도 세션 해제
        assert_eq!(provider.logout_count(), 1);
    }

    #[tokio::test]
    async fn test_forex_data_missing_credentials_is_client_error() {
        let provider = Arc::new(SimulatedSessionProvider::new());
        let app = forex_router().with_state(state_with(provider));

        let response = app
            .oneshot(post_request(r#"{"instrument":"EUR/USD"}"#))
            .await
            .unwrap();

        // 필수 필드 누락은 body 역직렬화 실패
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
