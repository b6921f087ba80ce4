//! 외환 데이터 게이트웨이 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다. 멀티 타임프레임 캔들 조회와
//! 경제 캘린더 엔드포인트를 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use fx_api::routes::create_api_router;
use fx_api::state::AppState;
use fx_calendar::{CalendarConfig, CalendarFetcher};
use fx_core::{init_logging, LogConfig, ServerConfig};
use fx_exchange::{FxcmConfig, FxcmSessionProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // tracing 초기화
    init_logging(&LogConfig::from_env());

    info!("Starting forex data gateway...");

    // 설정 로드
    let server_config = ServerConfig::from_env();
    let addr = server_config.socket_addr().map_err(|e| {
        error!(
            host = %server_config.host,
            port = server_config.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    let calendar_config = CalendarConfig::from_env();
    info!(
        primary = calendar_config.primary_api_url.is_some(),
        secondary = calendar_config.secondary_api_url.is_some(),
        scrape_url = %calendar_config.scrape_url,
        "Calendar sources configured"
    );

    // 애플리케이션 상태 생성
    let sessions = Arc::new(FxcmSessionProvider::new(FxcmConfig::from_env()));
    let calendar = Arc::new(CalendarFetcher::new(calendar_config));
    let state = Arc::new(AppState::new(sessions, calendar));

    info!(version = %state.version, "Application state initialized");

    // 라우터 생성
    let app = create_api_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(
            server_config.request_timeout_secs,
        )))
        .with_state(state);

    // 서버 시작
    info!(%addr, "API server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
