//! 설정 관리.
//!
//! 애플리케이션 설정은 시작 시 환경변수에서 한 번 로드되어
//! 불변 구조체로 주입됩니다. 전역 가변 상태는 사용하지 않습니다.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::error::{CoreError, CoreResult};

/// HTTP 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 전체 타임아웃 (초)
    ///
    /// 캘린더 폴백 체인은 단계별 타임아웃의 합만큼 걸릴 수 있으므로
    /// 외부 호출 타임아웃(30초)보다 넉넉하게 설정합니다.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9898,
            request_timeout_secs: 180,
        }
    }
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # 환경변수
    /// - `API_HOST`: 바인딩 호스트 (기본값: "0.0.0.0")
    /// - `API_PORT`: 바인딩 포트 (기본값: 9898)
    /// - `REQUEST_TIMEOUT_SECS`: 요청 타임아웃 (기본값: 180)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = std::env::var("API_HOST").unwrap_or(defaults.host);
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.request_timeout_secs);

        Self {
            host,
            port,
            request_timeout_secs,
        }
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `CoreError::Config`를 반환합니다.
    pub fn socket_addr(&self) -> CoreResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                CoreError::Config(format!(
                    "잘못된 소켓 주소 {}:{} - {}",
                    self.host, self.port, e
                ))
            })
    }
}
