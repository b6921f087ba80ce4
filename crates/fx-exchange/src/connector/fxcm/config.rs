//! FXCM 커넥터 설정.

use serde::{Deserialize, Serialize};

/// 기본 백엔드 호스트 URL.
///
/// 요청 본문에 `url`이 없을 때 사용합니다.
pub const DEFAULT_HOST_URL: &str = "http://www.fxcorporate.com/Hosts.jsp";

/// 기본 연결 종류.
pub const DEFAULT_CONNECTION: &str = "Real";

/// FXCM 커넥터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FxcmConfig {
    /// 호출당 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for FxcmConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl FxcmConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # 환경변수
    /// - `FXCM_TIMEOUT_SECS`: 호출당 타임아웃 (기본값: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let timeout_secs = std::env::var("FXCM_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self { timeout_secs }
    }
}
