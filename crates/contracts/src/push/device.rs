use serde::{Deserialize, Serialize};

use super::config::PushProvider;

/// Body of `POST /api/register-device`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterDeviceRequest {
    pub token: String,
    pub provider: PushProvider,
    pub platform: String,
}

impl RegisterDeviceRequest {
    pub const WEB_PLATFORM: &'static str = "web";

    pub fn web(token: impl Into<String>, provider: PushProvider) -> Self {
        Self {
            token: token.into(),
            provider,
            platform: Self::WEB_PLATFORM.to_string(),
        }
    }
}
