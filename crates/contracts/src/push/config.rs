use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which vendor SDK subscribes the browser for push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushProvider {
    #[default]
    OneSignal,
    Firebase,
}

impl PushProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushProvider::OneSignal => "onesignal",
            PushProvider::Firebase => "firebase",
        }
    }
}

impl fmt::Display for PushProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PushProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onesignal" | "one_signal" => Ok(PushProvider::OneSignal),
            "firebase" | "fcm" => Ok(PushProvider::Firebase),
            other => Err(format!("Unknown push provider: {}", other)),
        }
    }
}

/// Settings of the push relay service worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub provider: PushProvider,
    pub default_title: String,
    pub default_body: String,
    pub default_icon: String,
    pub badge: String,
    /// Path of the app root; a click focuses a tab showing it or opens one
    pub app_root: String,
    pub vibrate: Vec<u32>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            provider: PushProvider::default(),
            default_title: "New Message".to_string(),
            default_body: "You have a new message".to_string(),
            default_icon: "/logo192.png".to_string(),
            badge: "/logo192.png".to_string(),
            app_root: "/".to_string(),
            vibrate: vec![200, 100, 200],
        }
    }
}

impl RelayConfig {
    pub fn for_provider(provider: PushProvider) -> Self {
        Self {
            provider,
            ..Self::default()
        }
    }

    /// Notification tag; notifications with the same tag replace each other
    pub fn tag(&self) -> String {
        format!("{}-messaging", self.provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("OneSignal".parse::<PushProvider>(), Ok(PushProvider::OneSignal));
        assert_eq!("fcm".parse::<PushProvider>(), Ok(PushProvider::Firebase));
        assert!("apns".parse::<PushProvider>().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RelayConfig =
            serde_json::from_str(r#"{ "provider": "firebase", "app_root": "/admin" }"#).unwrap();
        assert_eq!(config.tag(), "firebase-messaging");
        assert_eq!(config.app_root, "/admin");
        assert_eq!(config.default_title, "New Message");
    }
}
