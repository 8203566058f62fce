//! Bot configuration

use label_sheet::{FailurePolicy, LabelConfig};
use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Bot configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub api_token: String,
    /// Public base URL, the webhook lives at `{webhook_url}webhook`
    pub webhook_url: String,
    /// HTTP listen port
    pub port: u16,
    /// Bot API base URL
    pub telegram_api_url: String,
    /// Logo used on labels and in the welcome message
    pub logo_path: PathBuf,
    /// Footer caption printed on every label
    pub footer: String,
    pub failure_policy: FailurePolicy,
    /// Name shown in the welcome caption
    pub bot_name: String,
    /// Support line of the welcome caption (e.g. `@BDM_IT`)
    pub support_contact: Option<String>,
    pub log_level: String,
    /// Daily rolling log files go here when set
    pub log_dir: Option<String>,
}

impl Config {
    fn require(name: &str) -> Result<String, BoxError> {
        std::env::var(name)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| format!("{name} must be set").into())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let failure_policy = match std::env::var("LABEL_FAILURE_POLICY") {
            Ok(v) => v
                .parse::<FailurePolicy>()
                .map_err(|e| format!("LABEL_FAILURE_POLICY: {e}"))?,
            Err(_) => FailurePolicy::default(),
        };

        Ok(Self {
            api_token: Self::require("API_TOKEN")?,
            webhook_url: Self::require("WEBHOOK_URL")?,
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            telegram_api_url: std::env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_URL.into()),
            logo_path: std::env::var("LOGO_PATH")
                .unwrap_or_else(|_| "logo.png".into())
                .into(),
            footer: std::env::var("LABEL_FOOTER")
                .unwrap_or_else(|_| LabelConfig::default().footer_text),
            failure_policy,
            bot_name: std::env::var("BOT_NAME").unwrap_or_else(|_| "Barcode Label Bot".into()),
            support_contact: std::env::var("SUPPORT_CONTACT")
                .ok()
                .filter(|s| !s.is_empty()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        })
    }

    /// Full webhook URL registered with Telegram
    pub fn webhook_endpoint(&self) -> String {
        format!("{}webhook", self.webhook_url)
    }

    /// Label layout for this deployment
    pub fn label_config(&self) -> LabelConfig {
        LabelConfig::default()
            .with_logo(&self.logo_path)
            .with_footer(&self.footer)
            .with_failure_policy(self.failure_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            api_token: "123:abc".into(),
            webhook_url: "https://labels.example.com/".into(),
            port: 8080,
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.into(),
            logo_path: "logo.png".into(),
            footer: "ACME - DOCK 4".into(),
            failure_policy: FailurePolicy::SkipRecord,
            bot_name: "Barcode Label Bot".into(),
            support_contact: None,
            log_level: "info".into(),
            log_dir: None,
        }
    }

    #[test]
    fn test_webhook_endpoint() {
        assert_eq!(
            sample().webhook_endpoint(),
            "https://labels.example.com/webhook"
        );
    }

    #[test]
    fn test_label_config() {
        let label = sample().label_config();
        assert_eq!(label.footer_text, "ACME - DOCK 4");
        assert_eq!(label.failure_policy, FailurePolicy::SkipRecord);
        assert_eq!(label.logo_path, Some(PathBuf::from("logo.png")));
    }
}
