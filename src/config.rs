use std::env;
use std::time::Duration;

use crate::form::DenylistConfig;
use crate::notify::SmtpSettings;

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub cors_origins: Vec<String>,
    pub max_payload_bytes: usize,
    pub page_size: u64,
    pub denylist: DenylistConfig,
    /// `None` means notifications go to the log only.
    pub smtp: Option<SmtpSettings>,
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = DenylistConfig::default();
        let denylist = DenylistConfig {
            names: env::var("DENYLIST")
                .map(|v| list(&v).into_iter().collect())
                .unwrap_or(defaults.names),
            rejection_message: env::var("REJECTION_MESSAGE")
                .unwrap_or(defaults.rejection_message),
            notify_subject: env::var("NOTIFY_SUBJECT").unwrap_or(defaults.notify_subject),
            notify_from: env::var("NOTIFY_FROM").unwrap_or(defaults.notify_from),
            notify_to: env::var("NOTIFY_TO")
                .map(|v| list(&v))
                .unwrap_or(defaults.notify_to),
            notify_timeout: parsed("NOTIFY_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.notify_timeout),
        };

        let smtp = env::var("SMTP_HOST")
            .ok()
            .filter(|h| !h.is_empty())
            .map(|host| SmtpSettings {
                host,
                port: parsed("SMTP_PORT").unwrap_or(25),
                username: env::var("SMTP_USERNAME").ok(),
                password: env::var("SMTP_PASSWORD").ok(),
                starttls: parsed("SMTP_STARTTLS").unwrap_or(false),
            });

        Self {
            port: parsed("PORT").unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:acme-birthday.db".to_string()),
            cors_origins: list(
                &env::var("CORS_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string()),
            ),
            max_payload_bytes: parsed("MAX_PAYLOAD_BYTES").unwrap_or(65_536), // 64 KiB
            page_size: parsed::<u64>("PAGE_SIZE").unwrap_or(10).max(1),
            denylist,
            smtp,
        }
    }
}
