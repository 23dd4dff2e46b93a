// Konfigurasi STS Dashboard dari environment variables
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use shared::ApiClient;

use crate::error::{AppError, AppResult};
use crate::session::SessionStore;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub http_timeout_secs: u64,
    pub session_file: PathBuf,
    pub environment: String,
}

impl AppConfig {
    // Load semua konfigurasi dari environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Versi yang bisa ditest tanpa menyentuh environment proses
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("STS_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(AppError::config(format!(
                "STS_API_URL harus diawali http:// atau https://, dapat: {}",
                api_url
            )));
        }

        let http_timeout_secs = match lookup("STS_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    AppError::config(format!("STS_HTTP_TIMEOUT_SECS tidak valid: {}", raw))
                })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let session_file = match lookup("STS_SESSION_FILE").filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_session_file()?,
        };

        let environment = lookup("RUST_ENV").unwrap_or_else(|| "development".to_string());

        Ok(AppConfig {
            api_url,
            http_timeout_secs,
            session_file,
            environment,
        })
    }

    // Helper cek production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn default_session_file() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("sts-dashboard").join("session.json"))
        .ok_or_else(|| {
            AppError::config("Config directory tidak ditemukan, set STS_SESSION_FILE secara manual")
        })
}

// Application state yang di-share ke semua command
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub client: ApiClient,
    pub store: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let client = ApiClient::new(&config.api_url, config.http_timeout())?;
        let store = SessionStore::new(config.session_file.clone());

        Ok(AppState {
            config,
            client,
            store,
        })
    }
}
