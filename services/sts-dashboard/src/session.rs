// Session context: token tersimpan di file JSON, diverifikasi lewat /me
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

use shared::utils::token_extraction::normalize_token;
use shared::{ApiClient, CurrentUser, HttpClientError, LoginRequest};

use crate::error::{AppError, AppResult};
use crate::repositories::auth_repo;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // File tidak ada berarti belum login
    pub fn load(&self) -> anyhow::Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Gagal membaca session file {}", self.path.display()))?;
        let session: StoredSession = serde_json::from_str(&raw)
            .with_context(|| format!("Session file {} rusak", self.path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &StoredSession) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Gagal membuat direktori {}", parent.display()))?;
        }

        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Gagal menulis session file {}", self.path.display()))?;

        // Token hanya boleh dibaca pemilik file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).with_context(|| {
                format!("Gagal set permission session file {}", self.path.display())
            })?;
        }
        Ok(())
    }

    // Return true kalau ada file yang dihapus
    pub fn clear(&self) -> anyhow::Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Gagal menghapus session file {}", self.path.display()))?;
        Ok(true)
    }
}

/// Session yang sudah diverifikasi, di-inject ke semua page controller
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    token: String,
    user: CurrentUser,
}

impl SessionContext {
    pub fn new(token: impl Into<String>, user: CurrentUser) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    pub fn user_id(&self) -> i64 {
        self.user.user_id
    }

    /// Inisialisasi sekali: baca token lalu verifikasi ke `/me`.
    /// Token yang ditolak (401) langsung dihapus dari disk.
    pub async fn initialize(client: &ApiClient, store: &SessionStore) -> AppResult<Self> {
        let stored = store
            .load()?
            .ok_or_else(|| AppError::unauthorized("Belum login"))?;

        let token = normalize_token(&stored.access_token)
            .ok_or_else(|| AppError::unauthorized("Token kosong"))?;

        match auth_repo::fetch_current_user(client, &token).await {
            Ok(user) => {
                tracing::debug!("✅ Sesi valid untuk {}", user.username);
                Ok(Self::new(token, user))
            }
            Err(HttpClientError::Unauthorized(msg)) => {
                tracing::warn!("🔒 Token ditolak backend, session dihapus");
                invalidate(store);
                Err(AppError::unauthorized(msg))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Login lalu simpan token. Token langsung diverifikasi lewat `/me`.
    pub async fn login(
        client: &ApiClient,
        store: &SessionStore,
        request: LoginRequest,
    ) -> AppResult<Self> {
        request.validate()?;

        let pair = auth_repo::login(client, &request)
            .await
            .map_err(|err| match err {
                HttpClientError::Unauthorized(_) => AppError::login_failed("Username atau password salah"),
                other => AppError::from_mutation(other),
            })?;

        let token = normalize_token(&pair.access_token)
            .ok_or_else(|| AppError::internal("Backend tidak mengirim access token"))?;

        let user = auth_repo::fetch_current_user(client, &token).await?;

        store.save(&StoredSession {
            access_token: token.clone(),
            refresh_token: pair.refresh_token,
            username: Some(user.username.clone()),
            saved_at: Utc::now(),
        })?;

        tracing::info!("🔑 Login berhasil sebagai {}", user.username);
        Ok(Self::new(token, user))
    }

    /// Logout: hapus token lokal
    pub fn logout(store: &SessionStore) -> AppResult<bool> {
        let removed = store.clear()?;
        if removed {
            tracing::info!("👋 Session dihapus");
        }
        Ok(removed)
    }
}

// Dipanggil setiap kali backend balas 401
pub fn invalidate(store: &SessionStore) {
    if let Err(e) = store.clear() {
        tracing::error!("❌ Gagal menghapus session: {:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_in(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("nested").join("session.json"))
    }

    fn stored(token: &str) -> StoredSession {
        StoredSession {
            access_token: token.to_string(),
            refresh_token: None,
            username: Some("budi".to_string()),
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn test_store_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.load().unwrap(), None);
        store.save(&stored("abc")).unwrap();
        assert_eq!(store.load().unwrap().unwrap().access_token, "abc");

        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&stored("abc")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_session_file_is_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("session.json");
        fs::write(&file, "not json").unwrap();
        assert!(SessionStore::new(file).load().is_err());
    }

    #[tokio::test]
    async fn test_initialize_without_file_is_unauthorized() {
        let dir = TempDir::new().unwrap();
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = SessionContext::initialize(&client, &store_in(&dir)).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_initialize_verifies_via_me() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("authorization", "Bearer good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "OK",
                "data": { "message": "Hello", "user_id": "1000012", "title": "Delivery", "username": "budi" }
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&stored("good")).unwrap();

        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let session = SessionContext::initialize(&client, &store).await.unwrap();
        assert_eq!(session.user_id(), 1000012);
        assert_eq!(session.token(), "good");
    }

    #[tokio::test]
    async fn test_rejected_token_is_cleared() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "Unauthorized"
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&stored("expired")).unwrap();

        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = SessionContext::initialize(&client, &store).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_persists_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Login berhasil",
                "data": { "access_token": "fresh", "refresh_token": "r" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "user_id": "5", "title": "dpk", "username": "sari" }
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();

        let request = LoginRequest { username: "sari".into(), password: "pw".into() };
        let session = SessionContext::login(&client, &store, request).await.unwrap();
        assert_eq!(session.user().username, "sari");

        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.access_token, "fresh");
        assert_eq!(saved.refresh_token.as_deref(), Some("r"));

        assert!(SessionContext::logout(&store).unwrap());
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_wrong_password_keeps_existing_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "Invalid credentials"
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&stored("still-good")).unwrap();

        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let request = LoginRequest { username: "budi".into(), password: "salah".into() };
        let err = SessionContext::login(&client, &store, request).await.unwrap_err();

        assert!(matches!(err, AppError::LoginFailed(_)));
        assert_eq!(err.user_message(), "Username atau password salah");
        assert_eq!(store.load().unwrap().unwrap().access_token, "still-good");
    }

    #[tokio::test]
    async fn test_login_rejects_empty_credentials_before_request() {
        let dir = TempDir::new().unwrap();
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let request = LoginRequest { username: "".into(), password: "".into() };
        let err = SessionContext::login(&client, &store_in(&dir), request).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
