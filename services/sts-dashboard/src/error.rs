use shared::HttpClientError;
use thiserror::Error;

use crate::domain::date_range::DateRangeError;
use crate::domain::TransitionError;

// Error type untuk dashboard, dipetakan ke pesan operator dan exit code
#[derive(Debug, Error)]
pub enum AppError {
    // Token tidak ada / invalid / expired (HTTP 401)
    #[error("Sesi tidak valid: {0}")]
    Unauthorized(String),

    // Username/password ditolak saat login, token tersimpan tidak disentuh
    #[error("Login gagal: {0}")]
    LoginFailed(String),

    #[error("Akses ditolak: {0}")]
    Forbidden(String),

    // Diblok sebelum request dikirim
    #[error("Validasi gagal: {0}")]
    ValidationError(String),

    // Mutasi ditolak backend, pesan server apa adanya
    #[error("{0}")]
    MutationFailed(String),

    #[error("Backend error: {0}")]
    Backend(HttpClientError),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Konfigurasi tidak valid: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T = ()> = Result<T, AppError>;

// Builder methods untuk error creation yang clean
impl AppError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn login_failed(msg: impl Into<String>) -> Self {
        Self::LoginFailed(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::SessionError(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }

    /// Hasil mutasi yang gagal: 401 tetap 401, selain itu satu pesan untuk operator
    pub fn from_mutation(err: HttpClientError) -> Self {
        match err {
            HttpClientError::Unauthorized(msg) => AppError::Unauthorized(msg),
            other => AppError::MutationFailed(other.user_message()),
        }
    }

    /// Pesan yang ditampilkan ke operator
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized(_) => "Sesi berakhir atau belum login. Jalankan `sts-dashboard login`.".to_string(),
            AppError::Backend(err) => err.user_message(),
            AppError::MutationFailed(msg) | AppError::LoginFailed(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::ValidationError(_) => 2,
            AppError::Unauthorized(_) | AppError::LoginFailed(_) | AppError::Forbidden(_) => 3,
            _ => 1,
        }
    }
}

impl From<HttpClientError> for AppError {
    fn from(err: HttpClientError) -> Self {
        match err {
            HttpClientError::Unauthorized(msg) => AppError::Unauthorized(msg),
            other => AppError::Backend(other),
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<DateRangeError> for AppError {
    fn from(err: DateRangeError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        messages.sort();
        AppError::validation(messages.join(", "))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::session(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::session(format!("Format session file rusak: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct NameForm {
        #[validate(length(min = 1, message = "Nama wajib diisi"))]
        name: String,
    }

    #[test]
    fn test_http_unauthorized_maps_to_unauthorized() {
        let err: AppError = HttpClientError::Unauthorized("expired".into()).into();
        assert!(err.is_unauthorized());
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_mutation_keeps_server_message() {
        let err = AppError::from_mutation(HttpClientError::Rejected {
            status: 500,
            message: "Gagal memproses pembatalan: status tidak valid".into(),
        });
        assert_eq!(err.user_message(), "Gagal memproses pembatalan: status tidak valid");

        let err = AppError::from_mutation(HttpClientError::RequestFailed("connection reset".into()));
        assert_eq!(err.user_message(), shared::GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_validation_errors_use_messages() {
        let err: AppError = NameForm { name: String::new() }.validate().unwrap_err().into();
        assert!(matches!(err, AppError::ValidationError(ref m) if m == "Nama wajib diisi"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_transition_error_is_validation() {
        let err: AppError = TransitionError::EmptySelection.into();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_login_failure_is_not_a_session_error() {
        let err = AppError::login_failed("Username atau password salah");
        assert!(!err.is_unauthorized());
        assert_eq!(err.user_message(), "Username atau password salah");
        assert_eq!(err.exit_code(), 3);
    }
}
