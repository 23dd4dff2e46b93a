// Shared library untuk STS: wire models, HTTP client ke backend, dan validasi input
pub mod models;
pub mod utils;

pub use models::envelope::{ApiResponse, Envelope, ListEnvelope};
pub use models::user::{CurrentUser, LoginRequest, TokenPair};
pub use utils::http_client::{ApiClient, HttpClientError, GENERIC_ERROR_MESSAGE};
