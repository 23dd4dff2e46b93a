use shared::{ApiClient, CurrentUser, HttpClientError, LoginRequest, TokenPair};

// Login ke backend, return access + refresh token
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<TokenPair, HttpClientError> {
    client.post_object("/auth/login", request, None).await
}

// Ambil user dari token, sekaligus verifikasi token masih valid
pub async fn fetch_current_user(client: &ApiClient, token: &str) -> Result<CurrentUser, HttpClientError> {
    client.get_object("/me", Some(token)).await
}
