use shared::{CurrentUser, LoginRequest};

use crate::config::AppState;
use crate::error::AppResult;
use crate::session::SessionContext;

// Login handler
pub async fn login(state: &AppState, username: String, password: String) -> AppResult<CurrentUser> {
    let request = LoginRequest { username, password };
    let session = SessionContext::login(&state.client, &state.store, request).await?;
    Ok(session.user().clone())
}

// Logout handler, return false kalau memang belum login
pub fn logout(state: &AppState) -> AppResult<bool> {
    SessionContext::logout(&state.store)
}

// Whoami handler: verifikasi token ke backend
pub async fn whoami(state: &AppState) -> AppResult<CurrentUser> {
    let session = SessionContext::initialize(&state.client, &state.store).await?;
    Ok(session.user().clone())
}
