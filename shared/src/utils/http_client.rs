use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::envelope::{ApiResponse, Envelope, ListEnvelope};
use crate::utils::token_extraction::bearer_value;

/// Pesan fallback kalau server tidak kirim pesan error yang bisa dipakai
pub const GENERIC_ERROR_MESSAGE: &str = "Terjadi kesalahan pada server";

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Service tidak tersedia: {0}")]
    ServiceUnavailable(String),

    #[error("Response parsing error: {0}")]
    ParseError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Server menolak request (non-2xx atau `success: false`)
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl HttpClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, HttpClientError::Unauthorized(_))
    }

    /// Pesan yang aman ditampilkan ke operator
    pub fn user_message(&self) -> String {
        match self {
            HttpClientError::Rejected { message, .. } => message.clone(),
            HttpClientError::Unauthorized(_) => "Sesi berakhir, silakan login ulang".to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for HttpClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            HttpClientError::ServiceUnavailable(err.to_string())
        } else {
            HttpClientError::RequestFailed(err.to_string())
        }
    }
}

/// HTTP client ke backend STS. Semua request lewat sini supaya
/// normalisasi envelope dan mapping error hanya ada di satu tempat.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    // Buat client dengan base URL dan timeout per request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpClientError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(HttpClientError::ServiceUnavailable(
                "Base URL backend kosong".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpClientError::RequestFailed(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    // GET list: array langsung atau `{ data: [...] }`
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> Result<Vec<T>, HttpClientError> {
        let request = self.client.get(self.url(endpoint)).query(query);
        let value = self.send(request, token).await?;

        ListEnvelope::from_value(value)
            .map(ListEnvelope::into_items)
            .map_err(|e| HttpClientError::ParseError(format!("{}: {}", endpoint, e)))
    }

    // GET object: object langsung atau `{ data: {...} }`
    pub async fn get_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: Option<&str>,
    ) -> Result<T, HttpClientError> {
        let request = self.client.get(self.url(endpoint));
        let value = self.send(request, token).await?;
        Self::parse_object(endpoint, value)
    }

    // POST command, hasilnya envelope `{ success, message, ... }`
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<ApiResponse, HttpClientError> {
        let request = self.client.post(self.url(endpoint)).json(body);
        let value = self.send(request, token).await?;
        Ok(Self::parse_ack(value))
    }

    // POST yang mengembalikan object (login)
    pub async fn post_object<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, HttpClientError> {
        let request = self.client.post(self.url(endpoint)).json(body);
        let value = self.send(request, token).await?;
        Self::parse_object(endpoint, value)
    }

    // PUT command
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<ApiResponse, HttpClientError> {
        let request = self.client.put(self.url(endpoint)).json(body);
        let value = self.send(request, token).await?;
        Ok(Self::parse_ack(value))
    }

    async fn send(
        &self,
        mut request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<Value, HttpClientError> {
        if let Some(t) = token {
            let header = bearer_value(t)
                .map_err(|_| HttpClientError::Unauthorized("Token tidak valid".to_string()))?;
            request = request.header(reqwest::header::AUTHORIZATION, header);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    // Handle response: status, body JSON, dan flag `success`
    async fn handle_response(&self, response: Response) -> Result<Value, HttpClientError> {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = parse_body(&text);

        if status == StatusCode::UNAUTHORIZED {
            let message = extract_error_message(&body, &text)
                .unwrap_or_else(|| "Token invalid".to_string());
            tracing::warn!("🔒 Backend menolak token: {}", message);
            return Err(HttpClientError::Unauthorized(message));
        }

        if !status.is_success() {
            let message = extract_error_message(&body, &text)
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
            tracing::debug!("Backend status {}: {}", status.as_u16(), message);
            return Err(HttpClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let Some(body) = body else {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Err(HttpClientError::ParseError(
                "Response bukan JSON".to_string(),
            ));
        };

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = extract_error_message(&Some(body.clone()), &text)
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
            return Err(HttpClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    fn parse_object<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, HttpClientError> {
        Envelope::from_value(value)
            .map(Envelope::into_inner)
            .map_err(|e| HttpClientError::ParseError(format!("{}: {}", endpoint, e)))
    }

    // Body command yang bukan object (kosong / string) tetap dianggap sukses
    fn parse_ack(value: Value) -> ApiResponse {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or(ApiResponse {
                success: Some(true),
                message: None,
                count: None,
                data: None,
            }),
            Value::String(message) => ApiResponse {
                success: Some(true),
                message: Some(message),
                count: None,
                data: None,
            },
            _ => ApiResponse {
                success: Some(true),
                message: None,
                count: None,
                data: None,
            },
        }
    }
}

fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str(text).ok()
}

// Ambil pesan error dari body: field `message` / `error`, atau plain text pendek
fn extract_error_message(body: &Option<Value>, raw: &str) -> Option<String> {
    if let Some(value) = body {
        return ["message", "error"]
            .iter()
            .filter_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|m| !m.is_empty())
            .map(|m| m.to_string());
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('<') || trimmed.len() > 300 {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        m_inout_id: i64,
    }

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_list_sends_bearer_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shipments/pending"))
            .and(query_param("dateFrom", "2024-01-01"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "count": 2,
                "data": [{ "m_inout_id": 1 }, { "m_inout_id": 2 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let rows: Vec<Row> = client
            .get_list(
                "/shipments/pending",
                &[("dateFrom", "2024-01-01".to_string())],
                Some("tok-123"),
            )
            .await
            .unwrap();
        assert_eq!(rows, vec![Row { m_inout_id: 1 }, Row { m_inout_id: 2 }]);
    }

    #[tokio::test]
    async fn test_get_list_accepts_bare_array_and_null_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shipments/in-transit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "m_inout_id": 9 }])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/shipments/comeback"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": null })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let rows: Vec<Row> = client.get_list("/shipments/in-transit", &[], None).await.unwrap();
        assert_eq!(rows.len(), 1);

        let rows: Vec<Row> = client.get_list("/shipments/comeback", &[], None).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_variant() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_object::<Value>("/me", Some("expired")).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_rejected_uses_server_message_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/handover/process"))
            .and(body_json(json!({ "m_inout_ids": [1], "status": "HO: DPK_TO_DEL" })))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "message": "Dokumen sudah diproses"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .post("/handover/process", &json!({ "m_inout_ids": [1], "status": "HO: DPK_TO_DEL" }), Some("t"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Dokumen sudah diproses");
    }

    #[tokio::test]
    async fn test_rejected_without_message_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/shipments/outstanding/cancel"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .post("/shipments/outstanding/cancel", &json!({}), Some("t"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_success_false_on_200_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/shipments/drivers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Driver tidak ditemukan"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.put("/shipments/drivers", &json!({}), Some("t")).await.unwrap_err();
        assert!(matches!(err, HttpClientError::Rejected { status: 200, .. }));
        assert_eq!(err.user_message(), "Driver tidak ditemukan");
    }

    #[tokio::test]
    async fn test_post_object_unwraps_login_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Login berhasil",
                "data": { "access_token": "a", "refresh_token": "r" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let pair: crate::models::user::TokenPair = client
            .post_object("/auth/login", &json!({ "username": "u", "password": "p" }), None)
            .await
            .unwrap();
        assert_eq!(pair.access_token, "a");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert!(ApiClient::new("  ", Duration::from_secs(1)).is_err());
    }
}
