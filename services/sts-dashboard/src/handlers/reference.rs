// Reference list (driver, TNKB, customer) dan maintenance akun driver
use validator::Validate;

use crate::domain::{Customer, Driver, Tnkb, UpdateDriverRequest};
use crate::error::{AppError, AppResult};
use crate::repositories::ShipmentApi;
use crate::session::SessionContext;

// Reference list dipakai untuk dropdown, gagal load = list kosong
fn or_empty<T>(result: Result<Vec<T>, shared::HttpClientError>, what: &str) -> AppResult<Vec<T>> {
    match result {
        Ok(items) => Ok(items),
        Err(err) if err.is_unauthorized() => Err(err.into()),
        Err(err) => {
            tracing::warn!("⚠️ Gagal memuat {}: {}", what, err);
            Ok(Vec::new())
        }
    }
}

pub async fn drivers<A: ShipmentApi + ?Sized>(api: &A) -> AppResult<Vec<Driver>> {
    or_empty(api.list_drivers().await, "daftar driver")
}

pub async fn tnkbs<A: ShipmentApi + ?Sized>(api: &A) -> AppResult<Vec<Tnkb>> {
    or_empty(api.list_tnkbs().await, "daftar TNKB")
}

pub async fn customers<A: ShipmentApi + ?Sized>(api: &A) -> AppResult<Vec<Customer>> {
    or_empty(api.list_customers().await, "daftar customer")
}

/// Update nama dan password driver, khusus Admin
pub async fn update_driver<A: ShipmentApi + ?Sized>(
    api: &A,
    session: &SessionContext,
    request: UpdateDriverRequest,
) -> AppResult<String> {
    if !session.user().is_admin() {
        return Err(AppError::forbidden("Hanya Admin yang bisa mengubah data driver"));
    }

    request.validate()?;
    let driver_id = request.driver_id;

    let resp = api
        .update_driver(request)
        .await
        .map_err(AppError::from_mutation)?;

    tracing::info!("👤 Driver {} diupdate oleh {}", driver_id, session.user().username);
    Ok(resp
        .server_message()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "Data driver berhasil diupdate".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockShipmentApi;
    use shared::{ApiResponse, CurrentUser, HttpClientError};

    fn session_with(title: &str) -> SessionContext {
        SessionContext::new(
            "tok",
            CurrentUser {
                user_id: 1,
                username: "admin".to_string(),
                title: Some(title.to_string()),
            },
        )
    }

    fn valid_request() -> UpdateDriverRequest {
        UpdateDriverRequest {
            driver_id: 12,
            driver_name: "Joko".to_string(),
            password: "rahasia".to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_driver_forbidden_for_non_admin() {
        let mut api = MockShipmentApi::new();
        api.expect_update_driver().times(0);

        let err = update_driver(&api, &session_with("dpk"), valid_request())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_driver_invalid_payload_blocked() {
        let mut api = MockShipmentApi::new();
        api.expect_update_driver().times(0);

        let request = UpdateDriverRequest {
            password: "123".to_string(),
            ..valid_request()
        };
        let err = update_driver(&api, &session_with("Admin"), request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_driver_surfaces_server_message() {
        let mut api = MockShipmentApi::new();
        api.expect_update_driver()
            .withf(|req| req.driver_id == 12)
            .times(1)
            .returning(|_| {
                Err(HttpClientError::Rejected {
                    status: 400,
                    message: "Driver tidak ditemukan".to_string(),
                })
            });

        let err = update_driver(&api, &session_with("admin"), valid_request())
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Driver tidak ditemukan");
    }

    #[tokio::test]
    async fn test_update_driver_success() {
        let mut api = MockShipmentApi::new();
        api.expect_update_driver().times(1).returning(|_| {
            Ok(ApiResponse {
                success: Some(true),
                message: Some("Driver updated".to_string()),
                count: None,
                data: None,
            })
        });

        let msg = update_driver(&api, &session_with("Admin"), valid_request())
            .await
            .unwrap();
        assert_eq!(msg, "Driver updated");
    }

    #[tokio::test]
    async fn test_reference_failure_is_empty() {
        let mut api = MockShipmentApi::new();
        api.expect_list_tnkbs()
            .times(1)
            .returning(|| Err(HttpClientError::RequestFailed("boom".to_string())));

        assert!(tnkbs(&api).await.unwrap().is_empty());
    }
}
