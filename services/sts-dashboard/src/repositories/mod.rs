pub mod auth_repo;
pub mod shipment_repo;

use async_trait::async_trait;
use shared::{ApiResponse, HttpClientError};

#[cfg(test)]
use mockall::automock;

use crate::domain::progress::ProgressRecord;
use crate::domain::{
    CancelRequest, Customer, DateRange, Driver, EditDriverTnkbRequest, Endpoint, HandoverRequest,
    ShipmentDocument, Stage, Tnkb, UpdateDriverRequest,
};

pub use shipment_repo::HttpShipmentApi;

/// Kontrak backend STS untuk shipment. Semua read mengembalikan list yang
/// sudah dinormalisasi, semua command mengembalikan envelope backend.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ShipmentApi: Send + Sync {
    async fn list_stage(
        &self,
        stage: Stage,
        range: DateRange,
    ) -> Result<Vec<ShipmentDocument>, HttpClientError>;

    async fn list_in_transit(&self, driver_id: i64) -> Result<Vec<ShipmentDocument>, HttpClientError>;

    async fn list_on_customer(
        &self,
        customer_id: Option<i64>,
        driver_id: i64,
    ) -> Result<Vec<ShipmentDocument>, HttpClientError>;

    async fn list_history(&self, range: DateRange) -> Result<Vec<ShipmentDocument>, HttpClientError>;

    async fn list_progress(&self, range: DateRange) -> Result<Vec<ProgressRecord>, HttpClientError>;

    async fn list_drivers(&self) -> Result<Vec<Driver>, HttpClientError>;

    async fn list_tnkbs(&self) -> Result<Vec<Tnkb>, HttpClientError>;

    async fn list_customers(&self) -> Result<Vec<Customer>, HttpClientError>;

    async fn submit_handover(
        &self,
        endpoint: Endpoint,
        request: HandoverRequest,
    ) -> Result<ApiResponse, HttpClientError>;

    async fn cancel_outstanding(&self, request: CancelRequest) -> Result<ApiResponse, HttpClientError>;

    async fn edit_driver_tnkb(
        &self,
        request: EditDriverTnkbRequest,
    ) -> Result<ApiResponse, HttpClientError>;

    async fn update_driver(&self, request: UpdateDriverRequest) -> Result<ApiResponse, HttpClientError>;
}
