use async_trait::async_trait;
use shared::{ApiClient, ApiResponse, HttpClientError};

use super::ShipmentApi;
use crate::domain::progress::ProgressRecord;
use crate::domain::{
    CancelRequest, Customer, DateRange, Driver, EditDriverTnkbRequest, Endpoint, HandoverRequest,
    ShipmentDocument, Stage, Tnkb, UpdateDriverRequest,
};

// Implementasi ShipmentApi lewat HTTP, token diambil dari session yang sudah diverifikasi
#[derive(Debug, Clone)]
pub struct HttpShipmentApi {
    client: ApiClient,
    token: String,
}

impl HttpShipmentApi {
    pub fn new(client: ApiClient, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }

    fn token(&self) -> Option<&str> {
        Some(self.token.as_str())
    }
}

#[async_trait]
impl ShipmentApi for HttpShipmentApi {
    // Ambil list dokumen untuk satu halaman workflow
    async fn list_stage(
        &self,
        stage: Stage,
        range: DateRange,
    ) -> Result<Vec<ShipmentDocument>, HttpClientError> {
        tracing::debug!("📥 GET {} ({} s/d {})", stage.list_endpoint(), range.from, range.to);
        self.client
            .get_list(stage.list_endpoint(), &range.query(), self.token())
            .await
    }

    // SJ aktif milik driver
    async fn list_in_transit(&self, driver_id: i64) -> Result<Vec<ShipmentDocument>, HttpClientError> {
        let query = [("driverId", driver_id.to_string())];
        self.client
            .get_list("/shipments/in-transit", &query, self.token())
            .await
    }

    // SJ yang sudah check-in di customer
    async fn list_on_customer(
        &self,
        customer_id: Option<i64>,
        driver_id: i64,
    ) -> Result<Vec<ShipmentDocument>, HttpClientError> {
        let mut query = vec![("driverId", driver_id.to_string())];
        if let Some(customer_id) = customer_id {
            query.push(("customerId", customer_id.to_string()));
        }
        self.client
            .get_list("/shipments/on-customer", &query, self.token())
            .await
    }

    async fn list_history(&self, range: DateRange) -> Result<Vec<ShipmentDocument>, HttpClientError> {
        self.client
            .get_list("/shipments/history", &range.query(), self.token())
            .await
    }

    async fn list_progress(&self, range: DateRange) -> Result<Vec<ProgressRecord>, HttpClientError> {
        self.client
            .get_list("/shipments/progress", &range.query(), self.token())
            .await
    }

    async fn list_drivers(&self) -> Result<Vec<Driver>, HttpClientError> {
        self.client.get_list("/shipments/drivers", &[], self.token()).await
    }

    async fn list_tnkbs(&self) -> Result<Vec<Tnkb>, HttpClientError> {
        self.client.get_list("/shipments/tnkbs", &[], self.token()).await
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, HttpClientError> {
        self.client.get_list("/shipments/customers", &[], self.token()).await
    }

    // Kirim satu batch transisi (init untuk handover pertama, process untuk sisanya)
    async fn submit_handover(
        &self,
        endpoint: Endpoint,
        request: HandoverRequest,
    ) -> Result<ApiResponse, HttpClientError> {
        tracing::debug!(
            "📤 POST {} status={} ids={:?}",
            endpoint.path(),
            request.status,
            request.m_inout_ids
        );
        self.client.post(endpoint.path(), &request, self.token()).await
    }

    async fn cancel_outstanding(&self, request: CancelRequest) -> Result<ApiResponse, HttpClientError> {
        self.client
            .post("/shipments/outstanding/cancel", &request, self.token())
            .await
    }

    async fn edit_driver_tnkb(
        &self,
        request: EditDriverTnkbRequest,
    ) -> Result<ApiResponse, HttpClientError> {
        self.client
            .post("/shipments/edit/drivertnkb", &request, self.token())
            .await
    }

    async fn update_driver(&self, request: UpdateDriverRequest) -> Result<ApiResponse, HttpClientError> {
        self.client.put("/shipments/drivers", &request, self.token()).await
    }
}
