// Halaman driver: SJ in-transit, check-in per customer, check-out
use shared::utils::validation::{is_valid_notes, normalize_notes, MAX_NOTES_LEN};
use shared::HttpClientError;

use crate::domain::grouping::{find_group, group_by_customer, DocumentGroup};
use crate::domain::transition::{validate_batch, validate_payload};
use crate::domain::{Action, HandoverRequest, ShipmentDocument, ShipmentStatus, TransitionError};
use crate::error::{AppError, AppResult};
use crate::handlers::stage::SubmitOutcome;
use crate::repositories::ShipmentApi;
use crate::session::SessionContext;

const CHECK_IN_NOTES: &str = "Driver Check-In";
const CHECK_OUT_NOTES: &str = "Driver Check-Out";
const CHECK_OUT_EMPTY_NOTES: &str = "Driver Check-Out (SJ ditunda di customer)";

/// Dokumen yang ikut di-check-out
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutSelection {
    /// Semua SJ yang sedang di customer
    All,
    /// Sebagian SJ, sisanya tetap di customer
    Only(Vec<i64>),
    /// Check-out aktivitas saja tanpa SJ
    None,
}

pub struct DriverWorkbench<'a, A: ShipmentApi + ?Sized> {
    api: &'a A,
    session: &'a SessionContext,
}

impl<'a, A: ShipmentApi + ?Sized> DriverWorkbench<'a, A> {
    pub fn new(api: &'a A, session: &'a SessionContext) -> Self {
        Self { api, session }
    }

    fn driver_id(&self) -> i64 {
        self.session.user_id()
    }

    // Read gagal selain 401 -> list kosong
    fn read_or_empty(
        &self,
        result: Result<Vec<ShipmentDocument>, HttpClientError>,
        what: &str,
    ) -> AppResult<Vec<ShipmentDocument>> {
        match result {
            Ok(docs) => Ok(docs),
            Err(err) if err.is_unauthorized() => Err(err.into()),
            Err(err) => {
                tracing::warn!("⚠️ Gagal memuat {}: {}", what, err);
                Ok(Vec::new())
            }
        }
    }

    pub async fn in_transit(&self) -> AppResult<Vec<ShipmentDocument>> {
        let result = self.api.list_in_transit(self.driver_id()).await;
        self.read_or_empty(result, "SJ in-transit")
    }

    /// SJ in-transit dikelompokkan per customer tujuan
    pub async fn customer_groups(&self) -> AppResult<Vec<DocumentGroup<i64>>> {
        let docs = self.in_transit().await?;
        Ok(group_by_customer(&docs))
    }

    pub async fn on_customer(&self, customer_id: Option<i64>) -> AppResult<Vec<ShipmentDocument>> {
        let result = self.api.list_on_customer(customer_id, self.driver_id()).await;
        self.read_or_empty(result, "SJ on-customer")
    }

    /// Customer tempat driver sedang check-in, kalau ada
    pub async fn active_check_in(&self) -> AppResult<Option<ShipmentDocument>> {
        let docs = self.on_customer(None).await?;
        Ok(docs
            .into_iter()
            .find(|doc| doc.status == ShipmentStatus::DriverCheckIn))
    }

    /// Check-in semua SJ in-transit untuk satu customer
    pub async fn check_in(&self, customer_id: i64, notes: Option<&str>) -> AppResult<SubmitOutcome> {
        let docs = self.in_transit().await?;
        let groups = group_by_customer(&docs);
        let group = find_group(&groups, Some(&customer_id)).ok_or_else(|| {
            AppError::validation(format!("Tidak ada SJ in-transit untuk customer {}", customer_id))
        })?;

        let ids = group.ids();
        validate_batch(Action::DriverCheckIn, &ids, &docs)?;
        let tnkb_id = group
            .documents
            .iter()
            .find_map(|doc| doc.tnkb_id)
            .ok_or(TransitionError::MissingAssignment)?;

        let request = HandoverRequest {
            m_inout_ids: ids,
            status: Action::DriverCheckIn.target().as_str().to_string(),
            user_id: self.driver_id(),
            notes: Some(notes_or(notes, CHECK_IN_NOTES)?),
            driver_by: Some(self.driver_id()),
            tnkb_id: Some(tnkb_id),
            customer_id: Some(customer_id),
        };

        let submitted = request.m_inout_ids.len();
        let message = self.send(Action::DriverCheckIn, request).await?;
        let remaining = settle_count(self.in_transit().await, docs.len());
        tracing::debug!("{} SJ masih in-transit", remaining);

        Ok(SubmitOutcome {
            message: message?,
            submitted,
            remaining,
        })
    }

    /// Check-out dari customer. Tanpa SJ berarti check-out aktivitas saja.
    pub async fn check_out(
        &self,
        customer_id: i64,
        selection: CheckOutSelection,
        notes: Option<&str>,
    ) -> AppResult<SubmitOutcome> {
        let docs = self.on_customer(Some(customer_id)).await?;
        let at_customer: Vec<ShipmentDocument> = docs
            .into_iter()
            .filter(|doc| doc.customer_id == Some(customer_id))
            .collect();

        let ids: Vec<i64> = match &selection {
            CheckOutSelection::All => at_customer.iter().map(|doc| doc.id).collect(),
            CheckOutSelection::Only(ids) => {
                if ids.is_empty() {
                    return Err(TransitionError::EmptySelection.into());
                }
                ids.clone()
            }
            CheckOutSelection::None => Vec::new(),
        };
        validate_batch(Action::DriverCheckOut, &ids, &at_customer)?;

        // TNKB diambil dari SJ manapun di customer ini, 0 kalau memang tidak ada
        let tnkb_id = at_customer.iter().find_map(|doc| doc.tnkb_id).unwrap_or(0);
        let default_notes = if ids.is_empty() { CHECK_OUT_EMPTY_NOTES } else { CHECK_OUT_NOTES };

        let request = HandoverRequest {
            m_inout_ids: ids,
            status: Action::DriverCheckOut.target().as_str().to_string(),
            user_id: self.driver_id(),
            notes: Some(notes_or(notes, default_notes)?),
            driver_by: Some(self.driver_id()),
            tnkb_id: Some(tnkb_id),
            customer_id: Some(customer_id),
        };

        let submitted = request.m_inout_ids.len();
        let message = self.send(Action::DriverCheckOut, request).await?;
        let remaining = settle_count(self.on_customer(Some(customer_id)).await, at_customer.len());
        tracing::debug!("{} SJ masih di customer {}", remaining, customer_id);

        Ok(SubmitOutcome {
            message: message?,
            submitted,
            remaining,
        })
    }

    /// Kirim check-in/out. Lapisan luar hanya gagal untuk validasi dan 401,
    /// error mutasi lain dikembalikan di dalam supaya list tetap di-refetch dulu.
    async fn send(
        &self,
        action: Action,
        request: HandoverRequest,
    ) -> AppResult<AppResult<String>> {
        validate_payload(action, &request)?;
        let count = request.m_inout_ids.len();

        match self.api.submit_handover(action.endpoint(), request).await {
            Ok(resp) => {
                tracing::info!("🚚 {} ({} SJ)", action.label(), count);
                Ok(Ok(resp
                    .server_message()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} berhasil", action.label()))))
            }
            Err(err) if err.is_unauthorized() => Err(err.into()),
            Err(err) => {
                tracing::error!("❌ {} gagal: {}", action.label(), err);
                Ok(Err(AppError::from_mutation(err)))
            }
        }
    }
}

// Refetch setelah mutasi tidak boleh mengubah hasil mutasi, error cukup dicatat
fn settle_count(refetched: AppResult<Vec<ShipmentDocument>>, last_known: usize) -> usize {
    match refetched {
        Ok(docs) => docs.len(),
        Err(err) => {
            tracing::warn!("⚠️ Refresh setelah mutasi gagal: {}", err);
            last_known
        }
    }
}

fn notes_or(notes: Option<&str>, default: &str) -> AppResult<String> {
    let notes = normalize_notes(notes).unwrap_or_else(|| default.to_string());
    if !is_valid_notes(&notes) {
        return Err(AppError::validation(format!(
            "Catatan maksimal {} karakter",
            MAX_NOTES_LEN
        )));
    }
    Ok(notes)
}
