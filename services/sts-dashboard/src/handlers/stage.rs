use shared::utils::validation::{is_valid_id, is_valid_notes, normalize_notes, MAX_NOTES_LEN};
use shared::{ApiResponse, HttpClientError};

use crate::domain::grouping::{find_group, group_by_spp, DocumentGroup};
use crate::domain::selection::Selection;
use crate::domain::transition::{validate_batch, validate_cancel, validate_payload};
use crate::domain::{
    Action, AssignmentForm, CancelRequest, DateRange, EditDriverTnkbRequest, Endpoint,
    HandoverRequest, ShipmentDocument, ShipmentStatus, Stage, StageView, TransitionError,
};
use crate::error::{AppError, AppResult};
use crate::repositories::ShipmentApi;
use crate::session::SessionContext;

/// Batch yang sudah lolos validasi dan menunggu konfirmasi operator
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPlan {
    pub action: Action,
    pub endpoint: Endpoint,
    pub request: HandoverRequest,
    pub document_nos: Vec<String>,
}

impl BatchPlan {
    pub fn len(&self) -> usize {
        self.request.m_inout_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.request.m_inout_ids.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} {} dokumen -> {}",
            self.action.label(),
            self.len(),
            self.action.target()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub message: String,
    pub submitted: usize,
    pub remaining: usize,
}

/// Controller satu halaman workflow: list -> pilih -> konfirmasi -> kirim -> refresh
pub struct StagePage<'a, A: ShipmentApi + ?Sized> {
    api: &'a A,
    session: &'a SessionContext,
    stage: Stage,
    range: DateRange,
    documents: Vec<ShipmentDocument>,
    selection: Selection,
    assignment: AssignmentForm,
}

impl<'a, A: ShipmentApi + ?Sized> StagePage<'a, A> {
    pub fn new(api: &'a A, session: &'a SessionContext, stage: Stage, range: DateRange) -> Self {
        Self {
            api,
            session,
            stage,
            range,
            documents: Vec::new(),
            selection: Selection::new(),
            assignment: AssignmentForm::default(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn documents(&self) -> &[ShipmentDocument] {
        &self.documents
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn assignment_mut(&mut self) -> &mut AssignmentForm {
        &mut self.assignment
    }

    /// Ambil ulang list. Read gagal (selain 401) dicatat dan list jadi kosong.
    pub async fn refresh(&mut self) -> AppResult<usize> {
        match self.api.list_stage(self.stage, self.range).await {
            Ok(documents) => {
                self.documents = documents;
            }
            Err(err) if err.is_unauthorized() => return Err(err.into()),
            Err(err) => {
                tracing::warn!("⚠️ Gagal memuat {}: {}", self.stage.slug(), err);
                self.documents.clear();
            }
        }

        let outside = self
            .documents
            .iter()
            .filter(|doc| doc.movement_date.is_some_and(|d| !self.range.contains(d)))
            .count();
        if outside > 0 {
            tracing::warn!(
                "⚠️ {} dokumen {} di luar rentang {} s/d {}",
                outside,
                self.stage.slug(),
                self.range.from,
                self.range.to
            );
        }

        let dropped = self.selection.prune(&self.documents);
        if dropped > 0 {
            tracing::debug!("{} pilihan dibuang karena dokumen sudah tidak ada di list", dropped);
        }
        Ok(self.documents.len())
    }

    /// Refetch setelah mutasi. Hasil mutasi sudah diputuskan, jadi error di sini
    /// (termasuk 401) cuma dicatat dan list terakhir dipakai.
    async fn refresh_after_mutation(&mut self) -> usize {
        match self.refresh().await {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!("⚠️ Refresh setelah mutasi gagal: {}", err);
                self.documents.len()
            }
        }
    }

    pub fn find(&self, id: i64) -> Option<&ShipmentDocument> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    fn ensure_listed(&self, id: i64) -> AppResult<&ShipmentDocument> {
        self.find(id)
            .ok_or_else(|| TransitionError::UnknownDocument(id).into())
    }

    pub fn select_ids(&mut self, ids: &[i64]) -> AppResult {
        for id in ids {
            self.ensure_listed(*id)?;
        }
        for id in ids {
            self.selection.select(*id);
        }
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.documents);
    }

    /// Group per SPP, hanya untuk halaman yang view-nya grouped
    pub fn groups(&self) -> Vec<DocumentGroup<String>> {
        match self.stage.view() {
            StageView::GroupedBySpp => group_by_spp(&self.documents),
            StageView::Flat => Vec::new(),
        }
    }

    fn group_ids(&self, spp_no: Option<&str>) -> AppResult<Vec<i64>> {
        let groups = self.groups();
        let key = spp_no.map(|s| s.to_string());
        find_group(&groups, key.as_ref())
            .map(|group| group.ids())
            .ok_or_else(|| AppError::validation(format!("SPP {} tidak ada di list", spp_no.unwrap_or("-"))))
    }

    /// Toggle semua anggota satu SPP group (`None` = group tanpa SPP)
    pub fn toggle_group(&mut self, spp_no: Option<&str>) -> AppResult {
        let ids = self.group_ids(spp_no)?;
        self.selection.toggle_group(&ids);
        Ok(())
    }

    /// Tambah semua anggota satu SPP group ke pilihan yang sudah ada
    pub fn select_group(&mut self, spp_no: Option<&str>) -> AppResult {
        let ids = self.group_ids(spp_no)?;
        self.selection.select_group(&ids);
        Ok(())
    }

    /// Validasi pilihan dan susun payload. Tidak ada request yang dikirim di sini.
    pub fn prepare(&self, notes: Option<&str>) -> AppResult<BatchPlan> {
        let action = self.stage.action().ok_or_else(|| {
            AppError::validation(format!("Halaman {} tidak punya aksi handover", self.stage.slug()))
        })?;

        let ids = self.selection.ids();
        validate_batch(action, &ids, &self.documents)?;

        let (driver_by, tnkb_id) = if action.requires_assignment() {
            if !self.assignment.can_submit() {
                return Err(TransitionError::MissingAssignment.into());
            }
            (self.assignment.driver_id, self.assignment.tnkb_id)
        } else {
            (None, None)
        };

        let notes = normalize_notes(notes);
        if let Some(n) = &notes {
            if !is_valid_notes(n) {
                return Err(AppError::validation(format!(
                    "Catatan maksimal {} karakter",
                    MAX_NOTES_LEN
                )));
            }
        }

        let document_nos = ids
            .iter()
            .filter_map(|id| self.find(*id))
            .map(|doc| doc.document_no.clone())
            .collect();

        let request = HandoverRequest {
            m_inout_ids: ids,
            status: action.target().as_str().to_string(),
            user_id: self.session.user_id(),
            notes,
            driver_by,
            tnkb_id,
            customer_id: None,
        };
        validate_payload(action, &request)?;

        Ok(BatchPlan {
            action,
            endpoint: action.endpoint(),
            request,
            document_nos,
        })
    }

    /// Kirim batch yang sudah dikonfirmasi. List selalu di-refresh setelah
    /// request selesai, baik sukses maupun gagal.
    pub async fn submit(&mut self, plan: BatchPlan) -> AppResult<SubmitOutcome> {
        let submitted = plan.len();
        let result = match self.api.submit_handover(plan.endpoint, plan.request).await {
            Err(err) if err.is_unauthorized() => return Err(err.into()),
            other => other,
        };

        match result {
            Ok(resp) => {
                self.selection.clear();
                self.assignment = AssignmentForm::default();
                let remaining = self.refresh_after_mutation().await;
                let message = resp
                    .server_message()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} berhasil", plan.action.label()));
                tracing::info!(
                    "✅ {} {} dokumen ({})",
                    plan.action.label(),
                    submitted,
                    self.stage.slug()
                );
                Ok(SubmitOutcome {
                    message,
                    submitted,
                    remaining,
                })
            }
            Err(err) => {
                tracing::error!("❌ {} gagal: {}", plan.action.label(), err);
                self.refresh_after_mutation().await;
                Err(AppError::from_mutation(err))
            }
        }
    }

    /// Batalkan satu dokumen. Hanya untuk status cancelable halaman ini.
    pub async fn cancel(&mut self, id: i64) -> AppResult<String> {
        let doc = self.ensure_listed(id)?;
        let status = validate_cancel(doc, self.stage.cancelable_status())?;
        let document_no = doc.document_no.clone();

        let request = CancelRequest {
            m_inout_id: id,
            status: status.as_str().to_string(),
        };
        let result = self.api.cancel_outstanding(request).await;
        self.finish_single_mutation(result, &document_no, "Pembatalan").await
    }

    /// Ganti driver/TNKB dokumen yang sudah diserahkan ke driver (outstanding DPK)
    pub async fn reassign(&mut self, id: i64, form: &AssignmentForm) -> AppResult<String> {
        if !self.stage.allows_reassign() {
            return Err(AppError::validation(format!(
                "Edit driver/TNKB tidak tersedia di halaman {}",
                self.stage.slug()
            )));
        }

        let doc = self.ensure_listed(id)?;
        if doc.status != ShipmentStatus::DpkToDriver {
            return Err(AppError::validation(format!(
                "Dokumen {} berstatus {}, tidak bisa edit driver/TNKB",
                doc.document_no, doc.status
            )));
        }
        let (driver_by, tnkb_id) = form.complete().ok_or(TransitionError::MissingAssignment)?;
        if !is_valid_id(driver_by) || !is_valid_id(tnkb_id) {
            return Err(TransitionError::MissingAssignment.into());
        }
        let document_no = doc.document_no.clone();

        let request = EditDriverTnkbRequest {
            m_inout_id: id,
            driver_by,
            tnkb_id,
        };
        let result = self.api.edit_driver_tnkb(request).await;
        self.finish_single_mutation(result, &document_no, "Edit driver/TNKB").await
    }

    async fn finish_single_mutation(
        &mut self,
        result: Result<ApiResponse, HttpClientError>,
        document_no: &str,
        label: &str,
    ) -> AppResult<String> {
        let result = match result {
            Err(err) if err.is_unauthorized() => return Err(err.into()),
            other => other,
        };

        match result {
            Ok(resp) => {
                tracing::info!("✅ {} {} berhasil", label, document_no);
                self.refresh_after_mutation().await;
                Ok(resp
                    .server_message()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} {} berhasil", label, document_no)))
            }
            Err(err) => {
                tracing::error!("❌ {} {} gagal: {}", label, document_no, err);
                self.refresh_after_mutation().await;
                Err(AppError::from_mutation(err))
            }
        }
    }
}
