// Tabel transisi workflow Surat Jalan: (status, action) -> status
use std::collections::HashMap;
use thiserror::Error;

use super::shipment::{HandoverRequest, ShipmentDocument};
use super::status::ShipmentStatus;
use shared::utils::validation::find_duplicate_id;

/// Endpoint backend untuk transisi
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Init,
    Process,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Init => "/handover/init",
            Endpoint::Process => "/handover/process",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    HandoverToDpk,
    ReceiveAtDpk,
    AssignDriver,
    DriverCheckIn,
    DriverCheckOut,
    ReceiveFromDriver,
    ReturnToDelivery,
    ReceiveFromDpk,
    HandoverToMarketing,
    ReceiveAtMarketing,
    HandoverToFinance,
    ReceiveAtFinance,
}

impl Action {
    /// Status asal yang sah untuk action ini
    pub fn sources(&self) -> &'static [ShipmentStatus] {
        use ShipmentStatus::*;
        match self {
            Action::HandoverToDpk => &[Pending],
            Action::ReceiveAtDpk => &[DelToDpk],
            Action::AssignDriver => &[DpkFromDel],
            Action::DriverCheckIn => &[DpkToDriver],
            Action::DriverCheckOut => &[DriverCheckIn],
            Action::ReceiveFromDriver => &[DpkToDriver, DriverCheckIn, DriverCheckOut],
            Action::ReturnToDelivery => &[DpkFromDriver],
            Action::ReceiveFromDpk => &[DpkToDel],
            Action::HandoverToMarketing => &[DelFromDpk],
            Action::ReceiveAtMarketing => &[DelToMkt],
            Action::HandoverToFinance => &[MktFromDel],
            Action::ReceiveAtFinance => &[MktToFat],
        }
    }

    pub fn target(&self) -> ShipmentStatus {
        use ShipmentStatus::*;
        match self {
            Action::HandoverToDpk => DelToDpk,
            Action::ReceiveAtDpk => DpkFromDel,
            Action::AssignDriver => DpkToDriver,
            Action::DriverCheckIn => DriverCheckIn,
            Action::DriverCheckOut => DriverCheckOut,
            Action::ReceiveFromDriver => DpkFromDriver,
            Action::ReturnToDelivery => DpkToDel,
            Action::ReceiveFromDpk => DelFromDpk,
            Action::HandoverToMarketing => DelToMkt,
            Action::ReceiveAtMarketing => MktFromDel,
            Action::HandoverToFinance => MktToFat,
            Action::ReceiveAtFinance => FatFromMkt,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Action::HandoverToDpk => Endpoint::Init,
            _ => Endpoint::Process,
        }
    }

    /// Driver dan TNKB wajib diisi
    pub fn requires_assignment(&self) -> bool {
        matches!(self, Action::AssignDriver)
    }

    /// Check-in/out wajib membawa driver, TNKB dan customer
    pub fn requires_customer(&self) -> bool {
        matches!(self, Action::DriverCheckIn | Action::DriverCheckOut)
    }

    /// Check-out boleh tanpa dokumen (aktivitas saja)
    pub fn allows_empty_batch(&self) -> bool {
        matches!(self, Action::DriverCheckOut)
    }

    pub fn accepts(&self, status: ShipmentStatus) -> bool {
        self.sources().contains(&status)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::HandoverToDpk => "Handover ke DPK",
            Action::ReceiveAtDpk => "Terima dari Delivery",
            Action::AssignDriver => "Handover ke Driver",
            Action::DriverCheckIn => "Check-in Customer",
            Action::DriverCheckOut => "Check-out Customer",
            Action::ReceiveFromDriver => "Terima dari Driver",
            Action::ReturnToDelivery => "Handover ke Delivery",
            Action::ReceiveFromDpk => "Terima dari DPK",
            Action::HandoverToMarketing => "Handover ke Marketing",
            Action::ReceiveAtMarketing => "Terima dari Delivery",
            Action::HandoverToFinance => "Handover ke FAT",
            Action::ReceiveAtFinance => "Terima dari Marketing",
        }
    }
}

/// Status berikutnya kalau action sah dari status sekarang
pub fn next_status(current: ShipmentStatus, action: Action) -> Option<ShipmentStatus> {
    action.accepts(current).then(|| action.target())
}

/// Status hasil pembatalan. `None` berarti status tidak bisa dibatalkan.
pub fn cancel_target(current: ShipmentStatus) -> Option<ShipmentStatus> {
    use ShipmentStatus::*;
    match current {
        DelToDpk => Some(Pending),
        DpkToDriver => Some(DpkFromDel),
        DpkToDel => Some(DpkFromDriver),
        DelToMkt => Some(DelFromDpk),
        MktToFat => Some(MktFromDel),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("Belum ada dokumen yang dipilih")]
    EmptySelection,

    #[error("Dokumen {0} dipilih lebih dari sekali")]
    DuplicateDocument(i64),

    #[error("Dokumen {0} tidak ada di daftar halaman ini")]
    UnknownDocument(i64),

    #[error("Dokumen {document_no} berstatus {status}, tidak bisa '{action}'")]
    IllegalTransition {
        document_no: String,
        status: ShipmentStatus,
        action: &'static str,
    },

    #[error("Driver dan TNKB wajib dipilih")]
    MissingAssignment,

    #[error("Customer wajib dipilih")]
    MissingCustomer,

    #[error("Status {status} tidak bisa dibatalkan di halaman ini")]
    NotCancelable { status: ShipmentStatus },
}

/// Validasi satu batch sebelum dikirim: semua dokumen harus ada di list dan
/// statusnya termasuk status asal action. Satu dokumen salah menggagalkan batch.
pub fn validate_batch(
    action: Action,
    selected: &[i64],
    listed: &[ShipmentDocument],
) -> Result<(), TransitionError> {
    if selected.is_empty() {
        return if action.allows_empty_batch() {
            Ok(())
        } else {
            Err(TransitionError::EmptySelection)
        };
    }

    if let Some(id) = find_duplicate_id(selected) {
        return Err(TransitionError::DuplicateDocument(id));
    }

    let by_id: HashMap<i64, &ShipmentDocument> = listed.iter().map(|doc| (doc.id, doc)).collect();

    for id in selected {
        let doc = by_id
            .get(id)
            .ok_or(TransitionError::UnknownDocument(*id))?;

        if next_status(doc.status, action).is_none() {
            return Err(TransitionError::IllegalTransition {
                document_no: doc.document_no.clone(),
                status: doc.status,
                action: action.label(),
            });
        }
    }

    Ok(())
}

/// Cek field wajib di payload sebelum dikirim ke backend
pub fn validate_payload(action: Action, request: &HandoverRequest) -> Result<(), TransitionError> {
    if action.requires_assignment() {
        let assigned = matches!(
            (request.driver_by, request.tnkb_id),
            (Some(driver), Some(tnkb)) if driver > 0 && tnkb > 0
        );
        if !assigned {
            return Err(TransitionError::MissingAssignment);
        }
    }

    if action.requires_customer() {
        // TNKB 0 sah untuk check-out aktivitas saja
        if request.driver_by.filter(|id| *id > 0).is_none() || request.tnkb_id.is_none() {
            return Err(TransitionError::MissingAssignment);
        }
        if request.customer_id.filter(|id| *id > 0).is_none() {
            return Err(TransitionError::MissingCustomer);
        }
    }

    Ok(())
}

/// Cancel hanya untuk status yang persis sama dengan status cancelable halaman
pub fn validate_cancel(
    doc: &ShipmentDocument,
    cancelable: Option<ShipmentStatus>,
) -> Result<ShipmentStatus, TransitionError> {
    match cancelable {
        Some(expected) if doc.status == expected && cancel_target(expected).is_some() => Ok(expected),
        _ => Err(TransitionError::NotCancelable { status: doc.status }),
    }
}
