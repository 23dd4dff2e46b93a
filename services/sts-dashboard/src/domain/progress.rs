use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared::utils::lenient::{opt_date_from_any, opt_trimmed_string};

/// Sepuluh milestone progress SJ, berurutan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Delivery,
    OnDpk,
    OnDriver,
    OnCustomer,
    OutCustomer,
    ComebackDpk,
    ComebackDelivery,
    ComebackMarketing,
    ComebackFat,
    FinishFat,
}

impl Milestone {
    pub const ALL: [Milestone; 10] = [
        Milestone::Delivery,
        Milestone::OnDpk,
        Milestone::OnDriver,
        Milestone::OnCustomer,
        Milestone::OutCustomer,
        Milestone::ComebackDpk,
        Milestone::ComebackDelivery,
        Milestone::ComebackMarketing,
        Milestone::ComebackFat,
        Milestone::FinishFat,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Milestone::Delivery => "Delivery",
            Milestone::OnDpk => "On DPK",
            Milestone::OnDriver => "On Driver",
            Milestone::OnCustomer => "On Customer",
            Milestone::OutCustomer => "Out Customer",
            Milestone::ComebackDpk => "Comeback DPK",
            Milestone::ComebackDelivery => "Comeback Delivery",
            Milestone::ComebackMarketing => "Comeback Marketing",
            Milestone::ComebackFat => "Comeback FAT",
            Milestone::FinishFat => "Finish FAT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneState {
    Done,
    InProgress,
    Pending,
}

impl MilestoneState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneState::Done => "DONE",
            MilestoneState::InProgress => "IN PROGRESS",
            MilestoneState::Pending => "PENDING",
        }
    }
}

// Row dari `/shipments/progress`, flag 1/0 per milestone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressRecord {
    #[serde(rename = "documentno", default)]
    pub document_no: String,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub customer: Option<String>,
    #[serde(rename = "movementdate", default, deserialize_with = "opt_date_from_any")]
    pub movement_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub driver: Option<String>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub tnkb: Option<String>,
    #[serde(default)]
    pub delivery: u8,
    #[serde(default)]
    pub ondpk: u8,
    #[serde(default)]
    pub ondriver: u8,
    #[serde(default)]
    pub oncustomer: u8,
    #[serde(default)]
    pub outcustomer: u8,
    #[serde(default)]
    pub comebackdpk: u8,
    #[serde(default)]
    pub comebackdel: u8,
    #[serde(default)]
    pub comebackmkt: u8,
    #[serde(default)]
    pub comebackfat: u8,
    #[serde(default)]
    pub finishfat: u8,
}

impl ProgressRecord {
    pub fn flags(&self) -> [u8; 10] {
        [
            self.delivery,
            self.ondpk,
            self.ondriver,
            self.oncustomer,
            self.outcustomer,
            self.comebackdpk,
            self.comebackdel,
            self.comebackmkt,
            self.comebackfat,
            self.finishfat,
        ]
    }

    pub fn milestone_states(&self) -> [MilestoneState; 10] {
        milestone_states(&self.flags())
    }

    pub fn current(&self) -> Option<Milestone> {
        current_milestone(&self.flags()).map(|i| Milestone::ALL[i])
    }
}

/// Milestone `i` in progress kalau flag `i` = 0 dan flag `i-1` = 1
/// (atau `i` adalah milestone pertama)
pub fn milestone_states(flags: &[u8; 10]) -> [MilestoneState; 10] {
    let mut states = [MilestoneState::Pending; 10];
    for (i, state) in states.iter_mut().enumerate() {
        *state = if flags[i] != 0 {
            MilestoneState::Done
        } else if i == 0 || flags[i - 1] != 0 {
            MilestoneState::InProgress
        } else {
            MilestoneState::Pending
        };
    }
    states
}

/// Index milestone yang sedang berjalan, `None` kalau semua sudah selesai
pub fn current_milestone(flags: &[u8; 10]) -> Option<usize> {
    milestone_states(flags)
        .iter()
        .position(|state| *state == MilestoneState::InProgress)
}
