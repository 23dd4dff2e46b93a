use clap::ValueEnum;

use super::status::ShipmentStatus;
use super::transition::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageView {
    Flat,
    GroupedBySpp,
}

/// Halaman workflow: "tampilkan dokumen di status X, tawarkan transisi ke Y"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Stage {
    DeliveryToDpk,
    DpkReceipt,
    DpkToDriver,
    DpkFromDriver,
    DpkToDelivery,
    DeliveryFromDpk,
    DeliveryToMarketing,
    MarketingFromDelivery,
    MarketingToFat,
    FatFromMarketing,
    OutstandingDelivery,
    OutstandingDpk,
}

impl Stage {
    pub const ALL: [Stage; 12] = [
        Stage::DeliveryToDpk,
        Stage::DpkReceipt,
        Stage::DpkToDriver,
        Stage::DpkFromDriver,
        Stage::DpkToDelivery,
        Stage::DeliveryFromDpk,
        Stage::DeliveryToMarketing,
        Stage::MarketingFromDelivery,
        Stage::MarketingToFat,
        Stage::FatFromMarketing,
        Stage::OutstandingDelivery,
        Stage::OutstandingDpk,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Stage::DeliveryToDpk => "delivery-to-dpk",
            Stage::DpkReceipt => "dpk-receipt",
            Stage::DpkToDriver => "dpk-to-driver",
            Stage::DpkFromDriver => "dpk-from-driver",
            Stage::DpkToDelivery => "dpk-to-delivery",
            Stage::DeliveryFromDpk => "delivery-from-dpk",
            Stage::DeliveryToMarketing => "delivery-to-marketing",
            Stage::MarketingFromDelivery => "marketing-from-delivery",
            Stage::MarketingToFat => "marketing-to-fat",
            Stage::FatFromMarketing => "fat-from-marketing",
            Stage::OutstandingDelivery => "outstanding-delivery",
            Stage::OutstandingDpk => "outstanding-dpk",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Stage::DeliveryToDpk => "Delivery - Handover ke DPK",
            Stage::DpkReceipt => "DPK - Receipt dari Delivery",
            Stage::DpkToDriver => "DPK - Handover ke Driver",
            Stage::DpkFromDriver => "DPK - Receipt dari Driver",
            Stage::DpkToDelivery => "DPK - Handover ke Delivery",
            Stage::DeliveryFromDpk => "Delivery - Receipt dari DPK",
            Stage::DeliveryToMarketing => "Delivery - Handover ke Marketing",
            Stage::MarketingFromDelivery => "Marketing - Receipt dari Delivery",
            Stage::MarketingToFat => "Marketing - Handover ke FAT",
            Stage::FatFromMarketing => "FAT - Receipt dari Marketing",
            Stage::OutstandingDelivery => "Outstanding Delivery",
            Stage::OutstandingDpk => "Outstanding DPK",
        }
    }

    pub fn list_endpoint(&self) -> &'static str {
        match self {
            Stage::DeliveryToDpk => "/shipments/pending",
            Stage::DpkReceipt => "/shipments/prepare",
            Stage::DpkToDriver => "/shipments/preparetoleave",
            Stage::DpkFromDriver => "/shipments/comeback",
            Stage::DpkToDelivery => "/shipments/comebacktodelivery",
            Stage::DeliveryFromDpk => "/shipments/receiptcomebacktodelivery",
            Stage::DeliveryToMarketing => "/shipments/comebacktomarketing",
            Stage::MarketingFromDelivery => "/shipments/receiptcomebacktomarketing",
            Stage::MarketingToFat => "/shipments/comebacktofat",
            Stage::FatFromMarketing => "/shipments/receiptcomebacktofat",
            Stage::OutstandingDelivery => "/shipments/outstanding/delivery",
            Stage::OutstandingDpk => "/shipments/outstanding/dpk",
        }
    }

    /// Transisi maju yang ditawarkan halaman ini
    pub fn action(&self) -> Option<Action> {
        match self {
            Stage::DeliveryToDpk => Some(Action::HandoverToDpk),
            Stage::DpkReceipt => Some(Action::ReceiveAtDpk),
            Stage::DpkToDriver => Some(Action::AssignDriver),
            Stage::DpkFromDriver => Some(Action::ReceiveFromDriver),
            Stage::DpkToDelivery => Some(Action::ReturnToDelivery),
            Stage::DeliveryFromDpk => Some(Action::ReceiveFromDpk),
            Stage::DeliveryToMarketing => Some(Action::HandoverToMarketing),
            Stage::MarketingFromDelivery => Some(Action::ReceiveAtMarketing),
            Stage::MarketingToFat => Some(Action::HandoverToFinance),
            Stage::FatFromMarketing => Some(Action::ReceiveAtFinance),
            Stage::OutstandingDelivery | Stage::OutstandingDpk => None,
        }
    }

    /// Satu-satunya status yang boleh dibatalkan dari halaman ini
    pub fn cancelable_status(&self) -> Option<ShipmentStatus> {
        match self {
            Stage::MarketingFromDelivery => Some(ShipmentStatus::DelToMkt),
            Stage::OutstandingDelivery => Some(ShipmentStatus::DelToDpk),
            Stage::OutstandingDpk => Some(ShipmentStatus::DpkToDriver),
            _ => None,
        }
    }

    /// Edit driver/TNKB hanya di outstanding DPK
    pub fn allows_reassign(&self) -> bool {
        matches!(self, Stage::OutstandingDpk)
    }

    pub fn view(&self) -> StageView {
        match self {
            Stage::MarketingToFat => StageView::GroupedBySpp,
            _ => StageView::Flat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_matches_clap_value() {
        for stage in Stage::ALL {
            let value = stage.to_possible_value().unwrap();
            assert_eq!(value.get_name(), stage.slug());
        }
    }

    #[test]
    fn test_cancelable_status_is_reversible() {
        for stage in Stage::ALL {
            if let Some(status) = stage.cancelable_status() {
                assert!(crate::domain::transition::cancel_target(status).is_some(), "{:?}", stage);
            }
        }
    }

    #[test]
    fn test_only_marketing_to_fat_is_grouped() {
        let grouped: Vec<Stage> = Stage::ALL
            .into_iter()
            .filter(|s| s.view() == StageView::GroupedBySpp)
            .collect();
        assert_eq!(grouped, vec![Stage::MarketingToFat]);
    }
}
