use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::status::ShipmentStatus;
use shared::utils::lenient::{i64_from_any, opt_date_from_any, opt_i64_from_any, opt_trimmed_string};

// Model utama Surat Jalan (SJ) dari list endpoint `/shipments/*`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShipmentDocument {
    #[serde(rename = "m_inout_id", deserialize_with = "i64_from_any")]
    pub id: i64,
    #[serde(default)]
    pub document_no: String,
    #[serde(default, deserialize_with = "opt_date_from_any")]
    pub movement_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "opt_i64_from_any")]
    pub customer_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub customer_name: Option<String>,
    #[serde(rename = "driver_by", default, deserialize_with = "opt_i64_from_any")]
    pub driver_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub driver_name: Option<String>,
    #[serde(default, deserialize_with = "opt_i64_from_any")]
    pub tnkb_id: Option<i64>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub tnkb_no: Option<String>,
    #[serde(default)]
    pub status: ShipmentStatus,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub spp_no: Option<String>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub bundle_no: Option<String>,
    #[serde(default, deserialize_with = "opt_trimmed_string")]
    pub attachment_path: Option<String>,
}

impl ShipmentDocument {
    pub fn customer_label(&self) -> &str {
        self.customer_name.as_deref().unwrap_or("-")
    }
}

// Reference list driver (`/shipments/drivers`).
// Backend lama kirim nama driver dengan key "Name", jadi alias tetap diterima.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    #[serde(rename = "driver_by", deserialize_with = "i64_from_any")]
    pub id: i64,
    #[serde(rename = "driver_name", alias = "Name", alias = "name", default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tnkb {
    #[serde(rename = "tnkb_id", deserialize_with = "i64_from_any")]
    pub id: i64,
    #[serde(rename = "tnkb_no", alias = "Name", alias = "name", default)]
    pub plate_no: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    #[serde(rename = "customer_id", deserialize_with = "i64_from_any")]
    pub id: i64,
    #[serde(rename = "customer_name", default)]
    pub name: String,
}

// Payload `/handover/init` dan `/handover/process`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HandoverRequest {
    pub m_inout_ids: Vec<i64>,
    pub status: String,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_by: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tnkb_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
}

// Payload `/shipments/outstanding/cancel`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CancelRequest {
    pub m_inout_id: i64,
    pub status: String,
}

// Payload `/shipments/edit/drivertnkb`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EditDriverTnkbRequest {
    pub m_inout_id: i64,
    pub driver_by: i64,
    pub tnkb_id: i64,
}

// Payload `PUT /shipments/drivers` (admin)
#[derive(Debug, Clone, Serialize, PartialEq, Validate)]
pub struct UpdateDriverRequest {
    #[validate(range(min = 1, message = "Driver wajib dipilih"))]
    pub driver_id: i64,
    #[validate(length(min = 1, max = 60, message = "Nama driver 1-60 karakter"))]
    pub driver_name: String,
    #[validate(length(min = 6, message = "Password minimal 6 karakter"))]
    pub password: String,
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    // Dokumen minimal untuk test
    pub fn doc(id: i64, status: ShipmentStatus) -> ShipmentDocument {
        ShipmentDocument {
            id,
            document_no: format!("SJ-{:04}", id),
            movement_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            customer_id: Some(100 + id % 3),
            customer_name: Some(format!("Customer {}", 100 + id % 3)),
            driver_id: None,
            driver_name: None,
            tnkb_id: None,
            tnkb_no: None,
            status,
            spp_no: None,
            bundle_no: None,
            attachment_path: None,
        }
    }

    pub fn doc_with_spp(id: i64, status: ShipmentStatus, spp: Option<&str>) -> ShipmentDocument {
        ShipmentDocument {
            spp_no: spp.map(|s| s.to_string()),
            ..doc(id, status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_from_backend_row() {
        let doc: ShipmentDocument = serde_json::from_value(json!({
            "m_inout_id": 1000234,
            "document_no": "SJ/2024/0001",
            "movement_date": "2024-01-05T00:00:00+07:00",
            "customer_name": "PT Maju Jaya",
            "status": "HO: DPK_TO_DRIVER",
            "driver_name": "Budi",
            "customer_id": "1000555",
            "tnkb_id": "1000777",
            "tnkb_no": "B 1234 XY"
        }))
        .unwrap();

        assert_eq!(doc.id, 1000234);
        assert_eq!(doc.movement_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(doc.customer_id, Some(1000555));
        assert_eq!(doc.tnkb_id, Some(1000777));
        assert_eq!(doc.status, ShipmentStatus::DpkToDriver);
        assert_eq!(doc.driver_id, None);
    }

    #[test]
    fn test_document_null_status_is_pending() {
        let doc: ShipmentDocument = serde_json::from_value(json!({
            "m_inout_id": 1,
            "document_no": "SJ-1",
            "movement_date": "2024-01-05",
            "status": null,
            "customer_id": null,
            "tnkb_id": null
        }))
        .unwrap();
        assert_eq!(doc.status, ShipmentStatus::Pending);
        assert_eq!(doc.customer_label(), "-");
    }

    #[test]
    fn test_document_unknown_status_rejected() {
        let result = serde_json::from_value::<ShipmentDocument>(json!({
            "m_inout_id": 1,
            "status": "HO: SOMEWHERE"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_reference_lists_accept_legacy_name_key() {
        let driver: Driver = serde_json::from_value(json!({ "driver_by": 10, "Name": "Budi" })).unwrap();
        assert_eq!(driver.name, "Budi");
        let tnkb: Tnkb = serde_json::from_value(json!({ "tnkb_id": "7", "tnkb_no": "B 1 AB" })).unwrap();
        assert_eq!(tnkb, Tnkb { id: 7, plate_no: "B 1 AB".to_string() });
    }

    #[test]
    fn test_handover_request_skips_empty_options() {
        let req = HandoverRequest {
            m_inout_ids: vec![1, 2],
            status: "HO: DEL_TO_DPK".to_string(),
            user_id: 42,
            notes: None,
            driver_by: None,
            tnkb_id: None,
            customer_id: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "m_inout_ids": [1, 2], "status": "HO: DEL_TO_DPK", "user_id": 42 })
        );
    }

    #[test]
    fn test_update_driver_validation() {
        let req = UpdateDriverRequest {
            driver_id: 0,
            driver_name: "".to_string(),
            password: "123".to_string(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("driver_id"));
        assert!(fields.contains_key("driver_name"));
        assert!(fields.contains_key("password"));
    }
}
