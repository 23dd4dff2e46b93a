use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Status workflow Surat Jalan. Tag string dikirim apa adanya ke backend.
///
/// `Pending` tidak punya tag: di wire muncul sebagai `null` atau string kosong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ShipmentStatus {
    #[default]
    Pending,
    DelToDpk,
    DpkFromDel,
    DpkToDriver,
    DriverCheckIn,
    DriverCheckOut,
    DpkFromDriver,
    DpkToDel,
    DelFromDpk,
    DelToMkt,
    MktFromDel,
    MktToFat,
    FatFromMkt,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 13] = [
        ShipmentStatus::Pending,
        ShipmentStatus::DelToDpk,
        ShipmentStatus::DpkFromDel,
        ShipmentStatus::DpkToDriver,
        ShipmentStatus::DriverCheckIn,
        ShipmentStatus::DriverCheckOut,
        ShipmentStatus::DpkFromDriver,
        ShipmentStatus::DpkToDel,
        ShipmentStatus::DelFromDpk,
        ShipmentStatus::DelToMkt,
        ShipmentStatus::MktFromDel,
        ShipmentStatus::MktToFat,
        ShipmentStatus::FatFromMkt,
    ];

    /// Tag wire, `None` untuk Pending
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            ShipmentStatus::Pending => None,
            ShipmentStatus::DelToDpk => Some("HO: DEL_TO_DPK"),
            ShipmentStatus::DpkFromDel => Some("RE: DPK_FROM_DEL"),
            ShipmentStatus::DpkToDriver => Some("HO: DPK_TO_DRIVER"),
            ShipmentStatus::DriverCheckIn => Some("HO: DRIVER_CHECKIN"),
            ShipmentStatus::DriverCheckOut => Some("HO: DRIVER_CHECKOUT"),
            ShipmentStatus::DpkFromDriver => Some("RE: DPK_FROM_DRIVER"),
            ShipmentStatus::DpkToDel => Some("HO: DPK_TO_DEL"),
            ShipmentStatus::DelFromDpk => Some("RE: DEL_FROM_DPK"),
            ShipmentStatus::DelToMkt => Some("HO: DEL_TO_MKT"),
            ShipmentStatus::MktFromDel => Some("RE: MKT_FROM_DEL"),
            ShipmentStatus::MktToFat => Some("HO: MKT_TO_FAT"),
            ShipmentStatus::FatFromMkt => Some("RE: FAT_FROM_MKT"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.tag().unwrap_or("PENDING")
    }

    /// Parse tag dari backend. String kosong berarti Pending, tag lain yang
    /// tidak dikenal menghasilkan `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Some(ShipmentStatus::Pending);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.tag() == Some(tag))
    }

    /// Pihak yang sedang memegang dokumen
    pub fn holder(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending | ShipmentStatus::DpkToDel | ShipmentStatus::DelFromDpk => "Delivery",
            ShipmentStatus::DelToDpk | ShipmentStatus::DpkFromDel | ShipmentStatus::DpkFromDriver => "DPK",
            ShipmentStatus::DpkToDriver | ShipmentStatus::DriverCheckOut => "Driver",
            ShipmentStatus::DriverCheckIn => "Driver/Customer",
            ShipmentStatus::DelToMkt | ShipmentStatus::MktFromDel => "Marketing",
            ShipmentStatus::MktToFat => "FAT",
            ShipmentStatus::FatFromMkt => "-",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ShipmentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.tag() {
            Some(tag) => serializer.serialize_str(tag),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ShipmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(ShipmentStatus::Pending),
            Some(tag) => ShipmentStatus::from_tag(&tag).ok_or_else(|| {
                serde::de::Error::custom(format!("status tidak dikenal: {:?}", tag))
            }),
        }
    }
}
