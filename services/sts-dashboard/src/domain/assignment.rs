// Form driver + TNKB untuk handover DPK -> Driver dan reassign outstanding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentForm {
    pub driver_id: Option<i64>,
    pub tnkb_id: Option<i64>,
}

impl AssignmentForm {
    pub fn new(driver_id: Option<i64>, tnkb_id: Option<i64>) -> Self {
        Self {
            driver_id: driver_id.filter(|id| *id > 0),
            tnkb_id: tnkb_id.filter(|id| *id > 0),
        }
    }

    pub fn set_driver(&mut self, driver_id: Option<i64>) {
        self.driver_id = driver_id.filter(|id| *id > 0);
    }

    pub fn set_tnkb(&mut self, tnkb_id: Option<i64>) {
        self.tnkb_id = tnkb_id.filter(|id| *id > 0);
    }

    /// Submit hanya boleh kalau driver dan TNKB dua-duanya terisi
    pub fn can_submit(&self) -> bool {
        self.complete().is_some()
    }

    pub fn complete(&self) -> Option<(i64, i64)> {
        Some((self.driver_id?, self.tnkb_id?))
    }
}
