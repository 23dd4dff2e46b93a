use std::collections::BTreeSet;

use super::shipment::ShipmentDocument;

/// Pilihan dokumen di satu halaman, disimpan per id dokumen (bukan posisi baris)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: BTreeSet<i64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn select(&mut self, id: i64) {
        self.ids.insert(id);
    }

    // Tambah semua anggota group tanpa melepas pilihan yang sudah ada
    pub fn select_group(&mut self, member_ids: &[i64]) {
        self.ids.extend(member_ids.iter().copied());
    }

    /// Toggle satu group: kalau semua anggota sudah terpilih maka dilepas,
    /// selain itu semua anggota dipilih
    pub fn toggle_group(&mut self, member_ids: &[i64]) {
        if member_ids.is_empty() {
            return;
        }

        let all_selected = member_ids.iter().all(|id| self.ids.contains(id));
        for id in member_ids {
            if all_selected {
                self.ids.remove(id);
            } else {
                self.ids.insert(*id);
            }
        }
    }

    pub fn select_all(&mut self, documents: &[ShipmentDocument]) {
        self.ids.extend(documents.iter().map(|doc| doc.id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Buang id yang sudah tidak ada di list terbaru
    pub fn prune(&mut self, documents: &[ShipmentDocument]) -> usize {
        let listed: BTreeSet<i64> = documents.iter().map(|doc| doc.id).collect();
        let before = self.ids.len();
        self.ids.retain(|id| listed.contains(id));
        before - self.ids.len()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
