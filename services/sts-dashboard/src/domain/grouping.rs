// Tampilan grouped: murni transformasi display dari list flat
use super::shipment::ShipmentDocument;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentGroup<K> {
    pub key: Option<K>,
    pub documents: Vec<ShipmentDocument>,
}

impl<K> DocumentGroup<K> {
    pub fn ids(&self) -> Vec<i64> {
        self.documents.iter().map(|doc| doc.id).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentGroup<String> {
    pub fn label(&self) -> &str {
        self.key.as_deref().unwrap_or("-")
    }
}

// Group berdasarkan key, urutan group mengikuti kemunculan pertama di list
fn group_by<K, F>(documents: &[ShipmentDocument], key_of: F) -> Vec<DocumentGroup<K>>
where
    K: PartialEq + Clone,
    F: Fn(&ShipmentDocument) -> Option<K>,
{
    let mut groups: Vec<DocumentGroup<K>> = Vec::new();

    for doc in documents {
        let key = key_of(doc);
        match groups.iter_mut().find(|group| group.key == key) {
            Some(group) => group.documents.push(doc.clone()),
            None => groups.push(DocumentGroup {
                key,
                documents: vec![doc.clone()],
            }),
        }
    }

    groups
}

/// Group per SPP untuk handover Marketing -> FAT. Dokumen tanpa SPP masuk satu group.
pub fn group_by_spp(documents: &[ShipmentDocument]) -> Vec<DocumentGroup<String>> {
    group_by(documents, |doc| doc.spp_no.clone())
}

/// Group per customer untuk check-in driver
pub fn group_by_customer(documents: &[ShipmentDocument]) -> Vec<DocumentGroup<i64>> {
    group_by(documents, |doc| doc.customer_id)
}

pub fn find_group<'a, K: PartialEq>(
    groups: &'a [DocumentGroup<K>],
    key: Option<&K>,
) -> Option<&'a DocumentGroup<K>> {
    groups.iter().find(|group| group.key.as_ref() == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shipment::test_support::{doc, doc_with_spp};
    use crate::domain::status::ShipmentStatus;

    #[test]
    fn test_spp_groups_cover_flat_list_exactly() {
        let status = ShipmentStatus::MktFromDel;
        let flat = vec![
            doc_with_spp(1, status, Some("SPP-01")),
            doc_with_spp(2, status, None),
            doc_with_spp(3, status, Some("SPP-02")),
            doc_with_spp(4, status, Some("SPP-01")),
            doc_with_spp(5, status, None),
        ];

        let groups = group_by_spp(&flat);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].label(), "SPP-01");
        assert_eq!(groups[0].ids(), vec![1, 4]);
        assert_eq!(groups[1].key, None);
        assert_eq!(groups[1].ids(), vec![2, 5]);

        let mut combined: Vec<i64> = groups.iter().flat_map(|g| g.ids()).collect();
        combined.sort_unstable();
        let mut expected: Vec<i64> = flat.iter().map(|d| d.id).collect();
        expected.sort_unstable();
        assert_eq!(combined, expected);
    }

    #[test]
    fn test_group_by_customer() {
        let flat: Vec<_> = (1..=6).map(|id| doc(id, ShipmentStatus::DpkToDriver)).collect();
        let groups = group_by_customer(&flat);
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.len() == 2));

        let group = find_group(&groups, Some(&101)).unwrap();
        assert_eq!(group.ids(), vec![1, 4]);
        assert!(find_group(&groups, Some(&999)).is_none());
    }

    #[test]
    fn test_empty_list_has_no_groups() {
        assert!(group_by_spp(&[]).is_empty());
    }
}
