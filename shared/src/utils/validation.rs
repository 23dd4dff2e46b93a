use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashSet;

/// Format tanggal yang diterima backend untuk `dateFrom`/`dateTo`
pub const DATE_PARAM_FORMAT: &str = "%Y-%m-%d";

pub const MAX_NOTES_LEN: usize = 500;

// Validate format tanggal query param (yyyy-MM-dd, zero padded, tanggal harus ada)
pub fn is_valid_date_param(value: &str) -> bool {
    parse_date_param(value).is_some()
}

// Parse tanggal query param, None kalau format salah atau tanggal tidak ada (misal 2024-02-30)
pub fn parse_date_param(value: &str) -> Option<NaiveDate> {
    let matches = Regex::new(r"^\d{4}-\d{2}-\d{2}$")
        .map(|re| re.is_match(value))
        .unwrap_or(false);

    if !matches {
        return None;
    }

    NaiveDate::parse_from_str(value, DATE_PARAM_FORMAT).ok()
}

// Validate id dokumen / driver / tnkb (harus positif)
pub fn is_valid_id(id: i64) -> bool {
    id > 0
}

// Cari id pertama yang muncul lebih dari sekali
pub fn find_duplicate_id(ids: &[i64]) -> Option<i64> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().find(|id| !seen.insert(*id))
}

// Validate panjang catatan handover
pub fn is_valid_notes(notes: &str) -> bool {
    notes.chars().count() <= MAX_NOTES_LEN
}

// Catatan kosong tidak perlu dikirim ke backend
pub fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_param_validation() {
        assert!(is_valid_date_param("2024-01-31"));
        assert!(is_valid_date_param("2024-02-29"));
        assert!(!is_valid_date_param("2023-02-29"));
        assert!(!is_valid_date_param("2024-1-5"));
        assert!(!is_valid_date_param("31-01-2024"));
        assert!(!is_valid_date_param("2024-01-31T00:00:00Z"));
        assert!(!is_valid_date_param(""));
    }

    #[test]
    fn test_parse_date_param() {
        assert_eq!(
            parse_date_param("2024-03-01"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_id_validation() {
        assert!(is_valid_id(1000123));
        assert!(!is_valid_id(0));
        assert!(!is_valid_id(-5));
    }

    #[test]
    fn test_find_duplicate_id() {
        assert_eq!(find_duplicate_id(&[1, 2, 3]), None);
        assert_eq!(find_duplicate_id(&[4, 5, 4, 5]), Some(4));
        assert_eq!(find_duplicate_id(&[]), None);
    }

    #[test]
    fn test_notes_validation() {
        assert!(is_valid_notes("Dokumen lengkap"));
        assert!(is_valid_notes(&"x".repeat(MAX_NOTES_LEN)));
        assert!(!is_valid_notes(&"x".repeat(MAX_NOTES_LEN + 1)));
    }

    #[test]
    fn test_normalize_notes() {
        assert_eq!(normalize_notes(Some("  ok ")), Some("ok".to_string()));
        assert_eq!(normalize_notes(Some("   ")), None);
        assert_eq!(normalize_notes(None), None);
    }
}
