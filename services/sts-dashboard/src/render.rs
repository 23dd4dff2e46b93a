// Output tabel plain-text ke stdout. Fungsi format_* return String supaya bisa dites.
use std::fmt::Write;

use crate::domain::grouping::DocumentGroup;
use crate::domain::progress::Milestone;
use crate::domain::selection::Selection;
use crate::domain::{Customer, Driver, ShipmentDocument, Tnkb};
use crate::handlers::reports::ProgressRow;

fn dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn date_cell(doc: &ShipmentDocument) -> String {
    doc.movement_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn document_line(out: &mut String, doc: &ShipmentDocument, marker: &str) {
    let _ = writeln!(
        out,
        "{} {:<8} {:<18} {:<10} {:<28} {:<18} {:<12} {:<16} {}",
        marker,
        doc.id,
        doc.document_no,
        date_cell(doc),
        doc.customer_label(),
        dash(doc.driver_name.as_deref()),
        dash(doc.tnkb_no.as_deref()),
        doc.status.holder(),
        doc.status,
    );
}

fn document_header(out: &mut String) {
    let _ = writeln!(
        out,
        "  {:<8} {:<18} {:<10} {:<28} {:<18} {:<12} {:<16} {}",
        "ID", "NO. SJ", "TANGGAL", "CUSTOMER", "DRIVER", "TNKB", "POSISI", "STATUS"
    );
}

pub fn format_documents(docs: &[ShipmentDocument], selection: Option<&Selection>) -> String {
    if docs.is_empty() {
        return "Tidak ada data\n".to_string();
    }

    let mut out = String::new();
    document_header(&mut out);
    for doc in docs {
        let marker = match selection {
            Some(sel) if sel.is_selected(doc.id) => "*",
            _ => " ",
        };
        document_line(&mut out, doc, marker);
    }
    let _ = writeln!(out, "Total: {} SJ", docs.len());
    if let Some(sel) = selection.filter(|sel| !sel.is_empty()) {
        let _ = writeln!(out, "Dipilih: {} SJ", sel.len());
    }
    out
}

pub fn format_spp_groups(groups: &[DocumentGroup<String>]) -> String {
    if groups.is_empty() {
        return "Tidak ada data\n".to_string();
    }

    let mut out = String::new();
    for group in groups {
        let label = group.key.as_deref().unwrap_or("(tanpa SPP)");
        let _ = writeln!(out, "SPP {} ({} SJ)", label, group.len());
        for doc in &group.documents {
            document_line(&mut out, doc, " ");
        }
    }
    out
}

pub fn format_customer_groups(groups: &[DocumentGroup<i64>]) -> String {
    if groups.is_empty() {
        return "Tidak ada SJ in-transit\n".to_string();
    }

    let mut out = String::new();
    for group in groups {
        let name = group
            .documents
            .first()
            .map(|doc| doc.customer_label())
            .unwrap_or("-");
        let id = group
            .key
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "Customer {} [{}] ({} SJ)", name, id, group.len());
        for doc in &group.documents {
            document_line(&mut out, doc, " ");
        }
    }
    out
}

pub fn format_history(docs: &[ShipmentDocument]) -> String {
    if docs.is_empty() {
        return "Tidak ada data\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<18} {:<10} {:<28} {:<16} {}",
        "NO. SJ", "TANGGAL", "CUSTOMER", "BUNDLE", "FILE"
    );
    for doc in docs {
        let _ = writeln!(
            out,
            "{:<18} {:<10} {:<28} {:<16} {}",
            doc.document_no,
            date_cell(doc),
            doc.customer_label(),
            dash(doc.bundle_no.as_deref()),
            dash(doc.attachment_path.as_deref()),
        );
    }
    out
}

pub fn format_progress(rows: &[ProgressRow]) -> String {
    if rows.is_empty() {
        return "Tidak ada data\n".to_string();
    }

    let mut out = String::new();
    for row in rows {
        let date = row
            .record
            .movement_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{} | {} | {} | posisi: {}",
            row.record.document_no,
            date,
            dash(row.record.customer.as_deref()),
            row.current_label(),
        );
        for (milestone, label) in Milestone::ALL.iter().zip(row.labels()) {
            let _ = writeln!(out, "    {:<20} {}", milestone.label(), label);
        }
    }
    out
}

pub fn format_drivers(drivers: &[Driver]) -> String {
    let mut out = String::new();
    for driver in drivers {
        let _ = writeln!(out, "{:<8} {}", driver.id, driver.name);
    }
    out
}

pub fn format_tnkbs(tnkbs: &[Tnkb]) -> String {
    let mut out = String::new();
    for tnkb in tnkbs {
        let _ = writeln!(out, "{:<8} {}", tnkb.id, tnkb.plate_no);
    }
    out
}

pub fn format_customers(customers: &[Customer]) -> String {
    let mut out = String::new();
    for customer in customers {
        let _ = writeln!(out, "{:<8} {}", customer.id, customer.name);
    }
    out
}
