//! Fallback labels and listing order shared by every grouping.

use std::cmp::Ordering;

use crate::models::{ScholarshipCategory, StudentRecord};

/// Program label for records without a program of study.
pub const UNKNOWN_PROGRAM: &str = "Tidak Diketahui";

/// Treat empty cells the same as missing ones.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Program a record is counted under.
pub fn program_label(record: &StudentRecord) -> &str {
    present(&record.program_studi).unwrap_or(UNKNOWN_PROGRAM)
}

/// Scholarship category a record is counted under.
pub fn scholarship_category(record: &StudentRecord) -> ScholarshipCategory {
    match record.beasiswa.as_deref() {
        Some("KIPK") => ScholarshipCategory::Kipk,
        Some("Non KIPK") => ScholarshipCategory::NonKipk,
        _ => ScholarshipCategory::Unknown,
    }
}

/// Advisor a record belongs to; `None` keeps it out of advisor statistics.
pub fn advisor_name(record: &StudentRecord) -> Option<&str> {
    present(&record.dosen_pembimbing_akademik)
}

/// Order used whenever names are listed: case-folded first, then
/// case-sensitive so that distinct spellings keep a stable position.
pub fn listing_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort names in listing order.
pub fn sort_for_listing<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| listing_order(a.as_ref(), b.as_ref()));
}
