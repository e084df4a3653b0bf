//! Record filtering for the roster views.

use crate::analysis::normalize;
use crate::models::StudentRecord;
use serde::{Deserialize, Serialize};

/// Turn a raw filter value into a constraint. Empty input and the literal
/// `all` mean "no constraint".
pub fn selection(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(String::from)
}

/// The active predicates for a roster view. `None` leaves a field unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Case-insensitive substring of name or NIM.
    pub query: Option<String>,
    /// Exact program of study.
    pub program: Option<String>,
    /// Exact scholarship value.
    pub scholarship: Option<String>,
    /// Exact advisor name.
    pub advisor: Option<String>,
}

impl FilterSet {
    /// True when no predicate is active.
    pub fn is_unconstrained(&self) -> bool {
        self.needle().is_none()
            && self.program.is_none()
            && self.scholarship.is_none()
            && self.advisor.is_none()
    }

    fn needle(&self) -> Option<String> {
        self.query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

/// Records matching every active predicate, in their original order.
pub fn filter_records<'a>(records: &'a [StudentRecord], filters: &FilterSet) -> Vec<&'a StudentRecord> {
    let needle = filters.needle();

    records
        .iter()
        .filter(|record| {
            needle
                .as_deref()
                .map_or(true, |needle| matches_text(record, needle))
                && exact(&filters.scholarship, record.beasiswa.as_deref())
                && exact(&filters.program, record.program_studi.as_deref())
                && exact(
                    &filters.advisor,
                    record.dosen_pembimbing_akademik.as_deref(),
                )
        })
        .collect()
}

/// Students supervised by `advisor`, narrowed by the other filters.
///
/// Without a selected advisor the result is empty rather than every record.
pub fn filter_advisor_students<'a>(
    records: &'a [StudentRecord],
    advisor: Option<&str>,
    filters: &FilterSet,
) -> Vec<&'a StudentRecord> {
    let Some(advisor) = advisor.filter(|a| !a.is_empty()) else {
        return Vec::new();
    };

    let scoped = FilterSet {
        advisor: Some(advisor.to_string()),
        ..filters.clone()
    };
    filter_records(records, &scoped)
}

/// Names containing `query`, ignoring case. Input order is kept.
pub fn search_names<'a>(names: &[&'a str], query: Option<&str>) -> Vec<&'a str> {
    let Some(needle) = query.filter(|q| !q.is_empty()).map(str::to_lowercase) else {
        return names.to_vec();
    };

    names
        .iter()
        .copied()
        .filter(|name| name.to_lowercase().contains(&needle))
        .collect()
}

fn matches_text(record: &StudentRecord, needle: &str) -> bool {
    let contains = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|value| value.to_lowercase().contains(needle))
    };
    contains(&record.nama) || contains(&record.nim)
}

fn exact(wanted: &Option<String>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual == Some(wanted.as_str()),
    }
}

/// Records counted under one normalized program, for per-program statistics.
pub fn records_in_program(records: &[StudentRecord], program: &str) -> Vec<StudentRecord> {
    records
        .iter()
        .filter(|r| normalize::program_label(r) == program)
        .cloned()
        .collect()
}
