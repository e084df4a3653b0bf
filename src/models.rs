//! Data models for the advising dashboard.
//!
//! This module contains the record shape received from the spreadsheet
//! endpoint, the statistics structures derived from it, and the report
//! envelope written by the CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::analysis::percentage;
use crate::dashboard::{StatusMessage, View, ViewModel};

/// One row of advising data as delivered by the spreadsheet endpoint.
///
/// Column headers are the wire keys; camelCase names are accepted as aliases.
/// Every cell is optional and scalar cells are coerced to strings, so a
/// numeric `NIM` arrives as its decimal text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Student identifier (NIM).
    #[serde(
        rename = "NIM",
        alias = "nim",
        default,
        deserialize_with = "lenient_cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub nim: Option<String>,

    /// Student name.
    #[serde(
        rename = "Nama",
        alias = "nama",
        default,
        deserialize_with = "lenient_cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub nama: Option<String>,

    /// Program of study (Program Studi).
    #[serde(
        rename = "Program Studi",
        alias = "programStudi",
        default,
        deserialize_with = "lenient_cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub program_studi: Option<String>,

    /// Assigned academic advisor (Dosen Pembimbing Akademik).
    #[serde(
        rename = "Dosen Pembimbing Akademik",
        alias = "dosenPembimbingAkademik",
        default,
        deserialize_with = "lenient_cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub dosen_pembimbing_akademik: Option<String>,

    /// Scholarship status (Beasiswa).
    #[serde(
        rename = "Beasiswa",
        alias = "beasiswa",
        default,
        deserialize_with = "lenient_cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub beasiswa: Option<String>,
}

/// Spreadsheet cells come back as whatever type the sheet inferred.
/// Arrays and objects are not meaningful cell values and are dropped.
fn lenient_cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Scholarship category a record is classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScholarshipCategory {
    #[serde(rename = "KIPK")]
    Kipk,
    #[serde(rename = "Non KIPK")]
    NonKipk,
    #[serde(rename = "Tidak Diketahui Beasiswa")]
    Unknown,
}

impl ScholarshipCategory {
    /// All categories in display order.
    pub const ALL: [ScholarshipCategory; 3] = [
        ScholarshipCategory::Kipk,
        ScholarshipCategory::NonKipk,
        ScholarshipCategory::Unknown,
    ];

    /// The label used in the source data and in reports.
    pub fn label(&self) -> &'static str {
        match self {
            ScholarshipCategory::Kipk => "KIPK",
            ScholarshipCategory::NonKipk => "Non KIPK",
            ScholarshipCategory::Unknown => "Tidak Diketahui Beasiswa",
        }
    }
}

impl fmt::Display for ScholarshipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Record counts partitioned by scholarship category.
///
/// `kipk + non_kipk + unknown == total` always holds, since the only way
/// to change a tally is [`ScholarshipTally::record`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarshipTally {
    pub total: usize,
    pub kipk: usize,
    pub non_kipk: usize,
    pub unknown: usize,
}

impl ScholarshipTally {
    /// Count one record under `category`.
    pub fn record(&mut self, category: ScholarshipCategory) {
        self.total += 1;
        match category {
            ScholarshipCategory::Kipk => self.kipk += 1,
            ScholarshipCategory::NonKipk => self.non_kipk += 1,
            ScholarshipCategory::Unknown => self.unknown += 1,
        }
    }

    /// Number of records in `category`.
    pub fn count(&self, category: ScholarshipCategory) -> usize {
        match category {
            ScholarshipCategory::Kipk => self.kipk,
            ScholarshipCategory::NonKipk => self.non_kipk,
            ScholarshipCategory::Unknown => self.unknown,
        }
    }

    /// Share of `category` in the total, as a percentage with one decimal.
    pub fn share(&self, category: ScholarshipCategory) -> f64 {
        percentage(self.count(category), self.total)
    }

    /// Count/percentage pairs for every category, in display order.
    pub fn shares(&self) -> Vec<CountShare> {
        ScholarshipCategory::ALL
            .iter()
            .map(|&category| CountShare {
                label: category.label().to_string(),
                count: self.count(category),
                percentage: self.share(category),
            })
            .collect()
    }
}

/// Statistics for one academic advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorStats {
    /// Advisor name, exactly as it appears in the data.
    pub name: String,
    #[serde(flatten)]
    pub tally: ScholarshipTally,
}

/// Statistics for one program of study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramStats {
    /// Normalized program name.
    pub name: String,
    #[serde(flatten)]
    pub tally: ScholarshipTally,
    /// Number of distinct non-empty advisor names among the program's records.
    pub unique_advisor_count: usize,
}

/// A labelled count together with its share of some total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountShare {
    pub label: String,
    pub count: usize,
    /// Percentage of the total, rounded to one decimal place.
    pub percentage: f64,
}

impl CountShare {
    pub fn new(label: impl Into<String>, count: usize, total: usize) -> Self {
        Self {
            label: label.into(),
            count,
            percentage: percentage(count, total),
        }
    }
}

/// Metadata about a rendered report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// URL or snapshot path the records came from.
    pub source: String,
    pub view: View,
    pub generated_at: DateTime<Utc>,
    /// When the rendered dataset was loaded; `None` if nothing ever loaded.
    pub loaded_at: Option<DateTime<Utc>>,
    pub total_records: usize,
}

/// One rendered view plus the status line that accompanies it.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<StatusMessage>,
    pub content: ViewModel,
}
