//! Which view is active and how it is filtered.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::FilterSet;

/// The dashboard's pages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    /// Summary cards and the program table
    #[default]
    Dashboard,
    /// Searchable student roster
    Students,
    /// Academic advisor roster
    Advisors,
    /// Students supervised by one advisor
    AdvisorDetail,
    /// Per-program statistics
    Programs,
    /// Distribution charts
    Analytics,
}

impl View {
    /// Heading used in reports.
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Students => "Data Mahasiswa",
            View::Advisors => "Dosen Pembimbing Akademik",
            View::AdvisorDetail => "Mahasiswa Bimbingan",
            View::Programs => "Statistik Program Studi",
            View::Analytics => "Analytics",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Dashboard => "dashboard",
            View::Students => "students",
            View::Advisors => "advisors",
            View::AdvisorDetail => "advisor-detail",
            View::Programs => "programs",
            View::Analytics => "analytics",
        };
        write!(f, "{}", name)
    }
}

/// Everything the user has selected. Owned by [`super::Dashboard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub view: View,
    /// Name/NIM search on the student and advisor-detail tables.
    pub query: Option<String>,
    /// Program filter on the student table.
    pub program: Option<String>,
    /// Scholarship filter on the student and advisor-detail tables.
    pub scholarship: Option<String>,
    /// Advisor shown on the advisor-detail view.
    pub advisor: Option<String>,
    /// Name search on the advisor roster.
    pub advisor_query: Option<String>,
    /// Program broken down on the programs view.
    pub stats_program: Option<String>,
    /// 1-based page; 0 when the active table has no pages.
    pub current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view: View::Dashboard,
            query: None,
            program: None,
            scholarship: None,
            advisor: None,
            advisor_query: None,
            stats_program: None,
            current_page: 1,
        }
    }
}

impl ViewState {
    /// Filters for the student roster.
    pub fn student_filters(&self) -> FilterSet {
        FilterSet {
            query: self.query.clone(),
            program: self.program.clone(),
            scholarship: self.scholarship.clone(),
            advisor: None,
        }
    }

    /// Filters for the advisor-detail table, excluding the advisor itself.
    pub fn advisor_filters(&self) -> FilterSet {
        FilterSet {
            query: self.query.clone(),
            program: None,
            scholarship: self.scholarship.clone(),
            advisor: None,
        }
    }
}

/// Severity of a dismissible status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Error,
}

/// A message shown above the active view until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}
