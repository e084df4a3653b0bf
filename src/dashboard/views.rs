//! View models handed to the report generator.

use serde::Serialize;

use crate::analysis::{FilterSet, Page};
use crate::models::{AdvisorStats, CountShare, ProgramStats, ScholarshipTally, StudentRecord};

/// The rendered content of one view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum ViewModel {
    Dashboard(DashboardSummary),
    Students(StudentRoster),
    Advisors(AdvisorRoster),
    AdvisorDetail(AdvisorDetail),
    Programs(ProgramReport),
    Analytics(Analytics),
}

/// Summary cards and the ranked program table.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_students: usize,
    /// One card per highlighted program, share of all students.
    pub program_cards: Vec<CountShare>,
    pub kipk_card: CountShare,
    /// Programs ranked by student count.
    pub programs: Vec<ProgramStats>,
}

/// One page of the filtered student roster.
#[derive(Debug, Clone, Serialize)]
pub struct StudentRoster {
    pub filters: FilterSet,
    pub program_options: Vec<String>,
    pub scholarship_options: Vec<String>,
    pub page: Page<StudentRecord>,
}

/// Advisors matching the roster search, in listing order, one compact page at a time.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorRoster {
    pub query: Option<String>,
    pub page: Page<AdvisorStats>,
}

/// Students supervised by the selected advisor.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorDetail {
    /// `None` when no advisor is selected; the page is then empty.
    pub advisor: Option<String>,
    /// Total plus each scholarship category, as shares of the advisor's total.
    pub cards: Vec<CountShare>,
    pub filters: FilterSet,
    pub scholarship_options: Vec<String>,
    pub page: Page<StudentRecord>,
}

/// Per-program statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramReport {
    /// Ranked program table; narrowed to the selected program when there is one.
    pub programs: Vec<ProgramStats>,
    pub program_options: Vec<String>,
    pub selected: Option<ProgramBreakdown>,
}

/// Stat cards for one program.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramBreakdown {
    pub program: String,
    pub unique_advisor_count: usize,
    pub cards: Vec<CountShare>,
}

/// Chart distributions over the whole dataset.
#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub total_students: usize,
    pub program_distribution: Vec<CountShare>,
    pub scholarship_distribution: Vec<CountShare>,
}

/// Stat cards for a tally: the total first, then each scholarship category.
pub fn tally_cards(total_label: &str, tally: &ScholarshipTally) -> Vec<CountShare> {
    let mut cards = vec![CountShare::new(total_label, tally.total, tally.total)];
    cards.extend(tally.shares());
    cards
}
