//! The dashboard session.
//!
//! [`Dashboard`] owns the record store, the statistics derived from it and
//! the view state. Loads go through [`Dashboard::apply_fetch`]; every other
//! operation changes the view state and [`Dashboard::render`] builds the
//! view model for whatever is active.

use tracing::{debug, info, warn};

use crate::analysis::{
    count_by_program, distinct_program_values, distinct_scholarship_values,
    filter_advisor_students, filter_records, paginate, records_in_program, search_names,
    selection, Statistics,
};
use crate::config::{Config, ViewConfig};
use crate::dashboard::state::{StatusMessage, View, ViewState};
use crate::dashboard::views::{
    tally_cards, AdvisorDetail, AdvisorRoster, Analytics, DashboardSummary, ProgramBreakdown,
    ProgramReport, StudentRoster, ViewModel,
};
use crate::models::{AdvisorStats, CountShare, ScholarshipCategory, StudentRecord};
use crate::source::{FetchOutcome, LoadError};
use crate::store::RecordStore;

/// A single-user dashboard session.
pub struct Dashboard {
    store: RecordStore,
    stats: Statistics,
    state: ViewState,
    message: Option<StatusMessage>,
    page_sizes: ViewConfig,
    highlighted_programs: Vec<String>,
}

impl Dashboard {
    pub fn new(config: &Config) -> Self {
        Self {
            store: RecordStore::new(),
            stats: Statistics::default(),
            state: ViewState::default(),
            message: None,
            page_sizes: config.view,
            highlighted_programs: config.dashboard.highlighted_programs.clone(),
        }
    }

    /// Apply the result of one load.
    ///
    /// A record list replaces the dataset. An empty answer or any error leaves
    /// the previous dataset in place and sets a status message instead.
    pub fn apply_fetch(&mut self, result: Result<FetchOutcome, LoadError>) {
        match result {
            Ok(FetchOutcome::Records(records)) => {
                self.load_records(records);
                self.message = None;
            }
            Ok(FetchOutcome::Empty) => {
                warn!("No data received from the source");
                self.message = Some(StatusMessage::info("Tidak ada data yang ditemukan."));
            }
            Err(e) => {
                warn!("Load failed, keeping {} existing records: {}", self.store.len(), e);
                let text = if e.is_source() {
                    format!("Sumber data mengembalikan error: {}", e)
                } else {
                    format!("Gagal memuat data: {}", e)
                };
                self.message = Some(StatusMessage::error(text));
            }
        }
    }

    /// Replace the dataset and recompute statistics.
    pub fn load_records(&mut self, records: Vec<StudentRecord>) {
        self.store.load(records);
        self.stats = Statistics::compute(&self.store.all());
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    /// Switch to another view.
    pub fn show(&mut self, view: View) {
        debug!("Showing view {}", view);
        self.state.view = view;
        self.state.current_page = 1;
    }

    pub fn set_query(&mut self, query: Option<&str>) {
        self.state.query = query.filter(|q| !q.is_empty()).map(String::from);
        self.state.current_page = 1;
    }

    pub fn set_program_filter(&mut self, program: Option<&str>) {
        self.state.program = selection(program);
        self.state.current_page = 1;
    }

    pub fn set_scholarship_filter(&mut self, scholarship: Option<&str>) {
        self.state.scholarship = selection(scholarship);
        self.state.current_page = 1;
    }

    pub fn set_advisor_query(&mut self, query: Option<&str>) {
        self.state.advisor_query = query.filter(|q| !q.is_empty()).map(String::from);
        self.state.current_page = 1;
    }

    /// Drill down into one advisor's students.
    pub fn select_advisor(&mut self, advisor: Option<&str>) {
        self.state.advisor = advisor.filter(|a| !a.is_empty()).map(String::from);
        self.show(View::AdvisorDetail);
    }

    pub fn select_stats_program(&mut self, program: Option<&str>) {
        self.state.stats_program = selection(program);
        self.state.current_page = 1;
    }

    /// Request a page; it is clamped on the next render.
    pub fn go_to_page(&mut self, page: usize) {
        self.state.current_page = page;
    }

    pub fn next_page(&mut self) {
        self.state.current_page = self.state.current_page.saturating_add(1);
    }

    pub fn previous_page(&mut self) {
        self.state.current_page = self.state.current_page.saturating_sub(1).max(1);
    }

    /// Build the view model for the active view.
    ///
    /// Paginated views write the clamped page back into the view state.
    pub fn render(&mut self) -> ViewModel {
        let records = self.store.all();

        match self.state.view {
            View::Dashboard => ViewModel::Dashboard(self.dashboard_summary()),
            View::Students => {
                let filters = self.state.student_filters();
                let filtered = filter_records(&records, &filters);
                let page = paginate(
                    &filtered,
                    self.page_sizes.full_page_size,
                    self.state.current_page,
                )
                .map(StudentRecord::clone);
                self.state.current_page = page.current_page;

                info!(
                    "Student roster: {} of {} records match, page {}/{}",
                    page.total_items,
                    records.len(),
                    page.current_page,
                    page.total_pages
                );

                ViewModel::Students(StudentRoster {
                    filters,
                    program_options: distinct_program_values(&records),
                    scholarship_options: distinct_scholarship_values(&records),
                    page,
                })
            }
            View::Advisors => {
                let names = self.stats.advisor_names();
                let matching = search_names(&names, self.state.advisor_query.as_deref());
                let advisors: Vec<AdvisorStats> = matching
                    .into_iter()
                    .filter_map(|name| self.stats.advisor(name).cloned())
                    .collect();
                let page = paginate(
                    &advisors,
                    self.page_sizes.summary_page_size,
                    self.state.current_page,
                );
                self.state.current_page = page.current_page;

                ViewModel::Advisors(AdvisorRoster {
                    query: self.state.advisor_query.clone(),
                    page,
                })
            }
            View::AdvisorDetail => {
                let advisor = self.state.advisor.clone();
                let filters = self.state.advisor_filters();
                let supervised = filter_advisor_students(&records, advisor.as_deref(), &filters);
                let page = paginate(
                    &supervised,
                    self.page_sizes.full_page_size,
                    self.state.current_page,
                )
                .map(StudentRecord::clone);
                self.state.current_page = page.current_page;

                let tally = advisor
                    .as_deref()
                    .and_then(|name| self.stats.advisor(name))
                    .map(|stats| stats.tally)
                    .unwrap_or_default();
                if advisor.is_some() && tally.total == 0 {
                    warn!("Advisor {:?} has no students in the current data", advisor);
                }

                ViewModel::AdvisorDetail(AdvisorDetail {
                    advisor,
                    cards: tally_cards("Total Dibimbing", &tally),
                    filters,
                    scholarship_options: distinct_scholarship_values(&records),
                    page,
                })
            }
            View::Programs => ViewModel::Programs(self.program_report(&records)),
            View::Analytics => ViewModel::Analytics(self.analytics(&records)),
        }
    }

    fn dashboard_summary(&self) -> DashboardSummary {
        let total = self.stats.total_records();

        let program_cards = self
            .highlighted_programs
            .iter()
            .map(|name| {
                let count = self.stats.program(name).map_or(0, |p| p.tally.total);
                CountShare::new(name.as_str(), count, total)
            })
            .collect();

        DashboardSummary {
            total_students: total,
            program_cards,
            kipk_card: CountShare::new(
                ScholarshipCategory::Kipk.label(),
                self.stats.scholarships().kipk,
                total,
            ),
            programs: self.stats.ranked_programs().into_iter().cloned().collect(),
        }
    }

    fn program_report(&self, records: &[StudentRecord]) -> ProgramReport {
        let program_options = self
            .stats
            .program_names()
            .into_iter()
            .map(String::from)
            .collect();

        let Some(selected) = self.state.stats_program.clone() else {
            return ProgramReport {
                programs: self.stats.ranked_programs().into_iter().cloned().collect(),
                program_options,
                selected: None,
            };
        };

        let subset = Statistics::compute(&records_in_program(records, &selected));
        let (tally, unique_advisor_count) = subset
            .program(&selected)
            .map(|p| (p.tally, p.unique_advisor_count))
            .unwrap_or_default();

        ProgramReport {
            programs: subset.ranked_programs().into_iter().cloned().collect(),
            program_options,
            selected: Some(ProgramBreakdown {
                cards: tally_cards("Jumlah Mahasiswa", &tally),
                program: selected,
                unique_advisor_count,
            }),
        }
    }

    fn analytics(&self, records: &[StudentRecord]) -> Analytics {
        let total = records.len();

        Analytics {
            total_students: total,
            program_distribution: count_by_program(records)
                .into_iter()
                .map(|(program, count)| CountShare::new(program, count, total))
                .collect(),
            scholarship_distribution: self
                .stats
                .scholarship_counts()
                .into_iter()
                .map(|(category, count)| CountShare::new(category.label(), count, total))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(nim: usize, program: &str, advisor: Option<&str>, beasiswa: Option<&str>) -> StudentRecord {
        StudentRecord {
            nim: Some(format!("21{:05}", nim)),
            nama: Some(format!("Mahasiswa {}", nim)),
            program_studi: Some(program.to_string()),
            dosen_pembimbing_akademik: advisor.map(String::from),
            beasiswa: beasiswa.map(String::from),
        }
    }

    fn dataset(n: usize) -> Vec<StudentRecord> {
        (1..=n)
            .map(|i| {
                let program = if i % 2 == 0 { "Teknik Informatika" } else { "Sistem Informasi" };
                let advisor = if i % 3 == 0 { "Ir. Sari" } else { "Dr. Budi" };
                let beasiswa = if i % 4 == 0 { Some("KIPK") } else { Some("Non KIPK") };
                student(i, program, Some(advisor), beasiswa)
            })
            .collect()
    }

    fn loaded(n: usize) -> Dashboard {
        let mut dashboard = Dashboard::new(&Config::default());
        dashboard.apply_fetch(Ok(FetchOutcome::Records(dataset(n))));
        dashboard
    }

    #[test]
    fn test_fixture_snapshot() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("advising_snapshot.json");
        let outcome = tokio_test::block_on(crate::source::read_snapshot(&path));

        let mut dashboard = Dashboard::new(&Config::default());
        dashboard.apply_fetch(outcome);
        assert_eq!(dashboard.store().len(), 6);

        let stats = dashboard.statistics();
        assert_eq!(stats.advisor("Dr. Budi Santoso").unwrap().tally.total, 3);
        assert_eq!(stats.program("Tidak Diketahui").unwrap().tally.total, 1);
        assert_eq!(stats.scholarships().kipk, 3);
        assert_eq!(stats.scholarships().unknown, 1);

        dashboard.show(View::Students);
        dashboard.set_query(Some("2102"));
        match dashboard.render() {
            ViewModel::Students(roster) => assert_eq!(roster.page.total_items, 2),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_successful_load_replaces_store() {
        let mut dashboard = loaded(5);
        assert_eq!(dashboard.store().len(), 5);
        assert!(dashboard.message().is_none());

        dashboard.apply_fetch(Ok(FetchOutcome::Records(dataset(2))));
        assert_eq!(dashboard.store().len(), 2);
        assert_eq!(dashboard.statistics().total_records(), 2);
    }

    #[test]
    fn test_failed_load_preserves_data() {
        let mut dashboard = loaded(5);

        dashboard.apply_fetch(Err(LoadError::Source("quota exceeded".to_string())));

        assert_eq!(dashboard.store().len(), 5);
        assert_eq!(dashboard.statistics().total_records(), 5);
        let message = dashboard.message().unwrap();
        assert!(message.is_error());
        assert!(message.text.contains("quota exceeded"));

        dashboard.dismiss_message();
        assert!(dashboard.message().is_none());
    }

    #[test]
    fn test_empty_outcome_is_info() {
        let mut dashboard = loaded(3);

        dashboard.apply_fetch(Ok(FetchOutcome::Empty));

        assert_eq!(dashboard.store().len(), 3);
        assert!(!dashboard.message().unwrap().is_error());
    }

    #[test]
    fn test_empty_dataset_renders_without_pages() {
        let mut dashboard = Dashboard::new(&Config::default());
        dashboard.apply_fetch(Ok(FetchOutcome::Records(vec![])));
        dashboard.show(View::Students);

        match dashboard.render() {
            ViewModel::Students(roster) => {
                assert!(roster.page.is_empty());
                assert_eq!(roster.page.total_pages, 0);
                assert_eq!(roster.page.current_page, 0);
            }
            other => panic!("unexpected view {:?}", other),
        }
        assert_eq!(dashboard.state().current_page, 0);
    }

    #[test]
    fn test_page_clamp_is_persisted() {
        let mut dashboard = loaded(23);
        dashboard.show(View::Students);
        dashboard.go_to_page(3);

        match dashboard.render() {
            ViewModel::Students(roster) => {
                assert_eq!(roster.page.total_pages, 2);
                assert_eq!(roster.page.current_page, 2);
                assert_eq!(roster.page.items.len(), 8);
                assert_eq!(roster.page.first_row, 16);
                assert_eq!(roster.page.items[0].nim.as_deref(), Some("2100016"));
            }
            other => panic!("unexpected view {:?}", other),
        }
        assert_eq!(dashboard.state().current_page, 2);

        dashboard.next_page();
        dashboard.render();
        assert_eq!(dashboard.state().current_page, 2);

        dashboard.previous_page();
        dashboard.previous_page();
        dashboard.previous_page();
        assert_eq!(dashboard.state().current_page, 1);
    }

    #[test]
    fn test_next_page_saturates() {
        let mut dashboard = loaded(20);
        dashboard.show(View::Students);
        dashboard.go_to_page(usize::MAX);

        dashboard.next_page();
        assert_eq!(dashboard.state().current_page, usize::MAX);

        match dashboard.render() {
            ViewModel::Students(roster) => assert_eq!(roster.page.current_page, 2),
            other => panic!("unexpected view {:?}", other),
        }
        assert_eq!(dashboard.state().current_page, 2);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut dashboard = loaded(40);
        dashboard.show(View::Students);
        dashboard.go_to_page(3);
        dashboard.render();
        assert_eq!(dashboard.state().current_page, 3);

        dashboard.set_program_filter(Some("Teknik Informatika"));
        assert_eq!(dashboard.state().current_page, 1);

        match dashboard.render() {
            ViewModel::Students(roster) => {
                assert_eq!(roster.page.total_items, 20);
                assert_eq!(roster.filters.program.as_deref(), Some("Teknik Informatika"));
                assert_eq!(
                    roster.program_options,
                    vec!["Sistem Informasi", "Teknik Informatika"]
                );
                assert_eq!(roster.scholarship_options, vec!["KIPK", "Non KIPK"]);
            }
            other => panic!("unexpected view {:?}", other),
        }

        dashboard.set_program_filter(Some("all"));
        assert_eq!(dashboard.state().program, None);
    }

    #[test]
    fn test_advisor_detail_without_selection_is_empty() {
        let mut dashboard = loaded(10);
        dashboard.show(View::AdvisorDetail);

        match dashboard.render() {
            ViewModel::AdvisorDetail(detail) => {
                assert!(detail.advisor.is_none());
                assert!(detail.page.is_empty());
                assert!(detail.cards.iter().all(|c| c.count == 0));
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_select_advisor_drills_down() {
        let mut dashboard = loaded(12);
        dashboard.show(View::Advisors);
        dashboard.select_advisor(Some("Ir. Sari"));
        assert_eq!(dashboard.state().view, View::AdvisorDetail);

        match dashboard.render() {
            ViewModel::AdvisorDetail(detail) => {
                // students 3, 6, 9, 12
                assert_eq!(detail.page.total_items, 4);
                assert_eq!(detail.cards[0].label, "Total Dibimbing");
                assert_eq!(detail.cards[0].count, 4);
                // 12 is the only multiple of 4
                assert_eq!(detail.cards[1].count, 1);
                assert_eq!(detail.cards[1].percentage, 25.0);
            }
            other => panic!("unexpected view {:?}", other),
        }

        dashboard.set_scholarship_filter(Some("KIPK"));
        match dashboard.render() {
            ViewModel::AdvisorDetail(detail) => {
                assert_eq!(detail.page.total_items, 1);
                assert_eq!(detail.page.items[0].nim.as_deref(), Some("2100012"));
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_advisor_roster_search() {
        let mut dashboard = loaded(6);
        dashboard.show(View::Advisors);

        match dashboard.render() {
            ViewModel::Advisors(roster) => {
                let names: Vec<&str> = roster.page.items.iter().map(|a| a.name.as_str()).collect();
                assert_eq!(names, vec!["Dr. Budi", "Ir. Sari"]);
                assert_eq!(roster.page.total_pages, 1);
            }
            other => panic!("unexpected view {:?}", other),
        }

        dashboard.set_advisor_query(Some("SARI"));
        match dashboard.render() {
            ViewModel::Advisors(roster) => {
                assert_eq!(roster.page.total_items, 1);
                assert_eq!(roster.page.items[0].tally.total, 2);
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_dashboard_summary_cards() {
        let mut dashboard = loaded(8);

        match dashboard.render() {
            ViewModel::Dashboard(summary) => {
                assert_eq!(summary.total_students, 8);
                let ti = summary
                    .program_cards
                    .iter()
                    .find(|c| c.label == "Teknik Informatika")
                    .unwrap();
                assert_eq!(ti.count, 4);
                assert_eq!(ti.percentage, 50.0);
                let ka = summary
                    .program_cards
                    .iter()
                    .find(|c| c.label == "Komputerisasi Akuntansi")
                    .unwrap();
                assert_eq!(ka.count, 0);
                assert_eq!(summary.kipk_card.count, 2);
                assert_eq!(summary.kipk_card.percentage, 25.0);
                assert_eq!(summary.programs.len(), 2);
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_program_report_with_selection() {
        let mut dashboard = loaded(9);
        dashboard.show(View::Programs);

        match dashboard.render() {
            ViewModel::Programs(report) => {
                assert!(report.selected.is_none());
                assert_eq!(report.programs[0].name, "Sistem Informasi");
                assert_eq!(report.programs[0].tally.total, 5);
            }
            other => panic!("unexpected view {:?}", other),
        }

        dashboard.select_stats_program(Some("Teknik Informatika"));
        match dashboard.render() {
            ViewModel::Programs(report) => {
                assert_eq!(report.programs.len(), 1);
                let selected = report.selected.unwrap();
                assert_eq!(selected.program, "Teknik Informatika");
                assert_eq!(selected.cards[0].count, 4);
                // students 4 and 8 hold KIPK
                assert_eq!(selected.cards[1].count, 2);
                assert_eq!(selected.unique_advisor_count, 2);
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn test_analytics_distributions() {
        let mut dashboard = loaded(4);
        dashboard.show(View::Analytics);

        match dashboard.render() {
            ViewModel::Analytics(analytics) => {
                assert_eq!(analytics.total_students, 4);
                assert_eq!(analytics.program_distribution[0].label, "Sistem Informasi");
                assert_eq!(analytics.program_distribution[0].percentage, 50.0);
                assert_eq!(analytics.scholarship_distribution[0].count, 1);
                assert_eq!(analytics.scholarship_distribution[1].count, 3);
                assert_eq!(analytics.scholarship_distribution[2].count, 0);
            }
            other => panic!("unexpected view {:?}", other),
        }
    }
}
