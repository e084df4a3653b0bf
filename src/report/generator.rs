//! Report generation.
//!
//! Renders a [`Report`] as Markdown with pipe tables, or as pretty JSON.

use crate::analysis::{FilterSet, Page};
use crate::dashboard::{
    views::{AdvisorDetail, AdvisorRoster, Analytics, DashboardSummary, ProgramReport, StudentRoster},
    MessageKind, StatusMessage, ViewModel,
};
use crate::models::{CountShare, ProgramStats, Report, ReportMetadata, StudentRecord};
use anyhow::Result;

/// Shown in place of a table that has no rows.
pub const NO_DATA: &str = "Tidak ada data ditemukan.";

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.metadata.view.title()));
    output.push_str(&generate_metadata_section(&report.metadata));

    if let Some(ref message) = report.message {
        output.push_str(&generate_message_block(message));
    }

    let body = match &report.content {
        ViewModel::Dashboard(summary) => generate_dashboard_section(summary),
        ViewModel::Students(roster) => generate_students_section(roster),
        ViewModel::Advisors(roster) => generate_advisors_section(roster),
        ViewModel::AdvisorDetail(detail) => generate_advisor_detail_section(detail),
        ViewModel::Programs(programs) => generate_programs_section(programs),
        ViewModel::Analytics(analytics) => generate_analytics_section(analytics),
    };
    output.push_str(&body);

    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!("- **Sumber Data:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Tanggal:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(loaded_at) = metadata.loaded_at {
        section.push_str(&format!(
            "- **Data Dimuat:** {}\n",
            loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    section.push_str(&format!("- **Jumlah Data:** {}\n", metadata.total_records));
    section.push('\n');

    section
}

fn generate_message_block(message: &StatusMessage) -> String {
    let badge = match message.kind {
        MessageKind::Error => "⚠️ **Error:**",
        MessageKind::Info => "ℹ️",
    };
    format!("> {} {}\n\n", badge, message.text)
}

fn generate_dashboard_section(summary: &DashboardSummary) -> String {
    let mut section = String::new();

    section.push_str("## Ringkasan\n\n");
    section.push_str("| Kartu | Jumlah | Persentase |\n");
    section.push_str("|:---|:---:|:---:|\n");
    section.push_str(&share_row(&CountShare::new(
        "Total Mahasiswa",
        summary.total_students,
        summary.total_students,
    )));
    for card in summary.program_cards.iter().chain([&summary.kipk_card]) {
        section.push_str(&share_row(card));
    }
    section.push('\n');

    section.push_str("## Program Studi\n\n");
    section.push_str(&program_table(&summary.programs));

    section
}

fn generate_students_section(roster: &StudentRoster) -> String {
    let mut section = String::new();

    section.push_str(&filter_line(&roster.filters));
    section.push_str(&format!(
        "*Program Studi: {} | Beasiswa: {}*\n\n",
        options_list(&roster.program_options),
        options_list(&roster.scholarship_options)
    ));
    section.push_str(&student_table(&roster.page));

    section
}

fn generate_advisors_section(roster: &AdvisorRoster) -> String {
    let mut section = String::new();

    if let Some(ref query) = roster.query {
        section.push_str(&format!("*Pencarian: \"{}\"*\n\n", escape_cell(query)));
    }

    if roster.page.is_empty() {
        section.push_str(NO_DATA);
        section.push_str("\n\n");
        return section;
    }

    section.push_str("| No | Dosen Pembimbing Akademik | Total | KIPK | Non KIPK |\n");
    section.push_str("|:---:|:---|:---:|:---:|:---:|\n");
    for (i, advisor) in roster.page.items.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            roster.page.first_row + i,
            escape_cell(&advisor.name),
            advisor.tally.total,
            advisor.tally.kipk,
            advisor.tally.non_kipk
        ));
    }
    section.push('\n');
    section.push_str(&page_navigation(&roster.page));

    section
}

fn generate_advisor_detail_section(detail: &AdvisorDetail) -> String {
    let mut section = String::new();

    match detail.advisor {
        Some(ref advisor) => section.push_str(&format!("## {}\n\n", escape_cell(advisor))),
        None => section.push_str("*Belum ada dosen yang dipilih.*\n\n"),
    }

    section.push_str(&cards_table(&detail.cards));
    section.push_str(&filter_line(&detail.filters));
    section.push_str(&student_table(&detail.page));

    section
}

fn generate_programs_section(report: &ProgramReport) -> String {
    let mut section = String::new();

    if let Some(ref selected) = report.selected {
        section.push_str(&format!("## {}\n\n", escape_cell(&selected.program)));
        section.push_str(&cards_table(&selected.cards));
        section.push_str(&format!(
            "*Dosen Pembimbing Akademik: {}*\n\n",
            selected.unique_advisor_count
        ));
    }

    section.push_str(&program_table(&report.programs));
    section.push_str(&format!(
        "*Program Studi tersedia: {}*\n\n",
        options_list(&report.program_options)
    ));

    section
}

fn generate_analytics_section(analytics: &Analytics) -> String {
    let mut section = String::new();

    section.push_str("## Distribusi Program Studi\n\n");
    section.push_str(&distribution_table("Program Studi", &analytics.program_distribution));

    section.push_str("## Distribusi Beasiswa\n\n");
    section.push_str(&distribution_table("Beasiswa", &analytics.scholarship_distribution));

    section
}

/// Numbered student rows followed by the page navigation line.
fn student_table(page: &Page<StudentRecord>) -> String {
    if page.is_empty() {
        return format!("{}\n\n", NO_DATA);
    }

    let mut table = String::new();

    table.push_str("| No | NIM | Nama | Program Studi | Dosen Pembimbing Akademik | Beasiswa |\n");
    table.push_str("|:---:|:---|:---|:---|:---|:---:|\n");
    for (i, record) in page.items.iter().enumerate() {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            page.first_row + i,
            cell(&record.nim),
            cell(&record.nama),
            cell(&record.program_studi),
            cell(&record.dosen_pembimbing_akademik),
            cell(&record.beasiswa)
        ));
    }
    table.push('\n');
    table.push_str(&page_navigation(page));

    table
}

fn page_navigation<T>(page: &Page<T>) -> String {
    let previous = if page.has_previous { "❮" } else { "·" };
    let next = if page.has_next { "❯" } else { "·" };
    format!(
        "{} Page {} of {} {} ({} rows)\n\n",
        previous, page.current_page, page.total_pages, next, page.total_items
    )
}

fn program_table(programs: &[ProgramStats]) -> String {
    if programs.is_empty() {
        return format!("{}\n\n", NO_DATA);
    }

    let mut table = String::new();

    table.push_str("| Program Studi | Jumlah | KIPK | Non KIPK | Tidak Diketahui | Dosen PA |\n");
    table.push_str("|:---|:---:|:---:|:---:|:---:|:---:|\n");
    for program in programs {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            escape_cell(&program.name),
            program.tally.total,
            program.tally.kipk,
            program.tally.non_kipk,
            program.tally.unknown,
            program.unique_advisor_count
        ));
    }
    table.push('\n');

    table
}

fn cards_table(cards: &[CountShare]) -> String {
    let mut table = String::new();

    table.push_str("| Kartu | Jumlah | Persentase |\n");
    table.push_str("|:---|:---:|:---:|\n");
    for card in cards {
        table.push_str(&share_row(card));
    }
    table.push('\n');

    table
}

fn distribution_table(heading: &str, rows: &[CountShare]) -> String {
    if rows.iter().all(|r| r.count == 0) {
        return format!("{}\n\n", NO_DATA);
    }

    let mut table = String::new();

    table.push_str(&format!("| {} | Jumlah | Persentase |\n", heading));
    table.push_str("|:---|:---:|:---:|\n");
    for row in rows {
        table.push_str(&share_row(row));
    }
    table.push('\n');

    table
}

fn share_row(share: &CountShare) -> String {
    format!(
        "| {} | {} | {:.1}% |\n",
        escape_cell(&share.label),
        share.count,
        share.percentage
    )
}

fn filter_line(filters: &FilterSet) -> String {
    if filters.is_unconstrained() {
        return String::new();
    }

    let mut parts = Vec::new();
    if let Some(ref query) = filters.query {
        parts.push(format!("Cari: \"{}\"", query));
    }
    if let Some(ref program) = filters.program {
        parts.push(format!("Program Studi: {}", program));
    }
    if let Some(ref scholarship) = filters.scholarship {
        parts.push(format!("Beasiswa: {}", scholarship));
    }

    if parts.is_empty() {
        return String::new();
    }
    format!("*Filter: {}*\n\n", parts.join(", "))
}

fn options_list(options: &[String]) -> String {
    if options.is_empty() {
        "-".to_string()
    } else {
        options.join(", ")
    }
}

fn cell(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => escape_cell(v),
        _ => "-".to_string(),
    }
}

/// Pipes would otherwise split a table cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

fn generate_footer() -> String {
    "---\n\n*Report generated by advising-dashboard*\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::paginate;
    use crate::dashboard::View;
    use crate::models::{AdvisorStats, ScholarshipTally};
    use chrono::Utc;

    fn metadata(view: View, total_records: usize) -> ReportMetadata {
        ReportMetadata {
            source: "snapshot.json".to_string(),
            view,
            generated_at: Utc::now(),
            loaded_at: Some(Utc::now()),
            total_records,
        }
    }

    fn student(nim: &str, nama: &str) -> StudentRecord {
        StudentRecord {
            nim: Some(nim.to_string()),
            nama: Some(nama.to_string()),
            program_studi: Some("Sistem Informasi".to_string()),
            dosen_pembimbing_akademik: None,
            beasiswa: Some("KIPK".to_string()),
        }
    }

    fn roster_report(records: &[StudentRecord], page: usize) -> Report {
        Report {
            metadata: metadata(View::Students, records.len()),
            message: None,
            content: ViewModel::Students(StudentRoster {
                filters: FilterSet {
                    program: Some("Sistem Informasi".to_string()),
                    ..Default::default()
                },
                program_options: vec!["Sistem Informasi".to_string()],
                scholarship_options: vec!["KIPK".to_string()],
                page: paginate(records, 15, page),
            }),
        }
    }

    #[test]
    fn test_student_table_numbers_rows_globally() {
        let records: Vec<StudentRecord> = (1..=20)
            .map(|i| student(&format!("{}", 1000 + i), &format!("Mahasiswa {}", i)))
            .collect();

        let markdown = generate_markdown_report(&roster_report(&records, 2));

        assert!(markdown.starts_with("# Data Mahasiswa"));
        assert!(markdown.contains("| 16 | 1016 | Mahasiswa 16 | Sistem Informasi | - | KIPK |"));
        assert!(markdown.contains("❮ Page 2 of 2 · (20 rows)"));
        assert!(markdown.contains("*Filter: Program Studi: Sistem Informasi*"));
        assert!(!markdown.contains("| 15 |"));
    }

    #[test]
    fn test_empty_roster_shows_no_data() {
        let markdown = generate_markdown_report(&roster_report(&[], 1));
        assert!(markdown.contains(NO_DATA));
        assert!(!markdown.contains("| No | NIM |"));
    }

    #[test]
    fn test_error_message_is_rendered() {
        let mut report = roster_report(&[student("1", "A|B")], 1);
        report.message = Some(StatusMessage::error("Gagal memuat data"));

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("> ⚠️ **Error:** Gagal memuat data"));
        assert!(markdown.contains("A\\|B"));
    }

    #[test]
    fn test_advisor_roster_table() {
        let advisors = vec![AdvisorStats {
            name: "Dr. Budi".to_string(),
            tally: ScholarshipTally {
                total: 3,
                kipk: 1,
                non_kipk: 2,
                unknown: 0,
            },
        }];
        let report = Report {
            metadata: metadata(View::Advisors, 3),
            message: None,
            content: ViewModel::Advisors(AdvisorRoster {
                query: Some("budi".to_string()),
                page: paginate(&advisors, 10, 1),
            }),
        };

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("| 1 | Dr. Budi | 3 | 1 | 2 |"));
        assert!(markdown.contains("*Pencarian: \"budi\"*"));
    }

    #[test]
    fn test_analytics_percentages() {
        let report = Report {
            metadata: metadata(View::Analytics, 4),
            message: None,
            content: ViewModel::Analytics(Analytics {
                total_students: 4,
                program_distribution: vec![CountShare::new("Sistem Informasi", 1, 3)],
                scholarship_distribution: vec![CountShare::new("KIPK", 0, 4)],
            }),
        };

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("| Sistem Informasi | 1 | 33.3% |"));
        // all-zero distribution renders as no data
        assert!(markdown.contains(&format!("## Distribusi Beasiswa\n\n{}", NO_DATA)));
    }

    fn dashboard_report(total_students: usize, kipk: usize) -> Report {
        Report {
            metadata: metadata(View::Dashboard, total_students),
            message: None,
            content: ViewModel::Dashboard(DashboardSummary {
                total_students,
                program_cards: vec![CountShare::new("Sistem Informasi", total_students, total_students)],
                kipk_card: CountShare::new("KIPK", kipk, total_students),
                programs: vec![],
            }),
        }
    }

    #[test]
    fn test_dashboard_total_card() {
        let markdown = generate_markdown_report(&dashboard_report(8, 2));
        assert!(markdown.contains("| Total Mahasiswa | 8 | 100.0% |"));
        assert!(markdown.contains("| KIPK | 2 | 25.0% |"));
    }

    #[test]
    fn test_dashboard_without_students_has_zero_shares() {
        let markdown = generate_markdown_report(&dashboard_report(0, 0));
        assert!(markdown.contains("| Total Mahasiswa | 0 | 0.0% |"));
        assert!(!markdown.contains("100.0%"));
        assert!(markdown.contains(&format!("## Program Studi\n\n{}", NO_DATA)));
    }

    #[test]
    fn test_generate_json_report() {
        let mut report = roster_report(&[student("2101001", "Siti")], 1);
        report.message = Some(StatusMessage::info("Tidak ada data yang ditemukan."));

        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["view"], "students");
        assert_eq!(value["content"]["view"], "students");
        assert_eq!(value["content"]["page"]["items"][0]["NIM"], "2101001");
        assert_eq!(value["message"]["kind"], "info");
    }
}
