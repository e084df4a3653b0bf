//! Grouped statistics over student records.
//!
//! [`Statistics::compute`] walks the record list once and builds the
//! advisor, program and scholarship groupings together.

use crate::analysis::normalize::{self, listing_order};
use crate::models::{AdvisorStats, ProgramStats, ScholarshipCategory, ScholarshipTally, StudentRecord};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// `value / total * 100`, rounded to one decimal place. Zero when `total` is zero.
pub fn percentage(value: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (value as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Statistics derived from one record list.
///
/// Groups are stored in discovery order; the accessors below apply the
/// listing or ranking order each view needs.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    advisors: Vec<AdvisorStats>,
    programs: Vec<ProgramStats>,
    scholarships: ScholarshipTally,
    advisor_index: HashMap<String, usize>,
    program_index: HashMap<String, usize>,
}

impl Statistics {
    /// Compute all groupings in a single pass over `records`.
    pub fn compute(records: &[StudentRecord]) -> Self {
        let mut stats = Self::default();
        let mut program_advisors: Vec<HashSet<&str>> = Vec::new();

        for record in records {
            let category = normalize::scholarship_category(record);
            stats.scholarships.record(category);

            let program = normalize::program_label(record);
            let slot = match stats.program_index.get(program) {
                Some(&slot) => slot,
                None => {
                    stats.programs.push(ProgramStats {
                        name: program.to_string(),
                        tally: ScholarshipTally::default(),
                        unique_advisor_count: 0,
                    });
                    program_advisors.push(HashSet::new());
                    stats
                        .program_index
                        .insert(program.to_string(), stats.programs.len() - 1);
                    stats.programs.len() - 1
                }
            };
            stats.programs[slot].tally.record(category);

            if let Some(advisor) = normalize::advisor_name(record) {
                program_advisors[slot].insert(advisor);

                let slot = match stats.advisor_index.get(advisor) {
                    Some(&slot) => slot,
                    None => {
                        stats.advisors.push(AdvisorStats {
                            name: advisor.to_string(),
                            tally: ScholarshipTally::default(),
                        });
                        stats
                            .advisor_index
                            .insert(advisor.to_string(), stats.advisors.len() - 1);
                        stats.advisors.len() - 1
                    }
                };
                stats.advisors[slot].tally.record(category);
            }
        }

        for (program, advisors) in stats.programs.iter_mut().zip(program_advisors) {
            program.unique_advisor_count = advisors.len();
        }

        debug!(
            "Computed statistics: {} records, {} programs, {} advisors",
            stats.scholarships.total,
            stats.programs.len(),
            stats.advisors.len()
        );

        stats
    }

    /// Number of records the statistics were computed from.
    pub fn total_records(&self) -> usize {
        self.scholarships.total
    }

    /// Statistics for one advisor, matched exactly.
    pub fn advisor(&self, name: &str) -> Option<&AdvisorStats> {
        self.advisor_index.get(name).map(|&i| &self.advisors[i])
    }

    /// Statistics for one program, matched exactly against the normalized name.
    pub fn program(&self, name: &str) -> Option<&ProgramStats> {
        self.program_index.get(name).map(|&i| &self.programs[i])
    }

    /// Whole-dataset scholarship counts.
    pub fn scholarships(&self) -> &ScholarshipTally {
        &self.scholarships
    }

    /// Flat scholarship-category counts in display order.
    pub fn scholarship_counts(&self) -> Vec<(ScholarshipCategory, usize)> {
        ScholarshipCategory::ALL
            .iter()
            .map(|category| (*category, self.scholarships.count(*category)))
            .collect()
    }

    /// Advisors in listing order.
    pub fn advisors(&self) -> Vec<&AdvisorStats> {
        let mut advisors: Vec<&AdvisorStats> = self.advisors.iter().collect();
        advisors.sort_by(|a, b| listing_order(&a.name, &b.name));
        advisors
    }

    /// Distinct advisor names in listing order.
    pub fn advisor_names(&self) -> Vec<&str> {
        self.advisors().into_iter().map(|a| a.name.as_str()).collect()
    }

    /// Distinct program names in listing order.
    pub fn program_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.programs.iter().map(|p| p.name.as_str()).collect();
        normalize::sort_for_listing(&mut names);
        names
    }

    /// Programs ranked by descending total; ties keep discovery order.
    pub fn ranked_programs(&self) -> Vec<&ProgramStats> {
        let mut ranked: Vec<&ProgramStats> = self.programs.iter().collect();
        ranked.sort_by_key(|p| std::cmp::Reverse(p.tally.total));
        ranked
    }
}

/// Count records per normalized program, in discovery order.
pub fn count_by_program(records: &[StudentRecord]) -> Vec<(String, usize)> {
    count_occurrences(records, normalize::program_label)
}

/// Count records per key, in discovery order.
pub fn count_occurrences<F>(records: &[StudentRecord], key: F) -> Vec<(String, usize)>
where
    F: Fn(&StudentRecord) -> &str,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let value = key(record);
        match index.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    counts
}

/// Distinct non-empty raw scholarship values, sorted. Used as filter options.
pub fn distinct_scholarship_values(records: &[StudentRecord]) -> Vec<String> {
    distinct_values(records, |r| r.beasiswa.as_deref())
}

/// Distinct non-empty raw program values, sorted. Used as filter options.
pub fn distinct_program_values(records: &[StudentRecord]) -> Vec<String> {
    distinct_values(records, |r| r.program_studi.as_deref())
}

fn distinct_values<F>(records: &[StudentRecord], field: F) -> Vec<String>
where
    F: Fn(&StudentRecord) -> Option<&str>,
{
    let set: HashSet<&str> = records
        .iter()
        .filter_map(|r| field(r))
        .filter(|v| !v.is_empty())
        .collect();

    let mut values: Vec<String> = set.into_iter().map(String::from).collect();
    normalize::sort_for_listing(&mut values);
    values
}
