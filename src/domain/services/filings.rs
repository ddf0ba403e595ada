#[cfg(test)]
#[path = "filings_test.rs"]
mod tests;

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::domain::models::Filing;
use crate::domain::models::Quarter;

pub type FormGroups = BTreeMap<String, Vec<Filing>>;
pub type QuarterGroups = BTreeMap<Quarter, FormGroups>;
pub type FilingTree = BTreeMap<i32, QuarterGroups>;

/// Groups filings by report year, quarter and form type. Within a form type
/// the newest report comes first.
pub fn organize_filings(filings: &[Filing]) -> FilingTree {
    let mut tree = FilingTree::new();

    for filing in filings {
        let date = match filing.report_date() {
            Some(date) => date,
            None => {
                tracing::warn!(
                    accession = %filing.accession_number,
                    report_date = %filing.report_date,
                    "Skipping filing with unparseable report date"
                );
                continue;
            }
        };

        let quarter = match Quarter::from_month(date.month()) {
            Some(quarter) => quarter,
            None => continue,
        };

        tree.entry(date.year())
            .or_default()
            .entry(quarter)
            .or_default()
            .entry(filing.form_type.trim().to_string())
            .or_default()
            .push(filing.clone());
    }

    for quarters in tree.values_mut() {
        for forms in quarters.values_mut() {
            for group in forms.values_mut() {
                group.sort_by_key(|filing| return std::cmp::Reverse(filing.report_date()));
            }
        }
    }

    return tree;
}
