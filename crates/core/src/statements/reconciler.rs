//! Detection of statements stored under the wrong period.
//!
//! A filing can end up stored twice: once correctly and once tagged
//! `QUARTERLY` because the period inferred from the source payload was wrong.
//! The erroneous copy shares its end date and financial content with a
//! differently tagged record, which is how it is found here.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use super::statements_model::{FinancialStatement, StatementPeriod};

/// Returns the `QUARTERLY` records that duplicate the content of a
/// differently tagged record with the same end date.
///
/// Records are compared through [`FinancialStatement::content_key`], so
/// identity and period never take part in the comparison and the input is
/// left untouched. Non-quarterly records are never returned.
pub fn find_misclassified(existing: &[FinancialStatement]) -> Vec<FinancialStatement> {
    let mut by_end_date: BTreeMap<NaiveDate, Vec<&FinancialStatement>> = BTreeMap::new();
    for statement in existing {
        by_end_date
            .entry(statement.end_date)
            .or_default()
            .push(statement);
    }

    let mut misclassified = Vec::new();
    for group in by_end_date.values().filter(|group| group.len() > 1) {
        let (quarterly, other): (Vec<&FinancialStatement>, Vec<&FinancialStatement>) = group
            .iter()
            .partition(|statement| statement.period == StatementPeriod::Quarterly);

        if other.is_empty() {
            continue;
        }

        let other_keys: HashSet<_> = other.iter().map(|s| s.content_key()).collect();
        misclassified.extend(
            quarterly
                .into_iter()
                .filter(|q| other_keys.contains(&q.content_key()))
                .cloned(),
        );
    }

    misclassified
}
