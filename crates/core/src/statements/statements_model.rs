//! Financial statement domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, ValidationError};

/// Named numeric line items of a statement (e.g. "totalAssets").
pub type LineItems = BTreeMap<String, Decimal>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementKind {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [
        StatementKind::BalanceSheet,
        StatementKind::IncomeStatement,
        StatementKind::CashFlow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "BALANCE_SHEET",
            StatementKind::IncomeStatement => "INCOME_STATEMENT",
            StatementKind::CashFlow => "CASH_FLOW",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BALANCE_SHEET" => Ok(StatementKind::BalanceSheet),
            "INCOME_STATEMENT" => Ok(StatementKind::IncomeStatement),
            "CASH_FLOW" => Ok(StatementKind::CashFlow),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown statement kind: {}",
                other
            )))),
        }
    }
}

/// Reporting period classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementPeriod {
    Annual,
    Quarterly,
}

impl StatementPeriod {
    pub const ALL: [StatementPeriod; 2] = [StatementPeriod::Annual, StatementPeriod::Quarterly];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementPeriod::Annual => "ANNUAL",
            StatementPeriod::Quarterly => "QUARTERLY",
        }
    }
}

impl fmt::Display for StatementPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ANNUAL" => Ok(StatementPeriod::Annual),
            "QUARTERLY" => Ok(StatementPeriod::Quarterly),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown statement period: {}",
                other
            )))),
        }
    }
}

/// A single persisted (or about to be persisted) statement.
///
/// At most one statement exists per (ticker, kind, end_date, period).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStatement {
    /// Storage identity, `None` until the store assigns one.
    pub id: Option<String>,
    pub ticker: String,
    pub kind: StatementKind,
    pub end_date: NaiveDate,
    pub period: StatementPeriod,
    /// When the filing became public, if known.
    pub release_date: Option<NaiveDate>,
    pub line_items: LineItems,
}

impl FinancialStatement {
    /// Value used to decide whether two statements describe the same filing.
    pub fn content_key(&self) -> ContentKey<'_> {
        ContentKey {
            kind: self.kind,
            ticker: &self.ticker,
            end_date: self.end_date,
            line_items: &self.line_items,
        }
    }

    /// Key of the storage slot this statement occupies for its ticker and kind.
    pub fn slot(&self) -> (StatementPeriod, NaiveDate) {
        (self.period, self.end_date)
    }
}

/// Financial content of a statement: identity and period are not part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey<'a> {
    pub kind: StatementKind,
    pub ticker: &'a str,
    pub end_date: NaiveDate,
    pub line_items: &'a LineItems,
}

/// One dated point of a statement series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementEntry {
    pub release_date: Option<NaiveDate>,
    pub line_items: LineItems,
}

/// Annual and quarterly history of one statement kind, ordered by end date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementSeries {
    pub annual: BTreeMap<NaiveDate, StatementEntry>,
    pub quarterly: BTreeMap<NaiveDate, StatementEntry>,
}

impl StatementSeries {
    pub fn entries(&self, period: StatementPeriod) -> &BTreeMap<NaiveDate, StatementEntry> {
        match period {
            StatementPeriod::Annual => &self.annual,
            StatementPeriod::Quarterly => &self.quarterly,
        }
    }

    pub fn entries_mut(
        &mut self,
        period: StatementPeriod,
    ) -> &mut BTreeMap<NaiveDate, StatementEntry> {
        match period {
            StatementPeriod::Annual => &mut self.annual,
            StatementPeriod::Quarterly => &mut self.quarterly,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.annual.is_empty() && self.quarterly.is_empty()
    }

    /// Latest release date, or end date where the release date is unknown.
    pub fn latest_release_or_end_date(&self) -> Option<NaiveDate> {
        self.annual
            .iter()
            .chain(self.quarterly.iter())
            .map(|(end_date, entry)| entry.release_date.unwrap_or(*end_date))
            .max()
    }
}

/// Every known statement of one ticker, grouped by kind and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAggregate {
    pub ticker: String,
    pub balance_sheet: StatementSeries,
    pub income_statement: StatementSeries,
    pub cash_flow: StatementSeries,
}

impl FinancialAggregate {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            balance_sheet: StatementSeries::default(),
            income_statement: StatementSeries::default(),
            cash_flow: StatementSeries::default(),
        }
    }

    /// Assembles an aggregate from stored records. Records for other tickers are ignored.
    pub fn from_statements<'a, I>(ticker: &str, statements: I) -> Self
    where
        I: IntoIterator<Item = &'a FinancialStatement>,
    {
        let mut aggregate = Self::new(ticker);
        for statement in statements
            .into_iter()
            .filter(|statement| statement.ticker == ticker)
        {
            aggregate.insert(statement);
        }
        aggregate
    }

    pub fn insert(&mut self, statement: &FinancialStatement) {
        self.series_mut(statement.kind)
            .entries_mut(statement.period)
            .insert(
                statement.end_date,
                StatementEntry {
                    release_date: statement.release_date,
                    line_items: statement.line_items.clone(),
                },
            );
    }

    pub fn series(&self, kind: StatementKind) -> &StatementSeries {
        match kind {
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::IncomeStatement => &self.income_statement,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }

    pub fn series_mut(&mut self, kind: StatementKind) -> &mut StatementSeries {
        match kind {
            StatementKind::BalanceSheet => &mut self.balance_sheet,
            StatementKind::IncomeStatement => &mut self.income_statement,
            StatementKind::CashFlow => &mut self.cash_flow,
        }
    }

    /// True when no statement of any kind is present.
    pub fn is_blank(&self) -> bool {
        StatementKind::ALL
            .iter()
            .all(|kind| self.series(*kind).is_empty())
    }

    pub fn latest_quarterly_balance_sheet_date(&self) -> Option<NaiveDate> {
        self.balance_sheet.quarterly.keys().next_back().copied()
    }

    pub fn latest_balance_sheet_release_or_end_date(&self) -> Option<NaiveDate> {
        self.balance_sheet.latest_release_or_end_date()
    }

    /// Flattens one kind into unsaved storage records, annual first.
    pub fn to_statements(&self, kind: StatementKind) -> Vec<FinancialStatement> {
        let series = self.series(kind);
        StatementPeriod::ALL
            .iter()
            .flat_map(|period| {
                series
                    .entries(*period)
                    .iter()
                    .map(move |(end_date, entry)| FinancialStatement {
                        id: None,
                        ticker: self.ticker.clone(),
                        kind,
                        end_date: *end_date,
                        period: *period,
                        release_date: entry.release_date,
                        line_items: entry.line_items.clone(),
                    })
            })
            .collect()
    }
}
