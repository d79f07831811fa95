//! The in-memory record store backing the dashboard.

use crate::core::record::{Investment, InvestmentFields, InvestmentId, Status};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

/// Default rendering of `lastUpdated`, e.g. `Oct 20, 2025`.
pub const DEFAULT_DATE_FORMAT: &str = "%b %-d, %Y";

/// Inclusive range of scores handed out to new or re-analysed records.
const SCORE_RANGE: std::ops::RangeInclusive<u8> = 70..=99;

/// Columns the record list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Company,
    Industry,
    FundingRound,
    Amount,
    IaiScore,
    Status,
    LastUpdated,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Company,
        SortColumn::Industry,
        SortColumn::FundingRound,
        SortColumn::Amount,
        SortColumn::IaiScore,
        SortColumn::Status,
        SortColumn::LastUpdated,
    ];

    /// Orders two records by this column, ascending.
    pub fn compare(&self, a: &Investment, b: &Investment) -> Ordering {
        match self {
            SortColumn::Company => a.company.cmp(&b.company),
            SortColumn::Industry => a.industry.cmp(&b.industry),
            SortColumn::FundingRound => a.funding_round.cmp(&b.funding_round),
            // Amounts without a numeric value order before all others.
            SortColumn::Amount => a.amount_value().cmp(&b.amount_value()),
            SortColumn::IaiScore => a.iai_score.cmp(&b.iai_score),
            SortColumn::Status => a.status.label().cmp(b.status.label()),
            SortColumn::LastUpdated => a.last_updated.cmp(&b.last_updated),
        }
    }
}

impl Display for SortColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortColumn::Company => "company",
                SortColumn::Industry => "industry",
                SortColumn::FundingRound => "fundingRound",
                SortColumn::Amount => "amount",
                SortColumn::IaiScore => "iaiScore",
                SortColumn::Status => "status",
                SortColumn::LastUpdated => "lastUpdated",
            }
        )
    }
}

impl FromStr for SortColumn {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "company" => Ok(SortColumn::Company),
            "industry" => Ok(SortColumn::Industry),
            "fundinground" | "round" => Ok(SortColumn::FundingRound),
            "amount" => Ok(SortColumn::Amount),
            "iaiscore" | "score" => Ok(SortColumn::IaiScore),
            "status" => Ok(SortColumn::Status),
            "lastupdated" | "updated" => Ok(SortColumn::LastUpdated),
            _ => Err(anyhow::anyhow!("Invalid sort column: {}", s)),
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            column: None,
            ascending: true,
        }
    }
}

impl SortState {
    /// Same column flips the direction; a different column starts ascending.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.ascending = !self.ascending;
        } else {
            self.column = Some(column);
            self.ascending = true;
        }
    }
}

/// Source of "today" for `lastUpdated` stamps.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Ordered list of investment records plus the sort state last applied to it.
///
/// All mutation goes through the methods here. Lookups by id are linear scans
/// and an unknown id is never an error: `update` and `remove` return `None`
/// and leave the list untouched.
pub struct RecordStore {
    records: Vec<Investment>,
    sort: SortState,
    rng: StdRng,
    clock: Box<dyn Clock>,
    date_format: String,
}

impl RecordStore {
    pub fn new(records: Vec<Investment>) -> Self {
        Self::with_rng_and_clock(records, StdRng::from_entropy(), Box::new(SystemClock))
    }

    pub fn with_rng_and_clock(
        records: Vec<Investment>,
        rng: StdRng,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            records,
            sort: SortState::default(),
            rng,
            clock,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_date_format(mut self, date_format: &str) -> Self {
        self.date_format = date_format.to_string();
        self
    }

    pub fn list(&self) -> &[Investment] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: InvestmentId) -> Option<&Investment> {
        self.records.iter().find(|inv| inv.id == id)
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    fn next_id(&self) -> Result<InvestmentId> {
        let max = self.records.iter().map(|inv| inv.id.0).max().unwrap_or(0);
        max.checked_add(1)
            .map(InvestmentId)
            .with_context(|| format!("No investment id left after {max}"))
    }

    fn stamp(&self) -> String {
        self.clock.today().format(&self.date_format).to_string()
    }

    /// Appends a new record built from `fields` and returns it.
    ///
    /// Fails only when the highest id in the list is already `u32::MAX`.
    pub fn add(&mut self, fields: InvestmentFields) -> Result<&Investment> {
        let investment = Investment {
            id: self.next_id()?,
            company: fields.company,
            industry: fields.industry,
            funding_round: fields.funding_round,
            amount: fields.amount,
            iai_score: self.rng.gen_range(SCORE_RANGE),
            status: Status::PendingAnalysis,
            last_updated: self.stamp(),
        };
        debug!(id = %investment.id, company = %investment.company, "Adding investment");
        self.records.push(investment);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Replaces every field of record `id` except the id itself, keeping its position.
    pub fn update(&mut self, id: InvestmentId, fields: InvestmentFields) -> Option<&Investment> {
        let Some(index) = self.records.iter().position(|inv| inv.id == id) else {
            debug!(%id, "Update skipped, no such investment");
            return None;
        };
        let iai_score = self.rng.gen_range(SCORE_RANGE);
        let last_updated = self.stamp();

        let investment = &mut self.records[index];
        investment.company = fields.company;
        investment.industry = fields.industry;
        investment.funding_round = fields.funding_round;
        investment.amount = fields.amount;
        investment.iai_score = iai_score;
        investment.status = Status::PendingAnalysis;
        investment.last_updated = last_updated;
        debug!(%id, "Updated investment");
        Some(&self.records[index])
    }

    pub fn remove(&mut self, id: InvestmentId) -> Option<Investment> {
        let Some(index) = self.records.iter().position(|inv| inv.id == id) else {
            debug!(%id, "Remove skipped, no such investment");
            return None;
        };
        debug!(%id, "Removing investment");
        Some(self.records.remove(index))
    }

    /// Reorders the list by `column`. The sort is stable.
    pub fn sort_by(&mut self, column: SortColumn, ascending: bool) {
        self.records.sort_by(|a, b| {
            let ordering = column.compare(a, b);
            if ascending { ordering } else { ordering.reverse() }
        });
        self.sort = SortState {
            column: Some(column),
            ascending,
        };
        debug!(%column, ascending, "Sorted investments");
    }

    /// Advances the sort state for `column` and applies it.
    pub fn toggle_sort(&mut self, column: SortColumn) -> SortState {
        let mut next = self.sort;
        next.toggle(column);
        self.sort_by(column, next.ascending);
        self.sort
    }
}
