//! Projects the record list into the dashboard table.
//!
//! Rendering always rebuilds the whole table. Search runs over the same text a
//! row displays, so it also matches derived values such as the status label and
//! the action labels.
use super::ui;
use crate::core::ratios::FinancialRatios;
use crate::core::record::{Investment, InvestmentId, Status};
use crate::core::store::{SortColumn, SortState};
use comfy_table::{Attribute, Cell, Color, Table};

/// Labels of the per-row affordances.
pub const ACTION_LABELS: [&str; 2] = ["Edit", "Delete"];

const SCORE_BAR_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Green,
    Cyan,
    Orange,
    Red,
}

impl ScoreTier {
    pub fn of(score: u8) -> Self {
        if score >= 85 {
            ScoreTier::Green
        } else if score >= 70 {
            ScoreTier::Cyan
        } else if score >= 55 {
            ScoreTier::Orange
        } else {
            ScoreTier::Red
        }
    }

    pub fn color(&self) -> Color {
        match self {
            ScoreTier::Green => Color::Green,
            ScoreTier::Cyan => Color::Cyan,
            ScoreTier::Orange => Color::Rgb {
                r: 0xFF,
                g: 0xA7,
                b: 0x26,
            },
            ScoreTier::Red => Color::Rgb {
                r: 0xEF,
                g: 0x53,
                b: 0x50,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    Excellent,
    Good,
    Average,
    Weak,
}

impl StatusStyle {
    pub fn of(status: &Status) -> Self {
        match status {
            Status::Excellent => StatusStyle::Excellent,
            Status::Good => StatusStyle::Good,
            Status::Weak => StatusStyle::Weak,
            Status::Average | Status::PendingAnalysis | Status::Other(_) => StatusStyle::Average,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            StatusStyle::Excellent => Color::Green,
            StatusStyle::Good => Color::Cyan,
            StatusStyle::Average => Color::Yellow,
            StatusStyle::Weak => Color::Red,
        }
    }
}

/// The visible text of one table row, cell by cell.
///
/// `render` draws exactly these strings, so search and display agree.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub id: InvestmentId,
    pub id_text: String,
    pub company: String,
    pub industry: String,
    pub funding_round: String,
    pub amount: String,
    pub score: String,
    pub status: String,
    pub last_updated: String,
    pub actions: String,
}

impl RenderedRow {
    pub fn project(investment: &Investment) -> Self {
        RenderedRow {
            id: investment.id,
            id_text: investment.id.to_string(),
            company: investment.company.clone(),
            industry: investment.industry.clone(),
            funding_round: investment.funding_round.clone(),
            amount: investment.amount.clone(),
            score: format!(
                "{:>3} {}",
                investment.iai_score,
                score_bar(investment.iai_score)
            ),
            status: investment.status.label().to_string(),
            last_updated: investment.last_updated.clone(),
            actions: ACTION_LABELS.join(" | "),
        }
    }

    pub fn cells(&self) -> [&str; 9] {
        [
            &self.id_text,
            &self.company,
            &self.industry,
            &self.funding_round,
            &self.amount,
            &self.score,
            &self.status,
            &self.last_updated,
            &self.actions,
        ]
    }

    /// All text the row shows.
    pub fn text(&self) -> String {
        self.cells().join(" ")
    }

    pub fn matches(&self, query: &str) -> bool {
        self.text().to_lowercase().contains(&query.to_lowercase())
    }
}

/// Records whose rendered row contains `query`, ignoring case.
pub fn filter<'a>(records: &'a [Investment], query: &str) -> Vec<&'a Investment> {
    records
        .iter()
        .filter(|inv| RenderedRow::project(inv).matches(query))
        .collect()
}

fn score_bar(score: u8) -> String {
    let filled = (usize::from(score.min(100)) * SCORE_BAR_WIDTH + 50) / 100;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(SCORE_BAR_WIDTH - filled)
    )
}

fn header_label(column: SortColumn) -> &'static str {
    match column {
        SortColumn::Company => "Company",
        SortColumn::Industry => "Industry",
        SortColumn::FundingRound => "Funding Round",
        SortColumn::Amount => "Amount",
        SortColumn::IaiScore => "IAI Score",
        SortColumn::Status => "Status",
        SortColumn::LastUpdated => "Last Updated",
    }
}

fn header_row(sort: SortState) -> Vec<Cell> {
    let mut header = vec![ui::header_cell("ID")];
    for column in SortColumn::ALL {
        let label = header_label(column);
        let text = match sort.column {
            Some(active) if active == column => {
                format!("{label} {}", if sort.ascending { "▲" } else { "▼" })
            }
            _ => label.to_string(),
        };
        header.push(ui::header_cell(&text));
    }
    header.push(ui::header_cell("Actions"));
    header
}

/// Builds the dashboard table for `records`, in the order given.
pub fn render<'a>(
    records: impl IntoIterator<Item = &'a Investment>,
    sort: SortState,
) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(header_row(sort));

    for investment in records {
        let score_color = ScoreTier::of(investment.iai_score).color();
        let status_color = StatusStyle::of(&investment.status).color();
        let row = RenderedRow::project(investment);

        table.add_row(vec![
            ui::numeric_cell(&row.id_text),
            Cell::new(&row.company).add_attribute(Attribute::Bold),
            Cell::new(&row.industry),
            Cell::new(&row.funding_round),
            ui::numeric_cell(&row.amount),
            Cell::new(&row.score).fg(score_color),
            ui::badge_cell(&row.status, status_color),
            Cell::new(&row.last_updated),
            ui::subtle_cell(&row.actions),
        ]);
    }

    table
}

/// Two-column table of a company's ratios followed by the figures they came from.
pub fn render_ratios(ratios: &FinancialRatios) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&ratios.company),
        ui::header_cell("Value"),
    ]);

    for (label, value) in ratios.rows() {
        table.add_row(vec![Cell::new(label), ui::numeric_cell(&format!("{value:.2}"))]);
    }
    for (label, value) in [
        ("Total Assets", ratios.total_assets),
        ("Total Liabilities", ratios.total_liabilities),
        ("Total Equity", ratios.total_equity),
        ("Total Revenue", ratios.total_revenue),
        ("Net Profit", ratios.net_profit),
    ] {
        table.add_row(vec![
            ui::subtle_cell(label),
            ui::numeric_cell(&format!("{value:.0}")),
        ]);
    }

    table
}
