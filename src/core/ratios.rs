//! Financial ratios computed from an extracted company statement.
//!
//! A statement is the numeric summary pulled out of a company's filings. Every
//! ratio falls back to `0.0` when its denominator is not positive, and all of
//! them are rounded to two decimals.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

fn unknown_company() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfitAndLoss {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit_or_loss: f64,
}

/// Figures extracted from a company's financial documents. Missing numbers are zero.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FinancialStatement {
    #[serde(default = "unknown_company")]
    pub company: String,
    #[serde(default)]
    pub source_file: String,
    #[serde(default)]
    pub net_worth: f64,
    #[serde(default)]
    pub liabilities: f64,
    #[serde(default)]
    pub equity: f64,
    #[serde(default)]
    pub profit_and_loss: ProfitAndLoss,
}

impl FinancialStatement {
    /// Reads a statement from a JSON or YAML file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read statement file: {}", path.display()))?;
        let statement: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse statement file: {}", path.display()))?;
        debug!(company = %statement.company, "Loaded financial statement");
        Ok(statement)
    }

    /// Net worth plus liabilities, or equity plus liabilities when net worth is not positive.
    pub fn total_assets(&self) -> f64 {
        if self.net_worth > 0.0 {
            self.net_worth + self.liabilities
        } else {
            self.equity + self.liabilities
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FinancialRatios {
    pub company: String,
    pub source_file: String,
    pub net_profit_margin_percent: f64,
    pub return_on_equity_percent: f64,
    pub return_on_assets_percent: f64,
    pub current_ratio: f64,
    pub debt_to_equity_ratio: f64,
    pub asset_turnover_ratio: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub total_equity: f64,
    pub total_revenue: f64,
    pub net_profit: f64,
}

impl FinancialRatios {
    /// Labelled ratio values, in display order.
    pub fn rows(&self) -> [(&'static str, f64); 6] {
        [
            ("Net Profit Margin (%)", self.net_profit_margin_percent),
            ("Return on Equity (%)", self.return_on_equity_percent),
            ("Return on Assets (%)", self.return_on_assets_percent),
            ("Current Ratio", self.current_ratio),
            ("Debt to Equity", self.debt_to_equity_ratio),
            ("Asset Turnover", self.asset_turnover_ratio),
        ]
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator * scale`, or zero for a non-positive denominator.
fn guarded(numerator: f64, denominator: f64, scale: f64) -> f64 {
    if denominator > 0.0 {
        round2(numerator / denominator * scale)
    } else {
        0.0
    }
}

pub fn calculate(statement: &FinancialStatement) -> FinancialRatios {
    let assets = statement.total_assets();
    let liabilities = statement.liabilities;
    let equity = statement.equity;
    let revenue = statement.profit_and_loss.total_revenue;
    let net_profit = statement.profit_and_loss.net_profit_or_loss;

    FinancialRatios {
        company: statement.company.clone(),
        source_file: statement.source_file.clone(),
        net_profit_margin_percent: guarded(net_profit, revenue, 100.0),
        return_on_equity_percent: guarded(net_profit, equity, 100.0),
        return_on_assets_percent: guarded(net_profit, assets, 100.0),
        current_ratio: guarded(assets, liabilities, 1.0),
        debt_to_equity_ratio: guarded(liabilities, equity, 1.0),
        asset_turnover_ratio: guarded(revenue, assets, 1.0),
        total_assets: assets,
        total_liabilities: liabilities,
        total_equity: equity,
        total_revenue: revenue,
        net_profit,
    }
}
