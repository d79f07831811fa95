pub mod cli;
pub mod core;
pub mod dashboard;

use crate::cli::{repl, view};
use crate::core::config::AppConfig;
use crate::core::ratios::{self, FinancialRatios, FinancialStatement};
use crate::core::{DetachedApi, Investment, InvestmentApi, RecordStore, SortColumn};
use crate::dashboard::Dashboard;
use anyhow::Result;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Show {
        sort: Option<SortColumn>,
        descending: bool,
        search: Option<String>,
    },
    Export,
    Interactive,
    Ratios {
        statement_path: String,
    },
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        investments = config.investments.len(),
        "Loaded config"
    );
    Ok(config)
}

/// Orders and filters `records` the way the table would show them.
pub fn snapshot(
    records: Vec<Investment>,
    sort: Option<SortColumn>,
    descending: bool,
    search: Option<&str>,
) -> (RecordStore, Vec<Investment>) {
    let mut store = RecordStore::new(records);
    if let Some(column) = sort {
        store.sort_by(column, !descending);
    }
    let visible = view::filter(store.list(), search.unwrap_or_default())
        .into_iter()
        .cloned()
        .collect();
    (store, visible)
}

/// Ratios for `statement`, preferring the backend's answer over the local calculation.
pub async fn analyze_statement<A: InvestmentApi>(
    api: &A,
    statement: &FinancialStatement,
) -> FinancialRatios {
    match api.analyze_financials(statement).await {
        Ok(Some(ratios)) => ratios,
        Ok(None) => ratios::calculate(statement),
        Err(e) => {
            warn!(error = %e, "Financial analysis failed, calculating locally");
            ratios::calculate(statement)
        }
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Investment dashboard starting...");

    match command {
        AppCommand::Show {
            sort,
            descending,
            search,
        } => {
            let config = load_config(config_path)?;
            let (store, visible) =
                snapshot(config.investments, sort, descending, search.as_deref());
            println!("{}", view::render(&visible, store.sort_state()));
        }
        AppCommand::Export => {
            let config = load_config(config_path)?;
            println!("{}", serde_json::to_string_pretty(&config.investments)?);
        }
        AppCommand::Interactive => {
            let config = load_config(config_path)?;
            let mut dashboard =
                Dashboard::load(DetachedApi, config.investments, &config.date_format).await;
            let stdin = std::io::stdin();
            let mut prompter = repl::Prompter::new(stdin.lock(), std::io::stdout());
            repl::run(&mut dashboard, &mut prompter).await?;
        }
        AppCommand::Ratios { statement_path } => {
            let statement = FinancialStatement::load_from_path(&statement_path)?;
            let ratios = analyze_statement(&DetachedApi, &statement).await;
            println!("{}", view::render_ratios(&ratios));
        }
    }
    Ok(())
}
