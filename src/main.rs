use anyhow::Result;
use clap::{Parser, Subcommand};
use iai_dashboard::core::SortColumn;
use iai_dashboard::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Print the investment table
    Show {
        /// Column to sort by (company, industry, round, amount, score, status, updated)
        #[arg(short, long)]
        sort: Option<SortColumn>,

        /// Sort in descending order
        #[arg(short, long, requires = "sort")]
        desc: bool,

        /// Only show rows containing this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the investments as JSON
    Export,
    /// Open the interactive dashboard (default)
    Interactive,
    /// Compute financial ratios from a JSON or YAML statement file
    Ratios {
        /// Statement with company, net_worth, liabilities, equity and profit_and_loss
        statement: String,
    },
}

impl From<Commands> for iai_dashboard::AppCommand {
    fn from(cmd: Commands) -> iai_dashboard::AppCommand {
        match cmd {
            Commands::Show { sort, desc, search } => iai_dashboard::AppCommand::Show {
                sort,
                descending: desc,
                search,
            },
            Commands::Export => iai_dashboard::AppCommand::Export,
            Commands::Interactive => iai_dashboard::AppCommand::Interactive,
            Commands::Ratios { statement } => iai_dashboard::AppCommand::Ratios {
                statement_path: statement,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => iai_dashboard::cli::setup::setup(),
        Some(cmd) => iai_dashboard::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            iai_dashboard::run_command(
                iai_dashboard::AppCommand::Interactive,
                cli.config_path.as_deref(),
            )
            .await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
