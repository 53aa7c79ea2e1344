mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::calculators::CalcArgs;
use commands::portfolio::{CorrelationArgs, PortfolioArgs, SearchArgs};
use commands::scenarios::ScenarioArgs;
use commands::valuation::{DcfArgs, SensitivityArgs, StatusArgs};

/// Stock valuation and portfolio risk dashboard
#[derive(Parser)]
#[command(
    name = "findash",
    version,
    about = "Stock valuation and portfolio risk dashboard",
    long_about = "A CLI for DCF valuation, sensitivity grids, bear/base/bull scenarios, \
                  portfolio risk scoring and everyday finance calculators, computed \
                  with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for diagnostics on stderr (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a five-year DCF valuation
    Dcf(DcfArgs),
    /// Classify intrinsic value against the market price
    Status(StatusArgs),
    /// WACC x terminal growth sensitivity grid
    Sensitivity(SensitivityArgs),
    /// Save, clear and compare bear/base/bull scenarios
    Scenarios(ScenarioArgs),
    /// Portfolio risk score, allocation and alerts
    Portfolio(PortfolioArgs),
    /// Diversification from a correlation matrix
    Correlation(CorrelationArgs),
    /// Search the stock universe by symbol or name
    Search(SearchArgs),
    /// Finance calculators (compound interest, CAGR, EMI, ...)
    Calc(CalcArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Dcf(args) => commands::valuation::run_dcf(args),
        Commands::Status(args) => commands::valuation::run_status(args),
        Commands::Sensitivity(args) => commands::valuation::run_sensitivity_grid(args),
        Commands::Scenarios(args) => commands::scenarios::run_scenarios(args),
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args),
        Commands::Correlation(args) => commands::portfolio::run_correlation(args),
        Commands::Search(args) => commands::portfolio::run_search(args),
        Commands::Calc(args) => commands::calculators::run_calc(args),
        Commands::Version => {
            println!("findash {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
