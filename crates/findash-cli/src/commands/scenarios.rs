use clap::{Args, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::fs;
use std::path::Path;

use findash_core::scenarios::{run_scenario_comparison, ScenarioBook, ScenarioKind};
use findash_core::valuation::DEFAULT_CURRENT_PRICE;

use super::valuation::AssumptionArgs;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Bear,
    Base,
    Bull,
}

impl From<KindArg> for ScenarioKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Bear => ScenarioKind::Bear,
            KindArg::Base => ScenarioKind::Base,
            KindArg::Bull => ScenarioKind::Bull,
        }
    }
}

/// Arguments for the bear/base/bull scenario book
#[derive(Args)]
pub struct ScenarioArgs {
    #[command(subcommand)]
    pub action: ScenarioAction,
}

#[derive(Subcommand)]
pub enum ScenarioAction {
    /// Save assumptions into a slot of the book file
    Save {
        /// Book file (JSON); created if missing
        #[arg(long)]
        book: String,
        #[arg(long, value_enum)]
        kind: KindArg,
        #[command(flatten)]
        assumptions: AssumptionArgs,
    },
    /// Print the assumptions saved in a slot
    Load {
        #[arg(long)]
        book: String,
        #[arg(long, value_enum)]
        kind: KindArg,
    },
    /// Empty a slot of the book file
    Clear {
        #[arg(long)]
        book: String,
        #[arg(long, value_enum)]
        kind: KindArg,
    },
    /// Value every saved scenario against the market price
    Compare {
        /// Book file (JSON or YAML); stdin if omitted
        #[arg(long)]
        book: Option<String>,
        #[arg(long, default_value_t = DEFAULT_CURRENT_PRICE)]
        price: Decimal,
    },
}

pub fn run_scenarios(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    match args.action {
        ScenarioAction::Save {
            book,
            kind,
            assumptions,
        } => {
            let mut scenarios = open_book(&book)?;
            let kind = ScenarioKind::from(kind);
            let replaced = scenarios.save(kind, &assumptions.resolve()?);
            write_book(&book, &scenarios)?;
            Ok(serde_json::json!({
                "result": {
                    "scenario": kind.label(),
                    "replaced": replaced,
                    "saved_scenarios": scenarios.len(),
                }
            }))
        }
        ScenarioAction::Load { book, kind } => {
            let scenarios = open_book(&book)?;
            let kind = ScenarioKind::from(kind);
            let saved = scenarios
                .load(kind)
                .ok_or_else(|| format!("{} has not been saved", kind.label()))?;
            Ok(serde_json::json!({ "result": saved }))
        }
        ScenarioAction::Clear { book, kind } => {
            let mut scenarios = open_book(&book)?;
            let kind = ScenarioKind::from(kind);
            let cleared = scenarios.clear(kind).is_some();
            write_book(&book, &scenarios)?;
            Ok(serde_json::json!({
                "result": { "scenario": kind.label(), "cleared": cleared }
            }))
        }
        ScenarioAction::Compare { book, price } => {
            let scenarios: ScenarioBook = input::load(book.as_deref())?
                .ok_or("--book is required (or pipe a scenario book on stdin)")?;
            let out = run_scenario_comparison(&scenarios, price)?;
            Ok(serde_json::to_value(out)?)
        }
    }
}

fn open_book(path: &str) -> Result<ScenarioBook, Box<dyn std::error::Error>> {
    if Path::new(path).exists() {
        input::file::read_input(path)
    } else {
        Ok(ScenarioBook::new())
    }
}

fn write_book(path: &str, book: &ScenarioBook) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, serde_json::to_string_pretty(book)?)
        .map_err(|e| format!("Failed to write '{path}': {e}"))?;
    tracing::info!(path, saved = book.len(), "scenario book written");
    Ok(())
}
