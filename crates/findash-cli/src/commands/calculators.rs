use clap::{Args, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use findash_core::calculators::{
    run_calculator, BreakEvenInput, CagrInput, CalculatorRequest, CompoundInterestInput,
    CompoundingFrequency, DebtToEquityInput, LoanInput, PeInput, ProfitMarginInput, RoiInput,
};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    Daily,
}

impl From<FrequencyArg> for CompoundingFrequency {
    fn from(f: FrequencyArg) -> Self {
        match f {
            FrequencyArg::Annually => CompoundingFrequency::Annually,
            FrequencyArg::SemiAnnually => CompoundingFrequency::SemiAnnually,
            FrequencyArg::Quarterly => CompoundingFrequency::Quarterly,
            FrequencyArg::Monthly => CompoundingFrequency::Monthly,
            FrequencyArg::Daily => CompoundingFrequency::Daily,
        }
    }
}

/// Arguments for the finance calculators
#[derive(Args)]
pub struct CalcArgs {
    #[command(subcommand)]
    pub calculator: CalcCommand,
}

#[derive(Subcommand)]
pub enum CalcCommand {
    /// Compound interest
    Compound {
        #[arg(long)]
        principal: Decimal,
        /// Annual rate (%)
        #[arg(long)]
        rate: Decimal,
        #[arg(long)]
        years: Decimal,
        #[arg(long, value_enum, default_value = "monthly")]
        frequency: FrequencyArg,
    },
    /// Compound annual growth rate
    Cagr {
        #[arg(long)]
        initial: Decimal,
        #[arg(long = "final")]
        final_value: Decimal,
        #[arg(long)]
        years: Decimal,
    },
    /// Return on investment
    Roi {
        #[arg(long)]
        investment: Decimal,
        #[arg(long)]
        returns: Decimal,
    },
    /// Price / earnings multiple
    Pe {
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        eps: Decimal,
    },
    /// Monthly loan instalment
    Emi {
        #[arg(long)]
        principal: Decimal,
        /// Annual rate (%)
        #[arg(long)]
        rate: Decimal,
        #[arg(long)]
        years: u32,
    },
    /// Net profit margin
    Margin {
        #[arg(long)]
        revenue: Decimal,
        #[arg(long)]
        costs: Decimal,
    },
    /// Debt-to-equity ratio
    DebtEquity {
        #[arg(long)]
        debt: Decimal,
        #[arg(long)]
        equity: Decimal,
    },
    /// Break-even units and revenue
    BreakEven {
        #[arg(long)]
        fixed_costs: Decimal,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        unit_cost: Decimal,
    },
    /// Run a request document tagged with `calculator`
    File {
        #[arg(long)]
        input: Option<String>,
    },
}

pub fn run_calc(args: CalcArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = match args.calculator {
        CalcCommand::Compound {
            principal,
            rate,
            years,
            frequency,
        } => CalculatorRequest::CompoundInterest(CompoundInterestInput {
            principal,
            rate_pct: rate,
            years,
            frequency: frequency.into(),
        }),
        CalcCommand::Cagr {
            initial,
            final_value,
            years,
        } => CalculatorRequest::Cagr(CagrInput {
            initial_value: initial,
            final_value,
            years,
        }),
        CalcCommand::Roi {
            investment,
            returns,
        } => CalculatorRequest::Roi(RoiInput {
            investment,
            final_value: returns,
        }),
        CalcCommand::Pe { price, eps } => CalculatorRequest::PeRatio(PeInput { price, eps }),
        CalcCommand::Emi {
            principal,
            rate,
            years,
        } => CalculatorRequest::LoanEmi(LoanInput {
            principal,
            annual_rate_pct: rate,
            years,
        }),
        CalcCommand::Margin { revenue, costs } => {
            CalculatorRequest::ProfitMargin(ProfitMarginInput {
                revenue,
                total_costs: costs,
            })
        }
        CalcCommand::DebtEquity { debt, equity } => {
            CalculatorRequest::DebtToEquity(DebtToEquityInput {
                total_debt: debt,
                total_equity: equity,
            })
        }
        CalcCommand::BreakEven {
            fixed_costs,
            price,
            unit_cost,
        } => CalculatorRequest::BreakEven(BreakEvenInput {
            fixed_costs,
            price_per_unit: price,
            cost_per_unit: unit_cost,
        }),
        CalcCommand::File { input: path } => input::load(path.as_deref())?
            .ok_or("--input is required (or pipe a calculator request on stdin)")?,
    };

    let out = run_calculator(&request)?;
    Ok(serde_json::to_value(out)?)
}
