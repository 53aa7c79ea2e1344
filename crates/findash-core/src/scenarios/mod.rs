pub mod book;

pub use book::{
    compare_scenarios, run_scenario_comparison, ScenarioBook, ScenarioComparison, ScenarioKind,
    ScenarioOutcome,
};
