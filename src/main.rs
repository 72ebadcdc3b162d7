//! Planning System CLI
//!
//! Command-line interface for running household projections

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use planning_system::facts::{load_plan, sample_plan};
use planning_system::money::round_currency;
use planning_system::scenario::ScenarioFact;
use planning_system::{ProjectionSummary, ScenarioRunner, YearlyCalculationResult};

#[derive(Debug, Parser)]
#[command(name = "planning_system", about = "Household financial projection engine")]
struct Args {
    /// Plan JSON file; omit to run the built-in sample plan
    #[arg(long)]
    plan: Option<PathBuf>,

    /// CSV file for the full year-by-year output
    #[arg(long, default_value = "projection_output.csv")]
    output: PathBuf,

    /// Number of years to print to the console
    #[arg(long, default_value_t = 15)]
    years_shown: usize,

    /// Skip the scenario pass even if the plan defines scenarios
    #[arg(long)]
    base_only: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Planning System v0.1.0");
    println!("======================\n");

    let plan = match &args.plan {
        Some(path) => load_plan(path).with_context(|| format!("loading {}", path.display()))?,
        None => sample_plan(),
    };
    let plan_name = plan.plan_name.clone();
    let (facts, scenario_definitions) = plan.into_parts();

    println!("Plan: {}", plan_name);
    println!("  Years: {}..={}", facts.start_year, facts.end_year);
    println!("  Retirement: {}", facts.retirement_year);
    println!(
        "  Assets: {}  Liabilities: {}  Flows: {}  Income streams: {}",
        facts.assets.len(),
        facts.liabilities.len(),
        facts.cash_flows.len(),
        facts.retirement_income.len()
    );
    println!();

    let runner = ScenarioRunner::new();
    let results = runner.run_base(&facts)?;

    println!("Projection Results ({} years):", results.len());
    println!(
        "{:>6} {:>16} {:>12} {:>12} {:>12} {:>16} {:>16}",
        "Year", "Start NW", "Inflows", "Outflows", "Income", "End NW", "Retirement"
    );
    println!("{}", "-".repeat(96));

    for result in results.iter().take(args.years_shown) {
        println!(
            "{:>6} {:>16} {:>12} {:>12} {:>12} {:>16} {:>16}",
            result.year,
            round_currency(result.starting_portfolio.total_net_worth),
            round_currency(result.cash_flows.total_inflows),
            round_currency(result.cash_flows.total_outflows),
            round_currency(result.income.total_income),
            round_currency(result.ending_portfolio.total_net_worth),
            round_currency(result.ending_portfolio.retirement_portfolio_value),
        );
    }
    if results.len() > args.years_shown {
        println!("... ({} more years)", results.len() - args.years_shown);
    }

    write_csv(&args.output, &results)?;
    println!("\nFull results written to: {}", args.output.display());

    if let Some(summary) = ProjectionSummary::from_results(&results) {
        println!("\nSummary:");
        println!("  Years: {}", summary.years);
        println!("  Starting Net Worth: ${}", summary.starting_net_worth);
        println!("  Final Net Worth: ${}", summary.final_net_worth);
        println!(
            "  Final Retirement Portfolio: ${}",
            summary.final_retirement_portfolio
        );
        println!("  Total Inflows: ${}", summary.total_inflows);
        println!("  Total Outflows: ${}", summary.total_outflows);
        println!("  Total Retirement Income: ${}", summary.total_income);
    }

    if !args.base_only {
        for definition in &scenario_definitions {
            let scenario = ScenarioFact::from_definition(definition, &facts);
            let scenario_results = runner.run_scenario(&scenario, &results)?;

            println!("\nScenario: {} ({} overrides)", scenario.name, scenario.overrides.len());
            println!(
                "{:>6} {:>14} {:>16} {:>16}",
                "Year", "Spending", "Retirement", "Base Retirement"
            );
            println!("{}", "-".repeat(56));
            for result in scenario_results.iter().take(args.years_shown) {
                println!(
                    "{:>6} {:>14} {:>16} {:>16}",
                    result.metadata.year,
                    round_currency(result.adjusted_spending),
                    round_currency(result.scenario_portfolio.retirement_portfolio_value),
                    round_currency(result.base_result.ending_portfolio.retirement_portfolio_value),
                );
            }
            let last = scenario_results.last();
            if let Some(last) = last {
                println!(
                    "  Final retirement portfolio: ${} (cumulative spending ${})",
                    round_currency(last.scenario_portfolio.retirement_portfolio_value),
                    round_currency(last.metadata.cumulative_spending),
                );
            }
        }
    }

    Ok(())
}

fn write_csv(path: &PathBuf, results: &[YearlyCalculationResult]) -> anyhow::Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;

    writeln!(
        file,
        "Year,StartNetWorth,Inflows,Outflows,NetFlow,Income,EndNetWorth,RetirementPortfolio"
    )?;
    for result in results {
        writeln!(
            file,
            "{},{},{},{},{},{},{},{}",
            result.year,
            round_currency(result.starting_portfolio.total_net_worth),
            round_currency(result.cash_flows.total_inflows),
            round_currency(result.cash_flows.total_outflows),
            round_currency(result.cash_flows.net_flow),
            round_currency(result.income.total_income),
            round_currency(result.ending_portfolio.total_net_worth),
            round_currency(result.ending_portfolio.retirement_portfolio_value),
        )?;
    }

    Ok(())
}
