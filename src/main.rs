//! Household Projection CLI
//!
//! Previews a scenario (enabled cards plus an optional draft) against a
//! baseline plan and writes the materialized per-year inputs to CSV.

use anyhow::Context;
use clap::Parser;
use household_projection::plan::{load_cards, load_overrides, load_plan_state, write_year_inputs};
use household_projection::{ScenarioComposer, ScenarioOutcome};
use std::fs::File;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "household_projection", version, about = "Preview what-if scenarios over a baseline plan")]
struct Args {
    /// Baseline plan state (JSON)
    #[arg(long, env = "HOUSEHOLD_PLAN")]
    plan: PathBuf,

    /// Scenario cards (JSON array)
    #[arg(long, env = "HOUSEHOLD_CARDS")]
    cards: Option<PathBuf>,

    /// Draft override batch (CSV), applied after every enabled card
    #[arg(long, env = "HOUSEHOLD_DRAFT")]
    draft: Option<PathBuf>,

    /// Where to write the per-year rows
    #[arg(long, default_value = "scenario_inputs.csv")]
    output: PathBuf,

    /// Number of years to print to the console
    #[arg(long, default_value_t = 10)]
    preview_years: usize,

    /// Print the outcome as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let plan = load_plan_state(&args.plan)
        .with_context(|| format!("loading plan state from {}", args.plan.display()))?;
    let cards = match &args.cards {
        Some(path) => load_cards(path)
            .with_context(|| format!("loading scenario cards from {}", path.display()))?,
        None => Vec::new(),
    };
    let draft = match &args.draft {
        Some(path) => Some(
            load_overrides(path)
                .with_context(|| format!("loading draft overrides from {}", path.display()))?,
        ),
        None => None,
    };

    let composer = ScenarioComposer::new(plan);
    let outcome = composer
        .compose(&cards, draft.as_deref())
        .context("scenario could not be previewed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let enabled = cards.iter().filter(|c| c.enabled).count();
    println!("Household Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("==========================\n");
    println!("Cards: {} loaded, {} enabled", cards.len(), enabled);
    println!("Draft overrides: {}", draft.as_ref().map_or(0, Vec::len));

    let inputs = match outcome {
        ScenarioOutcome::Baseline => {
            println!("No changes to apply; showing the baseline.\n");
            composer.baseline().context("baseline could not be materialized")?
        }
        ScenarioOutcome::Modified(inputs) => inputs,
    };

    println!(
        "{:>4} {:>4} {:>12} {:>10} {:>12} {:>10} {:>12} {:>10} {:>10}",
        "Idx", "Age", "UserBase", "UserBonus", "PartnerBase", "PtnBonus", "Lifestyle", "Housing", "NetPay/mo"
    );
    println!("{}", "-".repeat(96));
    for year in inputs.years.iter().take(args.preview_years) {
        println!(
            "{:>4} {:>4} {:>12.2} {:>10.2} {:>12} {:>10} {:>12.2} {:>10.2} {:>10}",
            year.year_index,
            year.age,
            year.user_base_income,
            year.user_bonus,
            year.partner_base_income.map_or("-".to_string(), |v| format!("{:.2}", v)),
            year.partner_bonus.map_or("-".to_string(), |v| format!("{:.2}", v)),
            year.lifestyle_spend,
            year.housing_spend,
            year.observed_net_pay_monthly.map_or("-".to_string(), |v| format!("{:.2}", v)),
        );
    }
    if inputs.len() > args.preview_years {
        println!("... ({} more years)", inputs.len() - args.preview_years);
    }

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_year_inputs(file, &inputs.years)?;
    println!("\nFull results written to: {}", args.output.display());

    let summary = inputs.summary();
    println!("\nSummary:");
    println!("  Years: {} (ages {}-{})", summary.years, summary.start_age, summary.end_age);
    println!("  Total Income: ${:.2}", summary.total_income);
    println!("  Total Spend: ${:.2}", summary.total_spend);
    println!("  Final Income: ${:.2}", summary.final_income);
    println!("  Final Spend: ${:.2}", summary.final_spend);

    Ok(())
}
