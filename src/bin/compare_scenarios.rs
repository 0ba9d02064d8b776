//! Compare each enabled scenario card against the baseline
//!
//! Usage: cargo run --bin compare_scenarios
//! Reads HOUSEHOLD_PLAN (default plan.json) and HOUSEHOLD_CARDS (default cards.json)

use anyhow::Context;
use household_projection::plan::{load_cards, load_plan_state};
use household_projection::{MaterializedInputs, ScenarioComposer, ScenarioOutcome, YearInputs};
use std::env;

/// Dollar difference treated as a real change
const DIVERGENCE_THRESHOLD: f64 = 0.005;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let plan_path = env::var("HOUSEHOLD_PLAN").unwrap_or_else(|_| "plan.json".to_string());
    let cards_path = env::var("HOUSEHOLD_CARDS").unwrap_or_else(|_| "cards.json".to_string());

    let plan = load_plan_state(&plan_path).with_context(|| format!("loading {}", plan_path))?;
    let cards = load_cards(&cards_path).with_context(|| format!("loading {}", cards_path))?;

    let composer = ScenarioComposer::new(plan);
    let baseline = composer.baseline().context("baseline could not be materialized")?;

    for (card_id, outcome) in composer.preview_each(&cards) {
        println!("\n{}", "=".repeat(60));
        println!("Card {}", card_id);
        println!("{}", "=".repeat(60));

        match outcome {
            Ok(ScenarioOutcome::Baseline) => println!("  No overrides; identical to baseline"),
            Ok(ScenarioOutcome::Modified(scenario)) => compare(&baseline, &scenario),
            Err(e) => println!("  Cannot preview this change: {}", e),
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("All enabled cards combined");
    println!("{}", "=".repeat(60));
    match composer.compose(&cards, None)? {
        ScenarioOutcome::Baseline => println!("  No enabled cards; identical to baseline"),
        ScenarioOutcome::Modified(scenario) => compare(&baseline, &scenario),
    }

    Ok(())
}

fn compare(baseline: &MaterializedInputs, scenario: &MaterializedInputs) {
    println!(
        "  {:<5} {:<5} {:>14} {:>14} {:>14} | {:>12} {:>12} {:>12}",
        "Idx", "Age", "Base_Income", "Scen_Income", "Diff", "Base_Spend", "Scen_Spend", "Diff"
    );
    println!("  {:-<96}", "");

    let mut first_divergence: Option<(&YearInputs, &YearInputs)> = None;

    for (base, scen) in baseline.years.iter().zip(&scenario.years) {
        let income_diff = scen.total_income() - base.total_income();
        let spend_diff = scen.total_spend() - base.total_spend();
        let diverged =
            income_diff.abs() > DIVERGENCE_THRESHOLD || spend_diff.abs() > DIVERGENCE_THRESHOLD;

        if diverged {
            let marker = if first_divergence.is_none() { ">>>" } else { "   " };
            println!(
                "{} {:<5} {:<5} {:>14.2} {:>14.2} {:>14.2} | {:>12.2} {:>12.2} {:>12.2}",
                marker,
                base.year_index,
                base.age,
                base.total_income(),
                scen.total_income(),
                income_diff,
                base.total_spend(),
                scen.total_spend(),
                spend_diff
            );
            if first_divergence.is_none() {
                first_divergence = Some((base, scen));
            }
        }
    }

    match first_divergence {
        None => println!("\n  No difference from baseline in {} years", baseline.len()),
        Some((base, scen)) => {
            println!("\n  === DETAILED BREAKDOWN FOR AGE {} ===", base.age);
            println!("  {:30} {:>15} {:>15} {:>15}", "Field", "Baseline", "Scenario", "Diff");
            println!("  {:-<75}", "");
            let fields = [
                ("User base income", base.user_base_income, scen.user_base_income),
                ("User bonus", base.user_bonus, scen.user_bonus),
                (
                    "Partner base income",
                    base.partner_base_income.unwrap_or(0.0),
                    scen.partner_base_income.unwrap_or(0.0),
                ),
                (
                    "Partner bonus",
                    base.partner_bonus.unwrap_or(0.0),
                    scen.partner_bonus.unwrap_or(0.0),
                ),
                ("Lifestyle spend", base.lifestyle_spend, scen.lifestyle_spend),
                ("Housing spend", base.housing_spend, scen.housing_spend),
            ];
            for (name, b, s) in fields {
                println!("  {:30} {:>15.2} {:>15.2} {:>15.2}", name, b, s, s - b);
            }
        }
    }

    let base_summary = baseline.summary();
    let scen_summary = scenario.summary();
    println!(
        "\n  Lifetime income: {:.2} -> {:.2} ({:+.2})",
        base_summary.total_income,
        scen_summary.total_income,
        scen_summary.total_income - base_summary.total_income
    );
    println!(
        "  Lifetime spend:  {:.2} -> {:.2} ({:+.2})",
        base_summary.total_spend,
        scen_summary.total_spend,
        scen_summary.total_spend - base_summary.total_spend
    );
}
