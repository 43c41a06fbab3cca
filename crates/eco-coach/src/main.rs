use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use eco_coach::{CoachConfig, TipGenerator};
use footprint::{
    category_totals, emissions_breakdown, factors_in, format_emissions, percentage_change,
    status_message, total_emissions, ActivityQuantities, Amount, Category,
};
use serde_json::json;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily carbon footprint estimates with eco tips", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the emission factor table grouped by category
    Factors,
    /// Estimate a day's emissions and suggest a tip
    Estimate {
        /// Activities as ACTIVITY=AMOUNT, e.g. electricity_kwh=10 "Bus km"=15
        #[arg(value_name = "ACTIVITY=AMOUNT", required = true, value_parser = parse_activity)]
        activities: Vec<(String, String)>,

        /// Previous day's total in kg CO₂, for a day-over-day change
        #[arg(long, value_name = "KG")]
        previous: Option<f64>,

        /// Skip tip generation
        #[arg(long, default_value_t = false)]
        no_tip: bool,

        /// Use local rules only, even when OPENAI_API_KEY is set
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Emit a JSON report instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn parse_activity(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((label, amount)) if !label.trim().is_empty() => {
            Ok((label.trim().to_string(), amount.trim().to_string()))
        }
        _ => Err(format!("expected ACTIVITY=AMOUNT, got '{raw}'")),
    }
}

fn print_factors() {
    for category in Category::ALL {
        println!("{}", category.label());
        for factor in factors_in(category) {
            println!(
                "  {:<24} {:>8.3} kg CO₂ per {}",
                factor.key, factor.kg_per_unit, factor.unit
            );
        }
    }
}

async fn estimate(
    activities: Vec<(String, String)>,
    previous: Option<f64>,
    no_tip: bool,
    offline: bool,
    json_output: bool,
) -> Result<()> {
    if let Some(previous) = previous {
        if !previous.is_finite() || previous < 0.0 {
            bail!("--previous must be a non-negative number, got {previous}");
        }
    }

    let day: ActivityQuantities = activities
        .into_iter()
        .map(|(label, amount)| (label, Amount::from(amount)))
        .collect();

    let config = CoachConfig::from_env();
    let config = if offline { config.offline() } else { config };
    let generator = Arc::new(
        TipGenerator::from_config(&config).context("Failed to initialize tip generator")?,
    );
    info!(
        activities = day.len(),
        remote = generator.has_model(),
        "estimating footprint"
    );

    let total = total_emissions(&day);
    let breakdown = emissions_breakdown(&day);
    let categories = category_totals(&day);
    let change = previous.map(|previous| percentage_change(previous, total));

    if json_output {
        let tip = if no_tip {
            None
        } else {
            Some(generator.generate_tip(&day, total).await)
        };
        let report = json!({
            "total_kg": total,
            "breakdown": breakdown,
            "categories": categories,
            "status": status_message(total),
            "change_percent": change,
            "tip": tip.as_ref().map(|t| &t.text),
            "tip_source": tip.as_ref().map(|t| t.source.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // Start the tip first so it overlaps with printing the report.
    let pending = (!no_tip).then(|| generator.spawn(day.clone(), total));

    println!("Total: {}", format_emissions(total));
    if !breakdown.is_empty() {
        println!("Breakdown:");
        for (key, kg) in &breakdown {
            println!("  {key:<24} {kg:>10.4} kg");
        }
    }
    println!("By category:");
    for (category, kg) in &categories {
        println!("  {:<24} {}", category.label(), format_emissions(*kg));
    }
    println!("{}", status_message(total));
    if let Some(change) = change {
        println!("Change vs previous day: {change:+.2}%");
    }

    if let Some(pending) = pending {
        let tip = pending
            .wait_with_progress(config.progress_threshold, || {
                println!("Generating eco-tip...");
            })
            .await;
        println!("Tip: {tip}");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Factors => print_factors(),
        Command::Estimate {
            activities,
            previous,
            no_tip,
            offline,
            json,
        } => estimate(activities, previous, no_tip, offline, json).await?,
    }

    Ok(())
}
