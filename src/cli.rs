use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::InMemoryBusinessStore;
use crate::config::Config;
use crate::error::AppError;
use crate::domain::{CreditCategory, ThresholdScheme};
use crate::services::{BusinessBuilder, RandomValues};
use crate::use_cases::{
    write_predictions_csv, BatchPopulator, ExportAiData, LoadShowcase, RescoreBusinesses,
    ScreenBusinesses,
};

#[derive(Parser)]
#[command(name = "bizgen-core")]
#[command(about = "Bizgen Core - Synthetic Business Data and Heuristic Credit Scoring", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate businesses into the in-memory store and show the dashboard (default)
    Populate {
        /// Number of businesses, overrides BUSINESS_COUNT
        #[arg(short, long)]
        count: Option<usize>,

        /// Re-derive every stored score from stored orders and transactions
        #[arg(long)]
        rescore: bool,
    },

    /// Write AI training records for a generated population as JSON
    Export {
        /// Number of businesses, overrides BUSINESS_COUNT
        #[arg(short, long)]
        count: Option<usize>,

        /// Output file, overrides EXPORT_PATH
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply hard filters and scoring to an exported JSON file
    Screen {
        /// AI export JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Also write per-business predictions to this CSV file
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

pub async fn handle_populate(config: &Config, count: Option<usize>, rescore: bool) -> anyhow::Result<()> {
    let population = match count {
        Some(count) => config.population.clone().with_business_count(count),
        None => config.population.clone(),
    };
    let store = Arc::new(InMemoryBusinessStore::new());
    let populator = BatchPopulator::new(store.clone(), BusinessBuilder::standard()?, population);

    let mut rv = RandomValues::new(config.generator_seed);
    let report = populator.execute(&mut rv).await?;

    println!("Created {} businesses:", report.created.len());
    for created in &report.created {
        println!("  {} -> {}", created.business_id, created.store_id);
    }
    println!(
        "Related documents: {}  (generation {}ms, profiles {}ms, related {}ms, total {}ms)",
        report.related_documents,
        report.timings.generation_ms,
        report.timings.profiles_ms,
        report.timings.related_ms,
        report.timings.total_ms
    );

    if let Some(failure) = report.first_failure() {
        for failure in &report.failures {
            println!("✗ {}", failure);
        }
        if !report.not_attempted.is_empty() {
            println!("  Not attempted: {:?}", report.not_attempted);
        }
        return Err(anyhow::Error::new(AppError::from(failure.error.clone()))
            .context(failure.to_string()));
    }

    if rescore {
        let rescored = RescoreBusinesses::new(store.clone(), config.population.call_timeout)
            .execute()
            .await?;
        println!("Rescored {} businesses from stored activity:", rescored.len());
        for business in &rescored {
            println!(
                "  {:<32} {:>4} -> {:>3} ({})",
                business.business_name,
                business
                    .previous_score
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                business.assessment.credit_score,
                business.assessment.credit_category
            );
        }
    }

    let preferred = report
        .store_id_for(&config.showcase_business_id)
        .unwrap_or(config.showcase_business_id.as_str());
    let dashboard = LoadShowcase::new(store, config.population.call_timeout)
        .execute(preferred)
        .await?;
    println!();
    println!("{}", dashboard);

    tracing::info!("Populate command completed");
    Ok(())
}

pub fn handle_export(config: &Config, count: Option<usize>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let count = count.unwrap_or(config.population.business_count);
    let output = output.unwrap_or_else(|| config.export_path.clone());

    let mut rv = RandomValues::new(config.generator_seed);
    let records = ExportAiData::new(BusinessBuilder::standard()?).execute(count, &output, &mut rv)?;

    println!("✓ Exported {} businesses to {}", records.len(), output.display());
    for record in &records {
        println!(
            "  {} {:<32} {:>3} {}",
            record.business_id, record.business_name, record.credit_score, record.credit_category
        );
    }
    Ok(())
}

pub fn handle_screen(input: PathBuf, csv: Option<PathBuf>) -> anyhow::Result<()> {
    tracing::info!("Screening businesses from {}", input.display());
    let (predictions, report) = ScreenBusinesses::default().execute(&input)?;
    println!("{}", report);

    if let Some(path) = csv {
        write_predictions_csv(&path, &predictions)?;
        println!();
        println!("✓ Predictions written to {}", path.display());
    }
    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    let population = &config.population;
    println!("Configuration:");
    println!("  Business Count: {}", population.business_count);
    println!("  Batch Width: {}", population.batch_width);
    println!("  Max In-Flight Writes: {}", population.max_in_flight);
    println!("  Profile Fan-Out: {}", population.profile_fanout);
    println!("  Store Call Timeout: {}ms", population.call_timeout.as_millis());
    println!(
        "  Generator Seed: {}",
        config
            .generator_seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "(entropy)".to_string())
    );
    println!("  Showcase Business: {}", config.showcase_business_id);
    println!("  Export Path: {}", config.export_path.display());
    println!("  Log Format: {:?}", config.log_format);
    println!("  Dashboard bands:");
    let scheme = ThresholdScheme::Display;
    for category in [
        CreditCategory::Excellent,
        CreditCategory::Good,
        CreditCategory::AtRisk,
        CreditCategory::Poor,
    ] {
        println!("    {:<14} {}", scheme.label(category), scheme.range(category));
    }

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");
    Ok(())
}
