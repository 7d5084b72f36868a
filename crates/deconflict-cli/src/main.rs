//! Demo scenario runner for the deconfliction system.
//!
//! Verifies each built-in scenario and writes a JSON conflict report per
//! scenario into the output directory.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin run_scenarios

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deconflict_core::{
    ConflictRecord, DeconflictionSystem, VerificationStatus, DEFAULT_TIME_STEP_SECS,
};

mod scenarios;

#[derive(Parser, Debug)]
#[command(version, about = "Run built-in deconfliction scenarios and export conflict reports")]
struct Args {
    /// Minimum allowed separation between drones, in path units
    #[arg(long, default_value_t = 10.0)]
    buffer: f64,

    /// Trajectory sampling step, in seconds
    #[arg(long, default_value_t = DEFAULT_TIME_STEP_SECS)]
    step: f64,

    /// Directory for JSON conflict reports
    #[arg(long, default_value = "output")]
    output: std::path::PathBuf,

    /// Run only the named scenario
    #[arg(long)]
    scenario: Option<String>,
}

#[derive(Serialize)]
struct ScenarioReport<'a> {
    scenario: &'a str,
    status: VerificationStatus,
    safety_buffer: f64,
    time_step_secs: f64,
    conflicts: Vec<ConflictRecord>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating output directory {}", args.output.display()))?;

    let mut matched = false;
    for scenario in scenarios::all_scenarios(Utc::now())? {
        if let Some(only) = &args.scenario {
            if scenario.name != only {
                continue;
            }
        }
        matched = true;

        let system = DeconflictionSystem::with_step(scenario.simulated, args.buffer, args.step)
            .with_context(|| format!("building system for scenario {}", scenario.name))?;
        let report = system
            .verify(&scenario.primary)
            .with_context(|| format!("verifying scenario {}", scenario.name))?;

        info!(
            scenario = scenario.name,
            status = ?report.status,
            conflicts = report.conflicts.len(),
            "scenario verified"
        );
        for conflict in &report.conflicts {
            debug!(%conflict, "confirmed conflict");
        }

        let export = ScenarioReport {
            scenario: scenario.name,
            status: report.status,
            safety_buffer: args.buffer,
            time_step_secs: args.step,
            conflicts: report.conflicts.iter().map(|c| c.to_record()).collect(),
        };
        let path = args.output.join(format!("{}_report.json", scenario.name));
        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    if !matched {
        warn!(scenario = ?args.scenario, "no scenario matched");
    }

    Ok(())
}
