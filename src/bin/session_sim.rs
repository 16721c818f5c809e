//! Scripted session runner
//!
//! Loads a city catalog, replays a fixed action rotation against it for
//! a number of ticks, and prints a JSON summary of the final session
//! state. Useful for eyeballing pacing after tuning the config.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use overthrow::actions::ActionKind;
use overthrow::catalog::CityCatalog;
use overthrow::core::config::EngineConfig;
use overthrow::core::error::Result;
use overthrow::engine::{Engine, SessionOutcome};
use overthrow::log::Event;
use overthrow::metrics::GlobalMetrics;

#[derive(Parser, Debug)]
#[command(name = "session_sim", about = "Run a scripted overthrow session")]
struct Args {
    /// RNG seed for the session
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Path to the city catalog JSON
    #[arg(long, default_value = "data/cities.json")]
    catalog: PathBuf,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Issue one action every this many ticks
    #[arg(long, default_value_t = 5)]
    action_interval: u64,
}

#[derive(Serialize)]
struct SessionSummary {
    ticks: u64,
    seed: u64,
    metrics: GlobalMetrics,
    outcome: SessionOutcome,
    total_events: usize,
    actions_performed: u64,
    retaliations: u64,
    incidents: u64,
    milestones: Vec<String>,
    recent_events: Vec<Event>,
}

const ROTATION: [ActionKind; 6] = [
    ActionKind::Protest,
    ActionKind::Network,
    ActionKind::Strike,
    ActionKind::Aid,
    ActionKind::ExposeMedia,
    ActionKind::Sabotage,
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("overthrow=info")
        .init();

    let args = Args::parse();

    let catalog = CityCatalog::from_file(&args.catalog)?;
    let ids: Vec<String> = catalog.seeds().iter().map(|s| s.name.clone()).collect();
    println!("Loaded {} cities from {}", catalog.len(), args.catalog.display());

    let mut engine = Engine::new(&catalog, EngineConfig::default(), args.seed)?;

    let mut action_cursor = 0usize;
    for t in 0..args.ticks {
        engine.tick()?;

        if args.action_interval > 0 && t % args.action_interval == 0 && !ids.is_empty() {
            let city = overthrow::core::types::CityId::new(&ids[action_cursor % ids.len()]);
            let kind = ROTATION[action_cursor % ROTATION.len()];
            engine.perform_action(&city, kind)?;
            action_cursor += 1;
        }

        if engine.outcome() != SessionOutcome::Ongoing {
            println!("Session ended at tick {}: {:?}", t, engine.outcome());
            break;
        }
    }

    let trackers = engine.trackers();
    let summary = SessionSummary {
        ticks: engine.current_tick(),
        seed: args.seed,
        metrics: engine.metrics(),
        outcome: engine.outcome(),
        total_events: engine.log().len(),
        actions_performed: trackers.actions_performed,
        retaliations: trackers.retaliations,
        incidents: trackers.incidents,
        milestones: trackers.milestones.iter().map(|m| m.to_string()).collect(),
        recent_events: engine.log().events().iter().rev().take(10).cloned().collect(),
    };

    println!(
        "IPI {} | solidarity {:.1} | {} events ({} actions, {} retaliations, {} incidents)",
        summary.metrics.ipi,
        summary.metrics.solidarity,
        summary.total_events,
        summary.actions_performed,
        summary.retaliations,
        summary.incidents,
    );

    let json = serde_json::to_string_pretty(&summary)?;
    std::fs::write("session_output.json", &json)?;
    println!("Full summary written to session_output.json");

    Ok(())
}
