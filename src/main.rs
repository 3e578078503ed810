use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wardwatch::{duration, export, settings};
use wardwatch_engine::{Output, Roster, Ward};

#[derive(Parser, Debug)]
#[command(name = "wardwatch")]
#[command(about = "Ward vitals monitor with triage classification and alert tracking")]
struct Args {
    /// Config file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of demo patients
    #[arg(short, long)]
    patients: Option<usize>,

    /// Days of 15-minute history to backfill for demo patients
    #[arg(long)]
    history_days: Option<u32>,

    /// Tick interval (e.g., "2s", "500ms")
    #[arg(short, long)]
    interval: Option<String>,

    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks instead of running until Ctrl-C
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Overwrite this JSON file with the roster after every tick
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export the final roster with summary and alerts to a JSON file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Resume from a roster file written by --output instead of a demo roster
    #[arg(long)]
    resume: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = settings::load(args.config.as_deref())?;
    if let Some(patients) = args.patients {
        config.demo_patients = patients;
    }
    if let Some(days) = args.history_days {
        config.demo_history_days = days;
    }
    if let Some(ref interval) = args.interval {
        config.tick_interval_ms = duration::parse_duration(interval)?.as_millis() as u64;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    let interval = config.tick_interval();
    let mut builder = Ward::builder().config(config);
    builder = match args.resume {
        Some(ref path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading roster {}", path.display()))?;
            let roster: Roster = serde_json::from_str(&text)
                .with_context(|| format!("parsing roster {}", path.display()))?;
            info!(path = %path.display(), tick = roster.tick, patients = roster.len(), "Resuming roster");
            builder.resume(roster)
        }
        None => builder.demo_roster(),
    };
    if let Some(path) = args.output {
        builder = builder.output(Output::file(path));
    }
    let ward = builder.build()?;
    report(&ward.roster());

    let mut updates = ward.subscribe();
    ward.start_ticking(interval)?;
    info!(interval = %duration::format_duration(interval), "Monitoring started");

    loop {
        tokio::select! {
            changed = updates.changed() => {
                changed?;
                let roster: Arc<Roster> = updates.borrow_and_update().clone();
                report(&roster);
                if args.ticks.is_some_and(|limit| roster.tick >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    ward.stop_ticking();

    if let Some(path) = args.export {
        export::export_to_file(&ward.roster(), &path)?;
        info!(path = %path.display(), "Exported roster");
    }

    Ok(())
}

fn report(roster: &Roster) {
    let summary = roster.summary();
    info!(
        tick = roster.tick,
        active = summary.total,
        critical = summary.critical,
        observe = summary.observe,
        stable = summary.stable,
        offline = summary.offline_devices,
        alerts = summary.unacknowledged_alerts,
        avg_spo2 = ?summary.average_spo2,
        avg_hr = ?summary.average_heart_rate,
        "Ward status"
    );
}
