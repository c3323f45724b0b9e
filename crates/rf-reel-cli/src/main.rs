//! ReelForge Reel Driver
//!
//! Usage:
//!   rf-reel --source fixture --spins 3           - Spin over the test players
//!   rf-reel --source api --api-url <url>         - Spin over ranked players
//!   rf-reel --profile turbo --seed 7 --json      - Reproducible run, JSON events
//!
//! Set `RUST_LOG=debug` to follow phases and timers.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::broadcast::{self, error::RecvError};

use rf_reel::{ItemMetrics, ReelConfig, ReelEvent, ReelProfile, SpinController, SpinOutcome};
use rf_roster::{DEFAULT_API_URL, RosterProvider, SourceKind};

#[derive(Parser)]
#[command(name = "rf-reel", about = "Spin the ReelForge reel over a roster")]
struct Cli {
    /// Roster source (api or fixture)
    #[arg(long, default_value_t = SourceKind::Fixture)]
    source: SourceKind,

    /// Player API endpoint
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Number of consecutive spins
    #[arg(short, long, default_value_t = 1)]
    spins: u32,

    /// Timing preset (normal, turbo, studio)
    #[arg(short, long)]
    profile: Option<ReelProfile>,

    /// Reel config JSON file (overrides --profile)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Spin duration in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,

    /// RNG seed for reproducible winners
    #[arg(long)]
    seed: Option<u64>,

    /// Measured row height in pixels
    #[arg(long)]
    item_height: Option<f64>,

    /// Measured viewport height in pixels
    #[arg(long)]
    viewport_height: Option<f64>,

    /// Print every reel event as a JSON line
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let controller = match cli.seed {
        Some(seed) => SpinController::with_rng(config, StdRng::seed_from_u64(seed)),
        None => SpinController::new(config),
    }
    .context("Invalid reel configuration")?;

    controller.set_metrics(ItemMetrics {
        item_height_px: cli.item_height,
        viewport_height_px: cli.viewport_height,
    });
    if let Some(duration_ms) = cli.duration_ms {
        controller.set_spin_duration(duration_ms);
    }

    let provider = RosterProvider::builder()
        .api_url(&cli.api_url)
        .build()
        .context("Failed to build HTTP client")?;
    let roster = provider.load(cli.source).await;
    info!("[Reel] {} roster with {} item(s)", cli.source, roster.len());

    let mut events = controller.subscribe();
    for _ in 0..cli.spins {
        let Some(spin_id) = controller.spin(&roster) else {
            println!("Nothing to spin: the {} roster is empty", cli.source);
            return Ok(());
        };
        let outcome = wait_for_settle(&mut events, spin_id, cli.json).await?;
        println!(
            "Spin #{}: {} ({}) at strip row {}",
            outcome.spin_id,
            outcome.winner.label,
            outcome.winner.id,
            outcome.winner_strip_index()
        );
    }

    println!("Recent winners:");
    for (place, winner) in controller.history().iter().enumerate() {
        println!("  {}. {} ({})", place + 1, winner.label, winner.id);
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<ReelConfig> {
    match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            ReelConfig::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(ReelConfig::from_profile(cli.profile.unwrap_or_default())),
    }
}

async fn wait_for_settle(
    events: &mut broadcast::Receiver<ReelEvent>,
    spin_id: u64,
    json: bool,
) -> Result<SpinOutcome> {
    loop {
        match events.recv().await {
            Ok(event) => {
                report(&event, json)?;
                if let ReelEvent::SpinComplete(outcome) = event {
                    if outcome.spin_id == spin_id {
                        return Ok(outcome);
                    }
                }
            }
            Err(RecvError::Lagged(skipped)) => warn!("[Reel] {} event(s) skipped", skipped),
            Err(RecvError::Closed) => bail!("Reel event stream closed"),
        }
    }
}

fn report(event: &ReelEvent, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        debug!("[Reel] {:?}", event);
    }
    Ok(())
}
