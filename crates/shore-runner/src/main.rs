//! Terminal runner for the Shoreline simulation.
//!
//! Exit codes: 0 on shutdown or tick limit, 1 on extinction, 2 on error.

mod render;
mod telemetry;

use anyhow::{Context, Result};
use render::TerminalRenderer;
use shore_core::{SimConfig, TimingConfig};
use shore_world::{Outcome, RandomSource, Renderer, Simulation};
use std::process::ExitCode;
use tokio::signal;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

/// Why the tick loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Extinct,
    TickLimit,
    Shutdown,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = telemetry::init_telemetry() {
        eprintln!("failed to initialize telemetry: {:#}", e);
        return ExitCode::from(2);
    }

    match run().await {
        Ok(Stop::Extinct) => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Runner failed: {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run() -> Result<Stop> {
    let config = load_config()?;
    info!(
        side = config.world.side,
        seed = ?config.seed,
        tick_delay_ms = config.timing.tick_delay_ms,
        sweep_delay_ms = config.timing.sweep_delay_ms,
        "Starting Shoreline runner"
    );

    let mut sim = Simulation::new(config.clone()).context("failed to build simulation")?;
    let mut renderer = TerminalRenderer::stdout();
    renderer.render(&sim.snapshot())?;

    let stop = tokio::select! {
        stop = drive(&mut sim, &mut renderer, &config.timing) => stop?,
        _ = shutdown_signal() => Stop::Shutdown,
    };

    let summary = sim.summary();
    info!(?stop, ticks = summary.ticks, "Runner stopped");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(stop)
}

/// Config path from the first argument, then `SHORE_CONFIG`, else defaults
fn load_config() -> Result<SimConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SHORE_CONFIG").ok());

    match path {
        Some(path) => {
            info!(%path, "Loading configuration");
            SimConfig::from_json_file(&path)
                .with_context(|| format!("failed to load config from {}", path))
        }
        None => {
            let config = SimConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Alternate the two scheduled phases until extinction or the tick limit
async fn drive<R, V>(sim: &mut Simulation<R>, renderer: &mut V, timing: &TimingConfig) -> Result<Stop>
where
    R: RandomSource,
    V: Renderer,
{
    let tick_delay = Duration::from_millis(timing.tick_delay_ms);
    let sweep_delay = Duration::from_millis(timing.sweep_delay_ms);

    loop {
        if sim.reached_tick_limit() {
            return Ok(Stop::TickLimit);
        }

        sleep(tick_delay).await;
        sim.animate()?;
        renderer.render(&sim.snapshot())?;

        sleep(sweep_delay).await;
        let outcome = sim.delete_dead()?;
        renderer.render(&sim.snapshot())?;

        if outcome == Outcome::Extinct {
            return Ok(Stop::Extinct);
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
