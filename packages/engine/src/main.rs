// packages/engine/src/main.rs
//! Wa-Tor Simulation Engine
//!
//! Loads configuration, runs the fork-join simulation for the configured
//! number of chronons (or until Ctrl+C when the limit is 0) and prints the
//! timing report.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};
use wator_engine::observability::{init_metrics, init_tracing};
use wator_engine::render::AnsiRenderer;
use wator_engine::{BuildInfo, EngineConfig, Exporter, Simulation};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize observability (tracing, metrics)
    init_tracing()?;
    let metrics = init_metrics()?;

    let build = BuildInfo::current();
    info!(
        "Starting Wa-Tor engine v{} ({})",
        build.version, build.git_hash
    );

    // Load configuration; invalid values stop here before any chronon runs
    let config = EngineConfig::load().context("loading configuration")?;
    info!("Configuration loaded: {:?}", config);

    let mut sim = Simulation::new(config.simulation.clone())?;

    let renderer = if config.render.enabled {
        let frames = sim.subscribe(config.render.channel_capacity);
        let delay = Duration::from_millis(config.render.frame_delay_ms);
        Some(AnsiRenderer::spawn(frames, delay).context("starting renderer")?)
    } else {
        None
    };

    // Ctrl+C stops the run after the current chronon joins
    let stop = sim.stop_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal, finishing current chronon...");
                stop.stop();
            }
            Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
        }
    });

    // The simulation owns its worker threads; keep it off the async runtime
    let report = tokio::task::spawn_blocking(move || sim.run())
        .await
        .context("simulation thread failed")?;

    if let Some(renderer) = renderer {
        let frames = renderer.join();
        info!("Renderer drew {} frames", frames);
    }

    println!("{}", Exporter::new(config.report.format).export(&report)?);

    if config.report.prometheus {
        println!("{}", metrics.render());
    }

    Ok(())
}
