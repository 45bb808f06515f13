//! # lamplighterd — lamplighter daemon
//!
//! Composition root that wires the hardware adapters to the control loop.
//!
//! The daemon is simulation-only: it drives the virtual sensor and relay from
//! `lamplighter-adapter-virtual`. There is no PCF8591 ADC or GPIO relay
//! adapter, so it never touches real hardware.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Construct the clock, sensor and relay adapters
//! - Seed the jitter source
//! - Run the control loop until SIGINT/SIGTERM, leaving the lamp off
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no control logic belongs here.

mod config;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use lamplighter_adapter_virtual::{VirtualRelay, VirtualSensor};
use lamplighter_app::clock::SystemClock;
use lamplighter_app::control_loop::{ControlLoop, Ports};

use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let controller = config.controller()?;
    let daylight = config.daylight()?;

    // Jitter and sensor noise get independent streams from the same seed.
    let (jitter_rng, noise_rng) = match config.control.random_seed {
        Some(seed) => (
            StdRng::seed_from_u64(seed),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        ),
        None => (StdRng::from_entropy(), StdRng::from_entropy()),
    };

    // Adapters
    let clock = SystemClock::new(controller.timezone);
    let sensor = VirtualSensor::new(clock, daylight, config.simulation.noise, noise_rng);
    let relay = VirtualRelay::default();

    tracing::info!(
        timezone = %controller.timezone,
        on_time = %controller.schedule.on_time(),
        off_time = %controller.schedule.off_time(),
        seeded = config.control.random_seed.is_some(),
        "lamplighterd started"
    );

    let mut control = ControlLoop::new(
        Ports {
            clock,
            sensor,
            output: relay.clone(),
        },
        &controller,
        jitter_rng,
    );
    let result = control.run(shutdown_signal()).await;
    drop(control);

    tracing::info!(lamp_on = relay.is_on(), "lamplighterd stopped");
    result?;
    Ok(())
}

/// Resolves on the first SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
