//! Contention experiment for the ride matching core.
//!
//! Registers a seeded field of drivers, releases a wave of concurrent ride
//! requests through a barrier, and reports match metrics as JSON on stdout.
//!
//! ```bash
//! RUST_LOG=info cargo run -p match_experiments --release -- --drivers 100 --riders 500
//! ```

mod metrics;

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use match_core::drivers::{DriverRegistry, DriverService};
use match_core::lifecycle::{RideLifecycle, RideService};
use match_core::matching::NearestFirst;
use match_core::rides::RideRegistry;
use match_core::spatial::Location;

use crate::metrics::{Outcome, RunMetrics};

#[derive(Parser)]
#[command(
    name = "match_experiments",
    about = "Concurrent load experiment for the ride matching core"
)]
struct Cli {
    /// Number of drivers to register
    #[arg(long, default_value_t = 100)]
    drivers: usize,

    /// Number of concurrent ride requests (one worker thread each)
    #[arg(long, default_value_t = 200)]
    riders: usize,

    /// Side length of the square field drivers and pickups are placed on
    #[arg(long, default_value_t = 100.0)]
    field: f64,

    /// Complete each matched ride right after it is created
    #[arg(long, default_value_t = false)]
    complete: bool,

    /// RNG seed for driver and pickup placement
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let drivers = Arc::new(DriverRegistry::new());
    let rides = Arc::new(RideRegistry::new());
    let allocator = Arc::new(NearestFirst::new(drivers.clone()));
    let lifecycle = Arc::new(RideLifecycle::new(allocator, rides));

    let mut rng = StdRng::seed_from_u64(cli.seed);
    for i in 0..cli.drivers {
        let location = Location::new(rng.gen_range(0.0..cli.field), rng.gen_range(0.0..cli.field));
        drivers
            .register(&format!("driver-{i}"), location)
            .expect("generated driver ids are unique");
    }
    info!(drivers = cli.drivers, field = cli.field, "driver pool registered");

    let pickups: Vec<Location> = (0..cli.riders)
        .map(|_| Location::new(rng.gen_range(0.0..cli.field), rng.gen_range(0.0..cli.field)))
        .collect();

    let barrier = Arc::new(Barrier::new(cli.riders));
    let started = Instant::now();
    let handles: Vec<_> = pickups
        .into_iter()
        .enumerate()
        .map(|(i, pickup)| {
            let lifecycle = lifecycle.clone();
            let barrier = barrier.clone();
            let complete = cli.complete;
            thread::spawn(move || {
                barrier.wait();
                let request_started = Instant::now();
                let outcome = lifecycle.request_ride(&format!("rider-{i}"), pickup);
                let allocation_us = request_started.elapsed().as_micros() as u64;

                let mut completed = false;
                if let Ok(view) = &outcome {
                    if complete {
                        completed = lifecycle.complete_ride(&view.ride_id).is_ok();
                    }
                }
                Outcome {
                    matched: outcome.is_ok(),
                    completed,
                    allocation_us,
                }
            })
        })
        .collect();

    let outcomes: Vec<Outcome> = handles
        .into_iter()
        .map(|handle| handle.join().expect("rider thread should not panic"))
        .collect();
    let elapsed = started.elapsed();

    let metrics = RunMetrics::from_outcomes(cli.drivers, &outcomes, elapsed);
    info!(
        matched = metrics.matched,
        rejected = metrics.rejected,
        elapsed_ms = metrics.elapsed_ms,
        "experiment finished"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&metrics).expect("metrics serialize to JSON")
    );
}
