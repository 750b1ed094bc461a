use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tourguide_core::app::{EngineConfig, TourGuideBuilder};
use tourguide_core::domain::User;
use tourguide_core::impls::{InMemoryUserRegistry, SimulatedLocationSource, SimulatedRewardOracle};
use tourguide_core::ports::{IdGenerator, SystemClock, UlidGenerator};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Track simulated users and award attraction points.
#[derive(Debug, Parser)]
#[command(name = "tourguide", version)]
struct Args {
    /// Number of users to register.
    #[arg(long, default_value_t = 100)]
    users: usize,

    /// Governor capacity shared by location fetches and oracle calls.
    #[arg(long, default_value_t = 100)]
    permits: usize,

    /// Reward matching distance in miles.
    #[arg(long, default_value_t = 10.0)]
    proximity_buffer: f64,

    /// Pause between tracking rounds.
    #[arg(long, default_value_t = 5)]
    interval_secs: u64,

    /// How long to track before shutting down (ctrl-c stops early).
    #[arg(long, default_value_t = 30)]
    run_secs: u64,

    /// Artificial latency of every oracle call.
    #[arg(long, default_value_t = 0)]
    oracle_latency_ms: u64,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    users: usize,
    visits: usize,
    rewards: usize,
    unscored: usize,
    total_points: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = EngineConfig {
        permits: args.permits,
        proximity_buffer_miles: args.proximity_buffer,
        tracking_interval: Duration::from_secs(args.interval_secs),
        ..EngineConfig::default()
    };

    let oracle = match args.oracle_latency_ms {
        0 => SimulatedRewardOracle::new(),
        ms => SimulatedRewardOracle::with_latency(Duration::from_millis(ms)),
    };

    let guide = TourGuideBuilder::new()
        .config(config)
        .location_source(Arc::new(SimulatedLocationSource::new()))
        .reward_oracle(Arc::new(oracle))
        .user_registry(Arc::new(InMemoryUserRegistry::new()))
        .start_tracking(false)
        .build()
        .await
        .context("failed to build tour guide")?;

    let ids = UlidGenerator::new(SystemClock);
    for i in 0..args.users {
        let name = format!("internalUser{i}");
        let email = format!("{name}@tourGuide.com");
        guide.add_user(Arc::new(User::new(ids.generate_user_id(), name, "000", email)));
    }
    info!(users = args.users, "users registered");

    guide.start_tracking();
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(args.run_secs)) => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            info!("interrupted");
        }
    }
    guide.shutdown().await;

    let users = guide.all_users();
    let rewards: Vec<_> = users.iter().flat_map(|u| u.user_rewards()).collect();
    let summary = RunSummary {
        users: users.len(),
        visits: users.iter().map(|u| u.visit_count()).sum(),
        rewards: rewards.len(),
        unscored: rewards.iter().filter(|r| !r.is_scored()).count(),
        total_points: users.iter().map(|u| u.total_reward_points()).sum(),
    };
    info!(?summary, "run finished");

    if let Some(first) = users.first() {
        let nearby = guide.nearby_attractions(first).await?;
        println!("{}", serde_json::to_string_pretty(&nearby)?);
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
