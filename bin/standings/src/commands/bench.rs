//! Concurrent workload against one shared service.

use std::time::Instant;

use eyre::{Result, WrapErr, ensure};
use rand::Rng;
use rayon::prelude::*;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Serialize;
use standings_service::{LeaderboardService, LeaderboardStore, ParticipantId, ServiceError};
use tracing::info;

use crate::cli::LeaderboardArgs;

/// Arguments for the `bench` command.
#[derive(Debug, Clone, clap::Args)]
#[command(next_help_heading = "Workload")]
pub(crate) struct BenchArgs {
    #[command(flatten)]
    pub(crate) leaderboard: LeaderboardArgs,

    /// Worker threads (0 uses one per core).
    #[arg(long, default_value_t = 0)]
    pub(crate) threads: usize,

    /// Total operations across all workers.
    #[arg(long, default_value_t = 100_000)]
    pub(crate) ops: usize,

    /// Distinct participant identities.
    #[arg(long, default_value_t = 1_000)]
    pub(crate) participants: i64,

    /// Percentage of operations that are score updates; the rest are reads.
    #[arg(long, default_value_t = 70, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) write_percent: u8,
}

/// Summary printed on stdout when the run completes.
#[derive(Debug, Serialize)]
struct BenchReport {
    threads: usize,
    ops: usize,
    updates: usize,
    reads: usize,
    elapsed_ms: u128,
    ops_per_sec: f64,
    participants: usize,
    active: usize,
}

pub(crate) fn run(args: BenchArgs) -> Result<()> {
    ensure!(args.participants > 0, "--participants must be positive");
    let service = args.leaderboard.build()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .thread_name(|i| format!("bench-{i}"))
        .build()
        .wrap_err("Failed to build worker pool")?;
    let threads = pool.current_num_threads();
    info!(threads, ops = args.ops, participants = args.participants, "starting workload");

    let started = Instant::now();
    let updates = pool.install(|| workload(&service, &args))?;
    let elapsed = started.elapsed();

    verify(&service)?;

    let stats = service.stats();
    let ops_per_sec = args.ops as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
    info!(
        elapsed_ms = elapsed.as_millis(),
        ops_per_sec = ops_per_sec.round(),
        active = stats.active,
        "workload finished, ranking verified"
    );

    let report = BenchReport {
        threads,
        ops: args.ops,
        updates,
        reads: args.ops - updates,
        elapsed_ms: elapsed.as_millis(),
        ops_per_sec,
        participants: stats.participants,
        active: stats.active,
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

/// Run `args.ops` mixed operations on the current pool and return how many
/// were updates.
fn workload<S: LeaderboardStore>(
    service: &LeaderboardService<S>,
    args: &BenchArgs,
) -> Result<usize, ServiceError> {
    // Whole-number deltas inside the accepted bounds.
    let config = service.config();
    let low = config.min_delta.max(Decimal::from(-1000)).ceil().to_i64().unwrap_or(0);
    let high = config.max_delta.min(Decimal::from(1000)).floor().to_i64().unwrap_or(0);

    (0..args.ops)
        .into_par_iter()
        .map_init(rand::rng, |rng, _| -> Result<usize, ServiceError> {
            let identity: ParticipantId = rng.random_range(1..=args.participants);
            let roll = rng.random_range(0..100u8);
            if roll < args.write_percent {
                let delta = if low <= high {
                    rng.random_range(low..=high)
                } else {
                    0
                };
                service.update_score(identity, Decimal::from(delta))?;
                Ok(1)
            } else if roll % 2 == 0 {
                let start = rng.random_range(1..=50);
                service.get_range(start, start + 9);
                Ok(0)
            } else {
                service.get_with_neighbors(identity, 2, 2)?;
                Ok(0)
            }
        })
        .try_reduce(|| 0, |a, b| Ok(a + b))
}

/// Check that the final ranking is exactly the positive ledger scores in
/// rank order.
fn verify<S: LeaderboardStore>(service: &LeaderboardService<S>) -> Result<()> {
    let listing = service.get_range(1, i32::MAX);
    let stats = service.stats();
    ensure!(
        listing.len() == stats.active,
        "listing has {} rows for {} active participants",
        listing.len(),
        stats.active
    );

    for (pos, entry) in listing.iter().enumerate() {
        ensure!(entry.rank == pos + 1, "rank gap at {}", entry.rank);
        ensure!(entry.score > Decimal::ZERO, "non-positive score ranked: {entry:?}");
        ensure!(
            service.get_score(entry.identity) == Some(entry.score),
            "ranked score differs from ledger for {}",
            entry.identity
        );
    }
    for pair in listing.windows(2) {
        let [better, worse] = pair else { continue };
        ensure!(
            better.score > worse.score
                || (better.score == worse.score && better.identity < worse.identity),
            "out of order: {better:?} before {worse:?}"
        );
    }
    Ok(())
}
