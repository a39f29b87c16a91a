// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! `sweep`: generate grid paths and loops from the command line.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sweep_loops::geometry::Parity;
use sweep_loops::samplers::{self, batch, exhaustive};
use sweep_loops::state::SweepingMetrics;
use sweep_loops::{
    BacktrackPolicy, RowConstraint, SamplerConfig, SweepMatrices, SweepRequest, TableCache,
};

#[derive(Parser)]
#[command(author, version, about = "Row-sweep generator of grid paths and loops", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sample a path from the bottom row to the top row
    Path {
        #[command(flatten)]
        grid: GridArgs,
        /// Start column in the bottom row (random when absent)
        #[arg(long)]
        start: Option<usize>,
        /// End column in the top row (random when absent)
        #[arg(long)]
        end: Option<usize>,
        /// Forbid single-cell rows beside the endpoint columns
        #[arg(long)]
        no_corridor: bool,
        #[command(flatten)]
        sampling: SamplingArgs,
    },
    /// Sample a loop touching every row
    Loop {
        #[command(flatten)]
        grid: GridArgs,
        #[command(flatten)]
        sampling: SamplingArgs,
    },
    /// Count every path or loop of a small grid
    Count {
        #[command(flatten)]
        grid: GridArgs,
        /// Count paths between these columns instead of loops
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        path: Option<Vec<usize>>,
        /// Print the first N sweeps found
        #[arg(long, default_value_t = 0)]
        show: usize,
    },
    /// Build one transition table and report its size
    Table {
        #[arg(short, long)]
        width: usize,
        /// Build the odd (path) table instead of the even (loop) one
        #[arg(long)]
        odd: bool,
    },
}

#[derive(Args)]
struct GridArgs {
    #[arg(short, long)]
    width: usize,
    #[arg(short = 'H', long)]
    height: usize,
    /// Largest nesting distance allowed between the two ends of a strand
    #[arg(long)]
    max_nested: Option<usize>,
}

#[derive(Args)]
struct SamplingArgs {
    /// Seed for the random number generator
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// Backtracking on dead ends: restart-sweep or unwind-row
    #[arg(long)]
    policy: Option<BacktrackPolicy>,
    /// Sample this many sweeps in parallel, seeds counting up from --seed
    #[arg(long)]
    samples: Option<usize>,
}

impl GridArgs {
    fn apply(&self, request: SweepRequest) -> SweepRequest {
        match self.max_nested {
            Some(max_nested) => request.with_max_nested(max_nested),
            None => request,
        }
    }
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let cli = Cli::parse();
    let cache = TableCache::global();

    match cli.command {
        Command::Path {
            grid,
            start,
            end,
            no_corridor,
            sampling,
        } => {
            let mut request = grid.apply(SweepRequest::path(grid.width, grid.height));
            match (start, end) {
                (Some(start), Some(end)) => request = request.with_columns(start, end),
                (None, None) => {}
                _ => bail!("--start and --end must be given together"),
            }
            if no_corridor {
                let columns: Vec<usize> = start.into_iter().chain(end).collect();
                if columns.is_empty() {
                    warn!("--no-corridor needs --start and --end; ignoring it");
                } else {
                    request = request.with_constraint(RowConstraint::no_corridor_beside(&columns));
                }
            }
            run_sampler(&request, &sampling, cache)
        }
        Command::Loop { grid, sampling } => {
            let request = grid.apply(SweepRequest::looped(grid.width, grid.height));
            run_sampler(&request, &sampling, cache)
        }
        Command::Count { grid, path, show } => {
            let request = match path.as_deref() {
                Some(&[start, end]) => SweepRequest::path(grid.width, grid.height).with_columns(start, end),
                Some(_) => bail!("--path takes a start and an end column"),
                None => SweepRequest::looped(grid.width, grid.height),
            };
            let request = grid.apply(request);
            let result = exhaustive::enumerate(&request, cache, Some(show))
                .context("exhaustive enumeration failed")?;
            for (i, m) in result.solutions.iter().enumerate() {
                println!("#{}\n{}", i + 1, m);
            }
            println!("{} sweeps", result.count);
            println!(
                "rejections: {} ({:?})",
                result.statistics.total_rejections(),
                result.statistics.rejections()
            );
            Ok(())
        }
        Command::Table { width, odd } => {
            let parity = if odd { Parity::Odd } else { Parity::Even };
            let table = cache
                .table(width, parity, None)
                .context("transition table construction failed")?;
            println!(
                "width {} {}: {} inflows, {} transitions",
                width,
                parity,
                table.len(),
                table.transition_count()
            );
            Ok(())
        }
    }
}

fn run_sampler(request: &SweepRequest, sampling: &SamplingArgs, cache: &TableCache) -> Result<()> {
    let mut config = SamplerConfig::from_env()?;
    if let Some(policy) = sampling.policy {
        config = config.with_policy(policy);
    }
    info!(
        "sampling {}x{} with seed {} ({})",
        request.width, request.height, sampling.seed, config.policy
    );

    if let Some(samples) = sampling.samples {
        let results = batch::sample_batch(request, samples, sampling.seed, &config, cache);
        for (i, result) in results.iter().enumerate() {
            match result {
                Ok(m) => print_sweep(&format!("seed {}", sampling.seed.wrapping_add(i as u64)), m),
                Err(e) => warn!("seed {}: {}", sampling.seed.wrapping_add(i as u64), e),
            }
        }
        return Ok(());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(sampling.seed);
    let mut metrics = SweepingMetrics::new();
    let m = samplers::sample_observed(request, &mut rng, &config, cache, &mut metrics)
        .context("no sweep found; try another seed or larger attempt ceilings")?;
    print_sweep(&format!("seed {}", sampling.seed), &m);
    println!("{}", metrics);
    Ok(())
}

fn print_sweep(label: &str, m: &SweepMatrices) {
    println!("{} ({} passages)\n{}", label, m.passage_count(), m);
}
