//! Application entry point for the decision-tree growth viewer.
//!
//! Parses the command line, sets up logging, and either opens the
//! eframe window (delegating all interaction to [`Viewer`]) or runs a
//! fixed number of ticks headlessly and prints the resulting tree.

mod surface;
mod viewer;

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use dtree_core::{config::Config, simulation::Simulation, tree::SplitOutcome};
use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(
    name = "dtree_viz",
    about = "Grows a decision tree on a synthetic 2-D point cloud, one split at a time"
)]
struct Cli {
    /// Seed for the point cloud; defaults to the system clock.
    #[arg(long)]
    seed: Option<u64>,
    /// Seconds between split attempts.
    #[arg(long, default_value_t = 2.0)]
    split_interval: f64,
    /// Seconds between scheduler ticks.
    #[arg(long, default_value_t = 0.1)]
    tick_interval: f64,
    /// Split attempts before the clock must be reset.
    #[arg(long, default_value_t = 100)]
    max_iterations: u32,
    /// Leaves at this depth are never split.
    #[arg(long, default_value_t = 4)]
    max_depth: u32,
    /// Minimum points a leaf needs to be split.
    #[arg(long, default_value_t = 10)]
    min_points: usize,
    /// Minimum Gini gain for a split to be applied.
    #[arg(long, default_value_t = 0.01)]
    min_gain: f32,
    /// Initial viewport width in pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    /// Initial viewport height in pixels.
    #[arg(long, default_value_t = 800.0)]
    height: f32,
    /// Run this many ticks without a window and print the tree.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u32>,
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            min_points_to_split: self.min_points,
            max_depth: self.max_depth,
            min_gain: self.min_gain,
            split_interval: self.split_interval,
            tick_interval: self.tick_interval,
            max_iterations: self.max_iterations,
            ..Config::default()
        }
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter '{level}'"))?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Runs `ticks` scheduler ticks at the configured period and returns the
/// final tree outline followed by a one-line summary.
fn run_headless(cfg: Config, viewport: Vec2, seed: u64, ticks: u32) -> Result<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sim =
        Simulation::new(viewport, cfg, &mut rng).context("failed to start simulation")?;

    let mut applied = 0usize;
    let mut rejected = 0usize;
    for t in 0..ticks {
        let report = sim.tick(f64::from(t) * cfg.tick_interval);
        match report.outcome {
            Some(SplitOutcome::Applied { .. }) => applied += 1,
            Some(SplitOutcome::Rejected(_)) => rejected += 1,
            None => {}
        }
    }

    let mut out = sim.tree().outline(sim.points());
    out.push_str(&format!(
        "points={} nodes={} leaves={} splits={} rejected={} state={:?} accuracy={:.3}\n",
        sim.points().len(),
        sim.tree().nodes.len(),
        sim.tree().leaf_count(),
        applied,
        rejected,
        sim.state(),
        sim.accuracy(),
    ));
    Ok(out)
}

fn run_window(cfg: Config, viewport: Vec2, seed: u64) -> Result<()> {
    let viewer = Viewer::new(cfg, viewport, seed).context("failed to start viewer")?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([viewport.x, viewport.y]),
        ..Default::default()
    };

    eframe::run_native(
        "Decision Tree Growth",
        options,
        Box::new(move |_cc| Ok(Box::new(viewer))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let cfg = cli.config();
    cfg.validate().context("invalid simulation parameters")?;
    let seed = cli.seed.unwrap_or_else(clock_seed);
    info!(seed, "seeded point cloud");

    match cli.headless {
        Some(ticks) => {
            print!("{}", run_headless(cfg, cli.viewport(), seed, ticks)?);
            Ok(())
        }
        None => run_window(cfg, cli.viewport(), seed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_defaults() {
        let cli = Cli::parse_from([
            "dtree_viz",
            "--seed",
            "7",
            "--max-depth",
            "3",
            "--min-gain",
            "0.05",
            "--headless",
            "50",
        ]);
        let cfg = cli.config();
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.headless, Some(50));
        assert_eq!(cfg.max_depth, 3);
        assert_eq!(cfg.min_gain, 0.05);
        assert_eq!(cfg.min_points_to_split, 10);
        assert_eq!(cfg.area_per_point, Config::default().area_per_point);
    }

    #[test]
    fn headless_run_is_reproducible_and_summarised() {
        let cfg = Config::default();
        let viewport = Vec2::new(800.0, 600.0);
        let a = run_headless(cfg, viewport, 3, 400).expect("runs");
        let b = run_headless(cfg, viewport, 3, 400).expect("runs");
        assert_eq!(a, b);

        assert!(a.starts_with("#0 "));
        let last = a.lines().last().expect("summary line");
        assert!(last.starts_with("points=120 "), "{last}");
    }

    #[test]
    fn headless_rejects_invalid_config() {
        let mut cfg = Config::default();
        cfg.tick_interval = 0.0;
        assert!(run_headless(cfg, Vec2::new(100.0, 100.0), 1, 10).is_err());
    }
}
