use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use tower_planner::{BlockSet, TowerGenParams, build_tower, load_params_from_path};

#[derive(Parser, Debug)]
#[command(name = "towerstack", version, about = "Plan randomized block towers and print them as JSON")]
struct Args {
    /// TOML tower config; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed of the first tower
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Number of towers, seeded `seed`, `seed + 1`, ...
    #[arg(short = 'n', long, default_value_t = 1)]
    towers: u64,

    /// Pretty-print each tower instead of one JSON line per tower
    #[arg(long)]
    pretty: bool,

    /// Also write debug-level logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum TowerReport {
    Built { seed: u64, blocks: BlockSet },
    Failed { seed: u64, error: String },
}

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match log_file {
        Some(path) => CombinedLogger::init(vec![
            TermLogger::new(
                LevelFilter::Info,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            ),
            WriteLogger::new(LevelFilter::Debug, Config::default(), File::create(path)?),
        ])?,
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init()?,
    }
    Ok(())
}

fn run_tower(params: &TowerGenParams, seed: u64) -> TowerReport {
    match build_tower(params, seed) {
        Ok(blocks) => TowerReport::Built { seed, blocks },
        Err(e) => {
            log::warn!("tower {seed} failed: {e}");
            TowerReport::Failed {
                seed,
                error: e.to_string(),
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let params = match &args.config {
        Some(path) => {
            log::info!("loading tower config from {}", path.display());
            load_params_from_path(path)?
        }
        None => TowerGenParams::default(),
    };

    let end = args.seed.saturating_add(args.towers);
    let reports: Vec<TowerReport> = (args.seed..end)
        .into_par_iter()
        .map(|seed| run_tower(&params, seed))
        .collect();

    let failed = reports
        .iter()
        .filter(|r| matches!(r, TowerReport::Failed { .. }))
        .count();
    for report in &reports {
        let line = if args.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        println!("{line}");
    }
    log::info!("{} tower(s) built, {failed} failed", reports.len() - failed);
    Ok(())
}
