//! Lookback Selector Binary
//!
//! Reads the configured IS/OOS trade tables, runs the enabled report
//! stages and writes selections and JSON tearsheets below the run directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin lookback-selector -- --config report_config.yaml
//! cargo run --bin lookback-selector -- --stage combine
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: the configured level)
//! - Any variable referenced as `${VAR}` or `${VAR:-default}` in the config

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lookback_selector::config::{DEFAULT_CONFIG_PATH, load_config};
use lookback_selector::metrics::SharpeScorer;
use lookback_selector::pipeline::{InputTables, Stage, run};
use lookback_selector::report::JsonReportRenderer;
use lookback_selector::telemetry::init_tracing;

/// Select the best lookback period per market and render its returns.
#[derive(Debug, Parser)]
#[command(name = "lookback-selector", version, about)]
struct Cli {
    /// Path to the YAML configuration.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Run only this stage, even if the configuration disables it.
    #[arg(short, long, value_enum)]
    stage: Option<Stage>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    load_dotenv();

    let config = load_config(Some(&cli.config))
        .with_context(|| format!("loading {}", cli.config.display()))?;
    init_tracing(&config.observability.logging);

    tracing::info!(
        config = %cli.config.display(),
        stage = ?cli.stage,
        "Starting lookback selector"
    );

    let tables = InputTables::load(&config.core).context("loading trade tables")?;
    let renderer = JsonReportRenderer::new(SharpeScorer::new(config.report.sharpe));

    let summary = run(&config, &tables, &renderer, cli.stage).context("report run failed")?;

    if let Some(selection) = &summary.selection {
        for (market, choice) in selection.iter() {
            tracing::info!(
                market = %market,
                lookback_period = choice.lookback_period,
                sharpe = ?choice.sharpe,
                "Best lookback"
            );
        }
    }
    Ok(())
}

/// Load `.env` from the working directory or the closest ancestor that has one.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}
