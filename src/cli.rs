use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::ctx::{DEFAULT_ENTITY_COLUMN, RunConfig};
use crate::forecast::{DEFAULT_HORIZON, DEFAULT_MAX_ITER};
use crate::growth::{DEFAULT_WINDOW_END, DEFAULT_WINDOW_START, YearWindow};

#[derive(Debug, Parser)]
#[command(
    name = "panel-growth",
    version,
    about = "Forecast indicator panels and score per-entity growth"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Forecast both panels and write the growth summary
    Run(RunArgs),
    /// Extend a single panel with forecasts
    Forecast(ForecastArgs),
    /// Check that both panels load and describe the same entities
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    #[arg(long, default_value_t = DEFAULT_HORIZON, help = "Years to forecast past the last observation")]
    pub horizon: usize,

    #[arg(long, default_value_t = false, help = "Use an undamped (Holt linear) trend")]
    pub no_damped: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_ITER, help = "Optimizer iteration cap per entity")]
    pub max_iter: usize,

    #[arg(long, default_value = DEFAULT_ENTITY_COLUMN, help = "Name of the entity column")]
    pub entity_column: String,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "GDP per capita panel (.json, .tsv or .csv, optionally .gz)")]
    pub gdp: PathBuf,

    #[arg(long, help = "Population panel (.json, .tsv or .csv, optionally .gz)")]
    pub population: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[command(flatten)]
    pub model: ModelArgs,

    #[arg(long, default_value_t = DEFAULT_WINDOW_START)]
    pub window_start: i32,

    #[arg(long, default_value_t = DEFAULT_WINDOW_END)]
    pub window_end: i32,

    #[arg(long, default_value_t = false, help = "Also write summary.tsv")]
    pub tsv: bool,
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, help = "Output JSON file for the extended panel")]
    pub out: PathBuf,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long)]
    pub gdp: PathBuf,

    #[arg(long)]
    pub population: PathBuf,

    #[arg(long, default_value = DEFAULT_ENTITY_COLUMN)]
    pub entity_column: String,
}

impl ModelArgs {
    pub fn to_config(&self, window: YearWindow) -> RunConfig {
        RunConfig {
            horizon: self.horizon,
            window,
            damped: !self.no_damped,
            threads: self.threads,
            max_iter: self.max_iter,
            entity_column: self.entity_column.clone(),
        }
    }
}

impl RunArgs {
    pub fn to_config(&self) -> RunConfig {
        self.model.to_config(YearWindow {
            start: self.window_start,
            end: self.window_end,
        })
    }
}
