use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ExcludedEntity, GrowthError};
use crate::forecast::{DEFAULT_HORIZON, DEFAULT_MAX_ITER, ForecastBatch, ForecastOptions};
use crate::growth::{WindowGrowth, YearWindow};
use crate::panel::{EntitySeries, Panel};
use crate::schema::v1::RunReportV1;
use crate::summary::Summary;

pub const DEFAULT_ENTITY_COLUMN: &str = "Country";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    GdpPerCapita,
    Population,
}

impl Indicator {
    pub const ALL: [Indicator; 2] = [Indicator::GdpPerCapita, Indicator::Population];

    pub fn name(&self) -> &'static str {
        match self {
            Self::GdpPerCapita => "gdp_per_capita",
            Self::Population => "population",
        }
    }

    pub fn extended_file_name(&self) -> String {
        format!("{}_extended.json", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub horizon: usize,
    pub window: YearWindow,
    pub damped: bool,
    /// Worker threads for per-entity fits (0 = rayon default).
    pub threads: usize,
    pub max_iter: usize,
    pub entity_column: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            window: YearWindow::default(),
            damped: true,
            threads: 0,
            max_iter: DEFAULT_MAX_ITER,
            entity_column: DEFAULT_ENTITY_COLUMN.to_string(),
        }
    }
}

impl RunConfig {
    pub fn forecast_options(&self) -> ForecastOptions {
        ForecastOptions {
            horizon: self.horizon,
            damped: self.damped,
            max_iter: self.max_iter,
        }
    }

    pub fn validate(&self) -> Result<(), GrowthError> {
        self.forecast_options().validate()?;
        self.window.validate()?;
        if self.entity_column.trim().is_empty() {
            return Err(GrowthError::InvalidConfig {
                name: "entity_column",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Per-indicator state threaded through the stages.
#[derive(Debug)]
pub struct IndicatorState {
    pub indicator: Indicator,
    pub input: Option<PathBuf>,
    pub panel: Option<Panel>,
    pub series: Option<BTreeMap<String, EntitySeries>>,
    pub forecast: Option<ForecastBatch>,
    pub growth: Option<WindowGrowth>,
}

impl IndicatorState {
    fn new(indicator: Indicator, input: Option<PathBuf>, panel: Option<Panel>) -> Self {
        Self {
            indicator,
            input,
            panel,
            series: None,
            forecast: None,
            growth: None,
        }
    }
}

/// An entity dropped by a stage for one indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub indicator: Indicator,
    pub stage: &'static str,
    pub excluded: ExcludedEntity,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub summary_json: PathBuf,
    pub summary_tsv: PathBuf,
    pub report_json: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            summary_json: out_dir.join("summary.json"),
            summary_tsv: out_dir.join("summary.tsv"),
            report_json: out_dir.join("run_report.json"),
            out_dir,
        }
    }

    pub fn extended_json(&self, indicator: Indicator) -> PathBuf {
        self.out_dir.join(indicator.extended_file_name())
    }
}

#[derive(Debug)]
pub struct Ctx {
    pub config: RunConfig,
    pub gdp: IndicatorState,
    pub population: IndicatorState,
    pub exclusions: Vec<Exclusion>,
    pub summary: Option<Summary>,
    pub write_json: bool,
    pub write_tsv: bool,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub tool_version: String,
    pub report: Option<RunReportV1>,
}

impl Ctx {
    pub fn new(
        gdp_input: PathBuf,
        population_input: PathBuf,
        out_dir: PathBuf,
        config: RunConfig,
        write_json: bool,
        write_tsv: bool,
        tool_version: &str,
    ) -> Self {
        Self {
            config,
            gdp: IndicatorState::new(Indicator::GdpPerCapita, Some(gdp_input), None),
            population: IndicatorState::new(Indicator::Population, Some(population_input), None),
            exclusions: Vec::new(),
            summary: None,
            write_json,
            write_tsv,
            warnings: Vec::new(),
            output: OutputPaths::new(out_dir),
            tool_version: tool_version.to_string(),
            report: None,
        }
    }

    /// In-memory run over already-cleaned panels; nothing is written.
    pub fn from_panels(gdp: Panel, population: Panel, config: RunConfig) -> Self {
        Self {
            config,
            gdp: IndicatorState::new(Indicator::GdpPerCapita, None, Some(gdp)),
            population: IndicatorState::new(Indicator::Population, None, Some(population)),
            exclusions: Vec::new(),
            summary: None,
            write_json: false,
            write_tsv: false,
            warnings: Vec::new(),
            output: OutputPaths::new(PathBuf::from(".")),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            report: None,
        }
    }

    pub fn indicator(&self, indicator: Indicator) -> &IndicatorState {
        match indicator {
            Indicator::GdpPerCapita => &self.gdp,
            Indicator::Population => &self.population,
        }
    }

    pub fn indicators(&self) -> [&IndicatorState; 2] {
        [&self.gdp, &self.population]
    }

    pub fn indicators_mut(&mut self) -> [&mut IndicatorState; 2] {
        [&mut self.gdp, &mut self.population]
    }

    pub fn writes_output(&self) -> bool {
        self.write_json || self.write_tsv
    }

    pub fn out_dir(&self) -> &Path {
        &self.output.out_dir
    }

    pub fn exclusions_for(&self, indicator: Indicator) -> impl Iterator<Item = &Exclusion> {
        self.exclusions
            .iter()
            .filter(move |e| e.indicator == indicator)
    }
}
