use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::panel::extract_series;
use crate::pipeline::Stage;

pub struct Stage2Extract;

impl Stage2Extract {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Extract {
    fn name(&self) -> &'static str {
        "stage2_extract"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let mut warnings = Vec::new();
        for state in ctx.indicators_mut() {
            let panel = state
                .panel
                .as_ref()
                .with_context(|| format!("{} panel missing", state.indicator.name()))?;
            let series = extract_series(panel)?;
            if panel.years().len() < 2 {
                warn!(
                    indicator = state.indicator.name(),
                    years = panel.years().len(),
                    "history too short to forecast"
                );
                warnings.push(format!(
                    "{} has a single year of history; every entity will be excluded",
                    state.indicator.name()
                ));
            }
            info!(
                indicator = state.indicator.name(),
                series = series.len(),
                "series_extracted"
            );
            state.series = Some(series);
        }
        ctx.warnings.extend(warnings);
        Ok(())
    }
}
