use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::{Ctx, Exclusion};
use crate::growth::growth_over_window;
use crate::pipeline::Stage;

pub struct Stage4Growth;

impl Stage4Growth {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Growth {
    fn name(&self) -> &'static str {
        "stage4_growth"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let window = ctx.config.window;
        let mut exclusions = Vec::new();

        for state in ctx.indicators_mut() {
            let batch = state
                .forecast
                .as_ref()
                .with_context(|| format!("{} forecast missing", state.indicator.name()))?;
            let growth = growth_over_window(&batch.extended, window)?;
            // Entities whose forecast failed were already reported by the forecast stage.
            exclusions.extend(
                growth
                    .excluded
                    .iter()
                    .filter(|e| !batch.is_excluded(&e.entity))
                    .cloned()
                    .map(|excluded| Exclusion {
                        indicator: state.indicator,
                        stage: "growth",
                        excluded,
                    }),
            );
            info!(
                indicator = state.indicator.name(),
                estimated = growth.estimates.len(),
                "indicator_growth_ready"
            );
            state.growth = Some(growth);
        }

        ctx.exclusions.extend(exclusions);
        Ok(())
    }
}
