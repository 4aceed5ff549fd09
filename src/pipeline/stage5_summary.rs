use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::{Ctx, Exclusion, Indicator};
use crate::pipeline::Stage;
use crate::summary::build_summary;

pub struct Stage5Summary;

impl Stage5Summary {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Summary {
    fn name(&self) -> &'static str {
        "stage5_summary"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let mut rates: BTreeMap<Indicator, BTreeMap<String, f64>> = BTreeMap::new();
        for state in ctx.indicators() {
            let growth = state
                .growth
                .as_ref()
                .with_context(|| format!("{} growth missing", state.indicator.name()))?;
            rates.insert(state.indicator, growth.rates());
        }

        // An entity excluded for either indicator has no composite score. Where it
        // still scored for the other indicator, that drop is recorded too.
        let dropped: BTreeSet<String> = ctx
            .exclusions
            .iter()
            .map(|e| e.excluded.entity.clone())
            .collect();
        let mut summary_exclusions = Vec::new();
        for (&indicator, indicator_rates) in rates.iter_mut() {
            indicator_rates.retain(|entity, _| {
                if !dropped.contains(entity) {
                    return true;
                }
                let cause = ctx
                    .exclusions
                    .iter()
                    .find(|e| e.excluded.entity == *entity && e.indicator != indicator);
                if let Some(cause) = cause {
                    warn!(
                        entity = %entity,
                        indicator = indicator.name(),
                        excluded_by = cause.indicator.name(),
                        "entity_dropped_from_summary"
                    );
                    summary_exclusions.push(Exclusion {
                        indicator,
                        stage: "summary",
                        excluded: cause.excluded.clone(),
                    });
                }
                false
            });
        }
        ctx.exclusions.extend(summary_exclusions);

        let empty = BTreeMap::new();
        let gdp_rates = rates.get(&Indicator::GdpPerCapita).unwrap_or(&empty);
        let population_rates = rates.get(&Indicator::Population).unwrap_or(&empty);
        let summary = build_summary(gdp_rates, population_rates)?;
        info!(
            entities = summary.len(),
            dropped = dropped.len(),
            "summary_ready"
        );
        ctx.summary = Some(summary);
        Ok(())
    }
}
