use std::collections::BTreeMap;

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::io::panel_reader;
use crate::pipeline::Stage;
use crate::summary::check_same_keys;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        ctx.config.validate()?;
        let entity_column = ctx.config.entity_column.clone();

        for state in ctx.indicators_mut() {
            if state.panel.is_some() {
                continue;
            }
            let Some(path) = state.input.as_ref() else {
                bail!("no input for {}", state.indicator.name());
            };
            let panel = panel_reader::read_panel(path, &entity_column)?;
            info!(
                indicator = state.indicator.name(),
                input = %path.display(),
                "panel_loaded"
            );
            state.panel = Some(panel);
        }

        let (Some(gdp), Some(population)) = (&ctx.gdp.panel, &ctx.population.panel) else {
            bail!("panels missing after input stage");
        };

        // Both indicators must describe the same entities; nothing is intersected silently.
        let gdp_keys: BTreeMap<String, ()> = gdp.entities().map(|e| (e.to_string(), ())).collect();
        let population_keys: BTreeMap<String, ()> = population
            .entities()
            .map(|e| (e.to_string(), ()))
            .collect();
        check_same_keys(&gdp_keys, &population_keys)?;

        if gdp.years() != population.years() {
            let msg = format!(
                "year ranges differ: gdp_per_capita {}-{}, population {}-{}",
                gdp.first_year(),
                gdp.last_year(),
                population.first_year(),
                population.last_year()
            );
            warn!(%msg, "panel_years_differ");
            ctx.warnings.push(msg);
        }

        for state in ctx.indicators() {
            if let Some(panel) = &state.panel {
                info!(
                    indicator = state.indicator.name(),
                    entities = panel.len(),
                    first_year = panel.first_year(),
                    last_year = panel.last_year(),
                    "panel_ready"
                );
            }
        }
        Ok(())
    }
}
