use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{json_writer, tsv_writer};
use crate::pipeline::Stage;

pub struct Stage6Output;

impl Stage6Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Output {
    fn name(&self) -> &'static str {
        "stage6_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let report = json_writer::build_report(ctx)?;
        ctx.report = Some(report);

        if ctx.write_json {
            let summary = ctx.summary.as_ref().context("summary missing")?;
            json_writer::write_summary(&ctx.output.summary_json, summary)?;
            for state in ctx.indicators() {
                let batch = state
                    .forecast
                    .as_ref()
                    .with_context(|| format!("{} forecast missing", state.indicator.name()))?;
                json_writer::write_extended_panel(
                    &ctx.output.extended_json(state.indicator),
                    &batch.extended,
                    &ctx.config.entity_column,
                )?;
            }
            json_writer::write_report(&ctx.output.report_json, ctx)?;
        }
        if ctx.write_tsv {
            tsv_writer::write_summary_tsv(&ctx.output.summary_tsv, ctx)?;
        }

        info!("stage6_output_ready");
        Ok(())
    }
}
