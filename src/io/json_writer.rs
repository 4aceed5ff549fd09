use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::ctx::Ctx;
use crate::io::write_json;
use crate::panel::ExtendedPanel;
use crate::schema::v1::{
    ConfigMeta, ExcludedEntry, FittedParams, IndicatorReport, RankedEntity, RunReportV1,
    SummaryMeta,
};
use crate::summary::Summary;

pub fn build_report(ctx: &Ctx) -> Result<RunReportV1> {
    let config = ConfigMeta {
        horizon: ctx.config.horizon,
        window_start: ctx.config.window.start,
        window_end: ctx.config.window.end,
        damped: ctx.config.damped,
        max_iter: ctx.config.max_iter,
        entity_column: ctx.config.entity_column.clone(),
    };

    let mut indicators = Vec::with_capacity(2);
    for state in ctx.indicators() {
        let panel = state
            .panel
            .as_ref()
            .with_context(|| format!("{} panel missing", state.indicator.name()))?;
        let fitted = state
            .forecast
            .as_ref()
            .map(|batch| {
                batch
                    .params
                    .iter()
                    .map(|(entity, p)| FittedParams {
                        entity: entity.clone(),
                        alpha: p.alpha,
                        beta: p.beta,
                        phi: p.phi,
                        mse: p.mse,
                        iterations: p.iterations,
                    })
                    .collect()
            })
            .unwrap_or_default();
        let excluded = ctx
            .exclusions_for(state.indicator)
            .map(|e| ExcludedEntry {
                entity: e.excluded.entity.clone(),
                stage: e.stage.to_string(),
                kind: e.excluded.reason.kind().to_string(),
                message: e.excluded.reason.to_string(),
            })
            .collect();
        indicators.push(IndicatorReport {
            name: state.indicator.name().to_string(),
            entities: panel.len(),
            first_year: Some(panel.first_year()),
            history_end: Some(panel.last_year()),
            last_year: state.forecast.as_ref().map(|b| b.extended.last_year()),
            fitted,
            excluded,
        });
    }

    let summary = ctx.summary.as_ref().map(|s| SummaryMeta {
        entities: s.len(),
        ranking: s
            .ranked()
            .into_iter()
            .map(|r| RankedEntity {
                entity: r.entity.clone(),
                growth_total: r.growth_total,
            })
            .collect(),
        dropped: ctx
            .exclusions
            .iter()
            .map(|e| e.excluded.entity.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    });

    Ok(RunReportV1 {
        tool: env!("CARGO_PKG_NAME").to_string(),
        version: ctx.tool_version.clone(),
        schema_version: "v1".to_string(),
        config,
        indicators,
        summary,
        warnings: ctx.warnings.clone(),
    })
}

pub fn write_report(path: &Path, ctx: &Ctx) -> Result<()> {
    let report = match &ctx.report {
        Some(report) => report.clone(),
        None => build_report(ctx)?,
    };
    write_json(path, &report)
}

/// One record per entity: the entity column plus one key per year. Empty
/// cells are written as `null`.
pub fn extended_records(panel: &ExtendedPanel, entity_column: &str) -> Vec<Value> {
    let labels = panel.year_labels();
    panel
        .rows()
        .iter()
        .map(|row| {
            let mut record = Map::new();
            record.insert(entity_column.to_string(), Value::String(row.entity.clone()));
            for (label, cell) in labels.iter().zip(row.values.iter()) {
                let value = cell.map(Value::from).unwrap_or(Value::Null);
                record.insert(label.clone(), value);
            }
            Value::Object(record)
        })
        .collect()
}

pub fn write_extended_panel(path: &Path, panel: &ExtendedPanel, entity_column: &str) -> Result<()> {
    write_json(path, &extended_records(panel, entity_column))
}

pub fn write_summary(path: &Path, summary: &Summary) -> Result<()> {
    write_json(path, &summary.rows)
}
