use anyhow::{Context, Result};

use crate::ctx::Ctx;

const TOP_N: usize = 5;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let summary = ctx.summary.as_ref().context("summary missing")?;
    let gdp = ctx.gdp.panel.as_ref().context("gdp panel missing")?;

    let mut out = String::new();
    out.push_str(&format!("panel-growth v{}\n", version));
    out.push_str(&format!(
        "Input: {} entities, years {}-{}\n",
        gdp.len(),
        gdp.first_year(),
        gdp.last_year()
    ));
    out.push_str(&format!(
        "Forecast: horizon={}, damped={}, window={}-{}\n",
        ctx.config.horizon, ctx.config.damped, ctx.config.window.start, ctx.config.window.end
    ));
    out.push_str(&format!("Scored: {}\n", summary.len()));

    for row in summary.ranked().into_iter().take(TOP_N) {
        out.push_str(&format!(
            "  {}: total {:+.2}% (gdp {:+.2}%, population {:+.2}%)\n",
            row.entity, row.growth_total, row.growth_gdp, row.growth_population
        ));
    }

    if ctx.exclusions.is_empty() {
        out.push_str("Excluded: none\n");
    } else {
        let names: Vec<String> = ctx
            .exclusions
            .iter()
            .map(|e| format!("{} ({})", e.excluded.entity, e.indicator.name()))
            .collect();
        out.push_str(&format!("Excluded: {}\n", names.join(", ")));
    }

    Ok(out)
}
