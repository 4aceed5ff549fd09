use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::ctx::Ctx;

pub fn write_summary_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let summary = ctx.summary.as_ref().context("summary missing")?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "entity\tgrowth_gdp\tgrowth_population\tgrowth_total")?;
    for row in &summary.rows {
        if !(row.growth_gdp.is_finite() && row.growth_population.is_finite()) {
            bail!("non-finite growth for '{}'", row.entity);
        }
        writeln!(
            w,
            "{}\t{:.6}\t{:.6}\t{:.6}",
            row.entity, row.growth_gdp, row.growth_population, row.growth_total
        )?;
    }
    w.flush()?;
    Ok(())
}
