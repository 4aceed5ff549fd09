use std::collections::BTreeMap;

use crate::error::{GrowthError, Result};
use crate::panel::{EntitySeries, Panel};

/// Splits a panel into one ascending-year series per entity.
pub fn extract_series(panel: &Panel) -> Result<BTreeMap<String, EntitySeries>> {
    let first_year = panel.first_year();
    let mut out = BTreeMap::new();
    for row in panel.rows() {
        let series = EntitySeries::new(row.entity.clone(), first_year, row.values.clone())?;
        if out.insert(row.entity.clone(), series).is_some() {
            return Err(GrowthError::malformed(format!(
                "entity '{}' appears more than once",
                row.entity
            )));
        }
    }
    Ok(out)
}
