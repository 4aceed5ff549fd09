use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub entity: String,
    pub growth_gdp: f64,
    pub growth_population: f64,
    pub growth_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, entity: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.entity == entity)
    }

    /// Rows by descending `growth_total`, ties by entity id.
    pub fn ranked(&self) -> Vec<&SummaryRow> {
        let mut rows: Vec<&SummaryRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| {
            b.growth_total
                .total_cmp(&a.growth_total)
                .then_with(|| a.entity.cmp(&b.entity))
        });
        rows
    }
}

/// Joins the two growth maps by entity key.
///
/// Both maps must hold exactly the same entities; rows come out ordered by id.
pub fn build_summary(
    gdp: &BTreeMap<String, f64>,
    population: &BTreeMap<String, f64>,
) -> Result<Summary> {
    check_same_keys(gdp, population)?;
    let rows = gdp
        .iter()
        .map(|(entity, &growth_gdp)| {
            let growth_population = population[entity];
            SummaryRow {
                entity: entity.clone(),
                growth_gdp,
                growth_population,
                growth_total: (growth_gdp + growth_population) / 2.0,
            }
        })
        .collect();
    Ok(Summary { rows })
}

pub fn check_same_keys<A, B>(left: &BTreeMap<String, A>, right: &BTreeMap<String, B>) -> Result<()> {
    let only_left: Vec<String> = left
        .keys()
        .filter(|k| !right.contains_key(*k))
        .cloned()
        .collect();
    let only_right: Vec<String> = right
        .keys()
        .filter(|k| !left.contains_key(*k))
        .cloned()
        .collect();
    if only_left.is_empty() && only_right.is_empty() {
        Ok(())
    } else {
        Err(GrowthError::EntityMismatch {
            only_left,
            only_right,
        })
    }
}
