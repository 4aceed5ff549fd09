//! Typed entity × year tables.
//!
//! `RawPanel` is the untyped table handed over by the cleaning collaborator;
//! `Panel` is its validated numeric form; `ExtendedPanel` is a panel with
//! forecast columns appended, where a cell may be empty.

use std::collections::HashSet;

use crate::error::{GrowthError, Result};

mod extract;
mod series;

pub use extract::extract_series;
pub use series::EntitySeries;

/// Label prefix left behind by World Bank column names (`YR1990`).
const YEAR_LABEL_PREFIX: &str = "YR";

#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Number(f64),
    Text(String),
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub entity: String,
    pub cells: Vec<RawCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawPanel {
    pub entity_column: String,
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Parses a column label into a calendar year.
pub fn parse_year_label(label: &str) -> Result<i32> {
    let trimmed = label.trim();
    let digits = trimmed.strip_prefix(YEAR_LABEL_PREFIX).unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(GrowthError::malformed(format!(
            "column label '{}' is not a calendar year",
            label
        )));
    }
    digits
        .parse::<i32>()
        .map_err(|_| GrowthError::malformed(format!("column label '{}' is out of range", label)))
}

pub fn year_label(year: i32) -> String {
    year.to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub entity: String,
    pub values: Vec<f64>,
}

/// Validated wide table: unique entities, contiguous ascending years, finite cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    years: Vec<i32>,
    rows: Vec<PanelRow>,
}

impl Panel {
    pub fn new(years: Vec<i32>, rows: Vec<PanelRow>) -> Result<Self> {
        check_years(&years)?;
        check_entities(rows.iter().map(|r| r.entity.as_str()))?;
        for row in &rows {
            if row.values.len() != years.len() {
                return Err(GrowthError::malformed(format!(
                    "row '{}' has {} cells for {} year columns",
                    row.entity,
                    row.values.len(),
                    years.len()
                )));
            }
            if let Some(pos) = row.values.iter().position(|v| !v.is_finite()) {
                return Err(GrowthError::malformed(format!(
                    "row '{}' has a non-finite value in {}",
                    row.entity, years[pos]
                )));
            }
        }
        Ok(Self { years, rows })
    }

    /// Builds a panel from entity/values pairs over consecutive years starting at `first_year`.
    pub fn from_rows<I, S>(first_year: i32, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let rows: Vec<PanelRow> = rows
            .into_iter()
            .map(|(entity, values)| PanelRow {
                entity: entity.into(),
                values,
            })
            .collect();
        let width = rows.first().map(|r| r.values.len()).unwrap_or(0);
        let years = (0..width as i32).map(|i| first_year + i).collect();
        Self::new(years, rows)
    }

    /// Converts the collaborator's table. Columns are reordered by year; numeric
    /// strings are coerced; nulls and other text are rejected.
    pub fn from_raw(raw: &RawPanel) -> Result<Self> {
        let mut columns = Vec::with_capacity(raw.columns.len());
        for (idx, label) in raw.columns.iter().enumerate() {
            columns.push((parse_year_label(label)?, idx));
        }
        columns.sort_by_key(|&(year, _)| year);
        let years: Vec<i32> = columns.iter().map(|&(year, _)| year).collect();
        check_years(&years)?;

        let mut rows = Vec::with_capacity(raw.rows.len());
        for row in &raw.rows {
            if row.cells.len() != raw.columns.len() {
                return Err(GrowthError::malformed(format!(
                    "row '{}' has {} cells for {} columns",
                    row.entity,
                    row.cells.len(),
                    raw.columns.len()
                )));
            }
            let mut values = Vec::with_capacity(years.len());
            for &(year, idx) in &columns {
                values.push(coerce_cell(&row.entity, year, &row.cells[idx])?);
            }
            rows.push(PanelRow {
                entity: row.entity.clone(),
                values,
            });
        }
        Self::new(years, rows)
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn first_year(&self) -> i32 {
        self.years[0]
    }

    pub fn last_year(&self) -> i32 {
        self.years[self.years.len() - 1]
    }

    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.entity.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn coerce_cell(entity: &str, year: i32, cell: &RawCell) -> Result<f64> {
    let value = match cell {
        RawCell::Number(v) => *v,
        RawCell::Text(s) => s.trim().parse::<f64>().map_err(|_| {
            GrowthError::malformed(format!(
                "row '{}' has non-numeric cell '{}' in {}",
                entity, s, year
            ))
        })?,
        RawCell::Missing => {
            return Err(GrowthError::malformed(format!(
                "row '{}' has a missing cell in {}",
                entity, year
            )));
        }
    };
    if !value.is_finite() {
        return Err(GrowthError::malformed(format!(
            "row '{}' has a non-finite value in {}",
            entity, year
        )));
    }
    Ok(value)
}

fn check_years(years: &[i32]) -> Result<()> {
    if years.is_empty() {
        return Err(GrowthError::malformed("panel has no year columns"));
    }
    for pair in years.windows(2) {
        if pair[1] == pair[0] {
            return Err(GrowthError::malformed(format!(
                "year {} is labeled more than once",
                pair[0]
            )));
        }
        if pair[1] < pair[0] {
            return Err(GrowthError::malformed(format!(
                "year columns are not ascending ({} after {})",
                pair[1], pair[0]
            )));
        }
        if pair[1] != pair[0] + 1 {
            return Err(GrowthError::malformed(format!(
                "year columns have a gap between {} and {}",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

fn check_entities<'a>(entities: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for entity in entities {
        if entity.trim().is_empty() {
            return Err(GrowthError::malformed("empty entity id"));
        }
        if !seen.insert(entity) {
            return Err(GrowthError::malformed(format!(
                "entity '{}' appears more than once",
                entity
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedRow {
    pub entity: String,
    pub values: Vec<Option<f64>>,
}

/// Historical columns followed by forecast columns. Forecast cells of entities
/// whose fit failed stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedPanel {
    years: Vec<i32>,
    history_end: i32,
    rows: Vec<ExtendedRow>,
}

impl ExtendedPanel {
    pub fn new(years: Vec<i32>, history_end: i32, rows: Vec<ExtendedRow>) -> Result<Self> {
        check_years(&years)?;
        if !years.contains(&history_end) {
            return Err(GrowthError::malformed(format!(
                "last historical year {} is not a column",
                history_end
            )));
        }
        check_entities(rows.iter().map(|r| r.entity.as_str()))?;
        for row in &rows {
            if row.values.len() != years.len() {
                return Err(GrowthError::malformed(format!(
                    "row '{}' has {} cells for {} year columns",
                    row.entity,
                    row.values.len(),
                    years.len()
                )));
            }
        }
        Ok(Self {
            years,
            history_end,
            rows,
        })
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn year_labels(&self) -> Vec<String> {
        self.years.iter().map(|&y| year_label(y)).collect()
    }

    pub fn first_year(&self) -> i32 {
        self.years[0]
    }

    pub fn last_year(&self) -> i32 {
        self.years[self.years.len() - 1]
    }

    pub fn history_end(&self) -> i32 {
        self.history_end
    }

    pub fn forecast_years(&self) -> &[i32] {
        let split = self.years.partition_point(|&y| y <= self.history_end);
        &self.years[split..]
    }

    pub fn rows(&self) -> &[ExtendedRow] {
        &self.rows
    }

    pub fn row(&self, entity: &str) -> Option<&ExtendedRow> {
        self.rows.iter().find(|r| r.entity == entity)
    }

    pub fn value(&self, entity: &str, year: i32) -> Option<f64> {
        let col = self.years.iter().position(|&y| y == year)?;
        self.row(entity).and_then(|r| r.values[col])
    }

    pub fn column_index(&self, year: i32) -> Option<usize> {
        if year < self.first_year() || year > self.last_year() {
            return None;
        }
        Some((year - self.first_year()) as usize)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
