use crate::error::{GrowthError, Result};

/// One entity's observations over consecutive years.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySeries {
    entity: String,
    first_year: i32,
    values: Vec<f64>,
}

impl EntitySeries {
    pub fn new(entity: impl Into<String>, first_year: i32, values: Vec<f64>) -> Result<Self> {
        let entity = entity.into();
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(GrowthError::malformed(format!(
                "series '{}' has a non-finite value in {}",
                entity,
                first_year + pos as i32
            )));
        }
        Ok(Self {
            entity,
            first_year,
            values,
        })
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    /// Last observed year; equals `first_year - 1` for an empty series.
    pub fn last_year(&self) -> i32 {
        self.first_year + self.values.len() as i32 - 1
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (self.first_year + i as i32, v))
    }
}
