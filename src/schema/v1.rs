use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMeta {
    pub horizon: usize,
    pub window_start: i32,
    pub window_end: i32,
    pub damped: bool,
    pub max_iter: usize,
    pub entity_column: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedParams {
    pub entity: String,
    pub alpha: f64,
    pub beta: f64,
    pub phi: f64,
    pub mse: f64,
    pub iterations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedEntry {
    pub entity: String,
    pub stage: String,
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorReport {
    pub name: String,
    pub entities: usize,
    pub first_year: Option<i32>,
    pub history_end: Option<i32>,
    pub last_year: Option<i32>,
    pub fitted: Vec<FittedParams>,
    pub excluded: Vec<ExcludedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntity {
    pub entity: String,
    pub growth_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMeta {
    pub entities: usize,
    pub ranking: Vec<RankedEntity>,
    /// Entities without a composite score, in id order.
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReportV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub config: ConfigMeta,
    pub indicators: Vec<IndicatorReport>,
    pub summary: Option<SummaryMeta>,
    pub warnings: Vec<String>,
}
