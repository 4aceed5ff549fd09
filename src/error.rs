use thiserror::Error;

pub type Result<T> = std::result::Result<T, GrowthError>;

/// Errors raised by the forecasting and growth core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrowthError {
    #[error("malformed panel: {reason}")]
    MalformedPanel { reason: String },

    #[error("insufficient history for '{entity}': need at least 2 observations, got {len}")]
    InsufficientHistory { entity: String, len: usize },

    #[error("insufficient window: need at least 2 values, got {len}")]
    InsufficientWindow { len: usize },

    #[error("non-positive value {value} at window position {index}")]
    NonPositiveValue { index: usize, value: f64 },

    #[error("entity sets differ: only in left {only_left:?}, only in right {only_right:?}")]
    EntityMismatch {
        only_left: Vec<String>,
        only_right: Vec<String>,
    },

    #[error("smoothing fit for '{entity}' did not converge after {iterations} iterations")]
    NonConvergence { entity: String, iterations: usize },

    #[error("'{entity}' has no value for year {year}")]
    MissingValue { entity: String, year: i32 },

    #[error("window {start}-{end} is outside panel years {first}-{last}")]
    WindowOutOfRange {
        start: i32,
        end: i32,
        first: i32,
        last: i32,
    },

    #[error("invalid setting '{name}': {reason}")]
    InvalidConfig { name: &'static str, reason: String },
}

impl GrowthError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPanel {
            reason: reason.into(),
        }
    }

    /// Errors confined to one entity. The aggregators record these and keep going;
    /// everything else aborts the run.
    pub fn is_entity_scoped(&self) -> bool {
        matches!(
            self,
            Self::InsufficientHistory { .. }
                | Self::NonPositiveValue { .. }
                | Self::NonConvergence { .. }
                | Self::MissingValue { .. }
        )
    }

    /// Short machine-readable tag used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedPanel { .. } => "malformed_panel",
            Self::InsufficientHistory { .. } => "insufficient_history",
            Self::InsufficientWindow { .. } => "insufficient_window",
            Self::NonPositiveValue { .. } => "non_positive_value",
            Self::EntityMismatch { .. } => "entity_mismatch",
            Self::NonConvergence { .. } => "non_convergence",
            Self::MissingValue { .. } => "missing_value",
            Self::WindowOutOfRange { .. } => "window_out_of_range",
            Self::InvalidConfig { .. } => "invalid_config",
        }
    }
}

/// An entity dropped from one output table, with the error that excluded it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedEntity {
    pub entity: String,
    pub reason: GrowthError,
}
