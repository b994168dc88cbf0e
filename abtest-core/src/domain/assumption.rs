use serde::{Deserialize, Serialize};

/// Which precondition an [`AssumptionResult`] speaks about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssumptionCheck {
    Normality { label: String },
    VarianceHomogeneity,
}

impl AssumptionCheck {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normality { .. } => "Shapiro-Wilk",
            Self::VarianceHomogeneity => "Levene",
        }
    }
}

impl std::fmt::Display for AssumptionCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normality { label } => write!(f, "normality ({})", label),
            Self::VarianceHomogeneity => write!(f, "variance homogeneity"),
        }
    }
}

/// Outcome of a single assumption check.
///
/// The null hypothesis of every check is that the assumption holds, so
/// `holds` is true when the p-value does not fall below alpha.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssumptionResult {
    pub check: AssumptionCheck,
    pub statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub holds: bool,
}

impl AssumptionResult {
    pub fn new(check: AssumptionCheck, statistic: f64, p_value: f64, alpha: f64) -> Self {
        Self {
            check,
            statistic,
            p_value,
            alpha,
            holds: p_value >= alpha,
        }
    }
}
