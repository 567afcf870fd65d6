use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Every published formula distributes exactly this many points across
/// its metric rules.
pub const TOTAL_MAX_POINTS: f64 = 1000.0;

/// The competition dimension being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleType {
    Leaders,
    Depots,
    Companies,
}

impl BattleType {
    pub const fn ordered() -> [Self; 3] {
        [Self::Leaders, Self::Depots, Self::Companies]
    }

    /// Lenient view-key normalization: unrecognized input falls back to
    /// the leaders battle, matching the dashboards' behavior.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "depot" | "depots" => Self::Depots,
            "company" | "companies" => Self::Companies,
            _ => Self::Leaders,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leaders => "leaders",
            Self::Depots => "depots",
            Self::Companies => "companies",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Leaders => "Leaders",
            Self::Depots => "Depots",
            Self::Companies => "Companies",
        }
    }

    /// Depot battles never score pay-ins. This is a fixed domain rule,
    /// not a per-formula choice.
    pub const fn counts_payins(self) -> bool {
        !matches!(self, Self::Depots)
    }

    pub fn allowed_metrics(self) -> &'static [MetricKey] {
        match self {
            Self::Depots => &[MetricKey::Leads, MetricKey::Sales],
            _ => &[MetricKey::Leads, MetricKey::Payins, MetricKey::Sales],
        }
    }
}

/// One of the three daily performance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKey {
    Leads,
    Payins,
    Sales,
}

impl MetricKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "leads" => Some(Self::Leads),
            "payins" => Some(Self::Payins),
            "sales" => Some(Self::Sales),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Leads => "Leads",
            Self::Payins => "Pay-ins",
            Self::Sales => "Sales",
        }
    }
}

impl<'de> Deserialize<'de> for MetricKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| D::Error::custom(format!("unknown metric key '{raw}'")))
    }
}

/// Linear scoring curve for one metric: `actual / divisor * max_points`,
/// capped at `max_points`.
///
/// The serde aliases absorb the field spellings found in stored formula
/// configs, so downstream code only ever sees the canonical shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRule {
    #[serde(alias = "metric", alias = "name")]
    pub key: MetricKey,
    #[serde(default, alias = "division")]
    pub divisor: f64,
    #[serde(
        default,
        rename = "maxPoints",
        alias = "max_points",
        alias = "points"
    )]
    pub max_points: f64,
}

/// Ordered metric rules of an active formula. An empty config is valid
/// and scores everything as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormulaConfig {
    #[serde(default)]
    pub metrics: Vec<MetricRule>,
}

impl FormulaConfig {
    pub fn new(metrics: Vec<MetricRule>) -> Self {
        Self { metrics }
    }

    pub fn total_max_points(&self) -> f64 {
        self.metrics.iter().map(|rule| rule.max_points).sum()
    }

    /// Edit/publish gate: point budget must sum to exactly 1000, keys
    /// must be unique and allowed for the battle type. Divisors are not
    /// range-checked; the engine scores a non-positive divisor as zero.
    pub fn validate(&self, battle_type: BattleType) -> Result<(), FormulaConfigError> {
        let mut seen: Vec<MetricKey> = Vec::with_capacity(self.metrics.len());
        for rule in &self.metrics {
            if seen.contains(&rule.key) {
                return Err(FormulaConfigError::DuplicateMetric { key: rule.key });
            }
            if !battle_type.allowed_metrics().contains(&rule.key) {
                return Err(FormulaConfigError::MetricNotAllowed {
                    key: rule.key,
                    battle_type,
                });
            }
            seen.push(rule.key);
        }

        let total = self.total_max_points();
        if (total - TOTAL_MAX_POINTS).abs() > 1e-9 {
            return Err(FormulaConfigError::PointBudgetMismatch { total });
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FormulaConfigError {
    #[error("metric point budget must total {TOTAL_MAX_POINTS}, got {total}")]
    PointBudgetMismatch { total: f64 },
    #[error("metric '{}' appears more than once", .key.label())]
    DuplicateMetric { key: MetricKey },
    #[error("metric '{}' is not scored in {} battles", .key.label(), .battle_type.as_str())]
    MetricNotAllowed {
        key: MetricKey,
        battle_type: BattleType,
    },
}
