use super::formula::{BattleType, FormulaConfig, MetricKey};
use serde::{Deserialize, Serialize};

/// Summed metric values for one leaderboard group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTotals {
    pub leads: f64,
    pub payins: f64,
    pub sales: f64,
}

impl MetricTotals {
    pub fn get(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::Leads => self.leads,
            MetricKey::Payins => self.payins,
            MetricKey::Sales => self.sales,
        }
    }
}

/// Score one metric against its rule: linear in `actual / divisor`,
/// capped at `max_points`, never negative. Non-finite inputs and
/// non-positive divisors or actuals score zero.
pub fn score_metric(actual: f64, divisor: f64, max_points: f64) -> f64 {
    if !actual.is_finite() || !divisor.is_finite() || !max_points.is_finite() {
        return 0.0;
    }
    if divisor <= 0.0 || actual <= 0.0 {
        return 0.0;
    }

    (actual / divisor * max_points).min(max_points).max(0.0)
}

/// Total score for a group: metric rules applied in config order.
///
/// Pay-ins never contribute to depot battles regardless of the stored
/// config. An empty config yields zero.
pub fn score_total(battle_type: BattleType, totals: &MetricTotals, config: &FormulaConfig) -> f64 {
    config
        .metrics
        .iter()
        .filter(|rule| battle_type.counts_payins() || rule.key != MetricKey::Payins)
        .map(|rule| score_metric(totals.get(rule.key), rule.divisor, rule.max_points))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::formula::MetricRule;

    fn two_metric_config() -> FormulaConfig {
        FormulaConfig::new(vec![
            MetricRule {
                key: MetricKey::Leads,
                divisor: 100.0,
                max_points: 400.0,
            },
            MetricRule {
                key: MetricKey::Sales,
                divisor: 50_000.0,
                max_points: 600.0,
            },
        ])
    }

    #[test]
    fn scores_linearly_below_the_cap() {
        let totals = MetricTotals {
            leads: 50.0,
            payins: 0.0,
            sales: 25_000.0,
        };
        let total = score_total(BattleType::Leaders, &totals, &two_metric_config());
        assert_eq!(total, 200.0 + 300.0);
    }

    #[test]
    fn caps_each_metric_at_its_max_points() {
        let totals = MetricTotals {
            leads: 500.0,
            payins: 0.0,
            sales: 100_000.0,
        };
        let total = score_total(BattleType::Leaders, &totals, &two_metric_config());
        assert_eq!(total, 400.0 + 600.0);
    }

    #[test]
    fn never_exceeds_max_points_or_goes_negative() {
        for actual in [0.0, 0.5, 1.0, 99.0, 1e9] {
            let score = score_metric(actual, 37.0, 250.0);
            assert!(score >= 0.0, "negative score for actual={actual}");
            assert!(score <= 250.0, "uncapped score for actual={actual}");
        }
    }

    #[test]
    fn zero_for_degenerate_inputs() {
        assert_eq!(score_metric(10.0, 0.0, 100.0), 0.0);
        assert_eq!(score_metric(10.0, -5.0, 100.0), 0.0);
        assert_eq!(score_metric(0.0, 10.0, 100.0), 0.0);
        assert_eq!(score_metric(-3.0, 10.0, 100.0), 0.0);
        assert_eq!(score_metric(f64::NAN, 10.0, 100.0), 0.0);
        assert_eq!(score_metric(10.0, f64::INFINITY, 100.0), 0.0);
        assert_eq!(score_metric(10.0, 5.0, f64::NAN), 0.0);
    }

    #[test]
    fn depot_battles_ignore_payins() {
        let config = FormulaConfig::new(vec![
            MetricRule {
                key: MetricKey::Leads,
                divisor: 100.0,
                max_points: 400.0,
            },
            MetricRule {
                key: MetricKey::Payins,
                divisor: 1_000.0,
                max_points: 300.0,
            },
            MetricRule {
                key: MetricKey::Sales,
                divisor: 50_000.0,
                max_points: 300.0,
            },
        ]);
        let totals = MetricTotals {
            leads: 10.0,
            payins: 1_000.0,
            sales: 5.0,
        };

        let with_payins_rule = score_total(BattleType::Depots, &totals, &config);

        let mut stripped = config.clone();
        stripped.metrics.retain(|rule| rule.key != MetricKey::Payins);
        let without_payins_rule = score_total(BattleType::Depots, &totals, &stripped);

        assert_eq!(with_payins_rule, without_payins_rule);
        assert!(score_total(BattleType::Leaders, &totals, &config) > with_payins_rule);
    }

    #[test]
    fn empty_config_scores_zero() {
        let totals = MetricTotals {
            leads: 100.0,
            payins: 100.0,
            sales: 100.0,
        };
        assert_eq!(
            score_total(BattleType::Leaders, &totals, &FormulaConfig::default()),
            0.0
        );
    }
}
