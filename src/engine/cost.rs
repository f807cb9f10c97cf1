// ==========================================
// 施工现场工时进度引擎 - 成本影响
// ==========================================
// 职责: 原始估算工时 vs (已耗工时 + 剩余工时) 的人工成本偏差
// ==========================================

use crate::domain::metrics::{CostImplications, OriginalEstimate};
use crate::domain::progress::ProductProgress;
use crate::engine::aggregation::ProgressAggregator;
use crate::engine::math::{clamp_finite, positive_or, safe_divide};

pub struct CostEstimator;

impl CostEstimator {
    /// 计算成本影响
    ///
    /// # 规则
    /// - 原始成本 = 原始估算工时 × 时薪
    /// - 预计成本 = (Σ实际工时 + 剩余工时) × 时薪
    /// - 偏差率 = 偏差 / 原始成本 × 100; 原始成本为 0 时偏差率为 0
    /// - 原始估算工时为 NaN/负数按 0 计; 所有输出截断为有限值
    ///
    /// # 参数
    /// - `hourly_rate`: 时薪, 非正时使用 `fallback_rate`
    pub fn calculate_cost_implications(
        original_estimate: &OriginalEstimate,
        current_progress: &[ProductProgress],
        hourly_rate: f64,
        fallback_rate: f64,
    ) -> CostImplications {
        let rate = positive_or(hourly_rate, fallback_rate);

        let spent_hours = current_progress
            .iter()
            .map(|p| p.actual_hours_spent)
            .filter(|h| h.is_finite())
            .fold(0.0, |acc, h| acc + h);
        let remaining_hours = ProgressAggregator::calculate_remaining_hours(current_progress);

        let estimate_hours = clamp_finite(original_estimate.total_hours, 0.0, f64::MAX);
        if estimate_hours != original_estimate.total_hours {
            tracing::warn!(
                total_hours = original_estimate.total_hours,
                used = estimate_hours,
                "原始估算工时越界, 已截断"
            );
        }

        let original_cost = clamp_finite(estimate_hours * rate, 0.0, f64::MAX);
        let projected_cost = clamp_finite((spent_hours + remaining_hours) * rate, 0.0, f64::MAX);
        let variance = projected_cost - original_cost;
        let variance_percentage = clamp_finite(
            safe_divide(variance, original_cost, 0.0) * 100.0,
            -f64::MAX,
            f64::MAX,
        );

        CostImplications {
            original_cost,
            projected_cost,
            variance,
            variance_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ProductStatus;
    use chrono::{TimeZone, Utc};

    fn product(total: f64, completed: f64, hours_per_unit: f64, actual: f64) -> ProductProgress {
        ProductProgress {
            id: "P".to_string(),
            job_id: "J".to_string(),
            product_type: "frame".to_string(),
            product_name: "Frame".to_string(),
            total_quantity: total,
            completed_units: completed,
            in_progress_units: 0.0,
            estimated_hours_per_unit: hours_per_unit,
            actual_hours_spent: actual,
            status: ProductStatus::InProgress,
            last_updated: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_over_budget_projection() {
        // 已耗 30h + 剩余 5×2=10h = 40h; 原估 32h
        let products = vec![product(10.0, 5.0, 2.0, 30.0)];
        let cost = CostEstimator::calculate_cost_implications(
            &OriginalEstimate { total_hours: 32.0 },
            &products,
            45.0,
            45.0,
        );
        assert_eq!(cost.original_cost, 1440.0);
        assert_eq!(cost.projected_cost, 1800.0);
        assert_eq!(cost.variance, 360.0);
        assert_eq!(cost.variance_percentage, 25.0);
    }

    #[test]
    fn test_zero_original_cost_has_zero_percentage() {
        let products = vec![product(10.0, 0.0, 1.0, 0.0)];
        let cost = CostEstimator::calculate_cost_implications(
            &OriginalEstimate { total_hours: 0.0 },
            &products,
            45.0,
            45.0,
        );
        assert_eq!(cost.original_cost, 0.0);
        assert_eq!(cost.projected_cost, 450.0);
        assert_eq!(cost.variance_percentage, 0.0);
    }

    #[test]
    fn test_non_positive_rate_uses_fallback() {
        let products = vec![product(4.0, 0.0, 1.0, 0.0)];
        let cost = CostEstimator::calculate_cost_implications(
            &OriginalEstimate { total_hours: 4.0 },
            &products,
            0.0,
            50.0,
        );
        assert_eq!(cost.original_cost, 200.0);
        assert_eq!(cost.variance, 0.0);
    }

    #[test]
    fn test_finished_job_costs_are_positive_zero() {
        let finished = vec![product(5.0, 5.0, 2.0, 0.0)];
        for products in [Vec::new(), finished] {
            let cost = CostEstimator::calculate_cost_implications(
                &OriginalEstimate { total_hours: 0.0 },
                &products,
                45.0,
                45.0,
            );
            assert!(!cost.projected_cost.is_sign_negative());
            assert!(!cost.variance.is_sign_negative());
            let json = serde_json::to_string(&cost).unwrap();
            assert!(!json.contains("-0.0"), "{json}");
        }
    }

    #[test]
    fn test_out_of_range_estimate_stays_finite() {
        let products = vec![product(10.0, 5.0, 2.0, 30.0)];

        let huge = CostEstimator::calculate_cost_implications(
            &OriginalEstimate { total_hours: f64::MAX },
            &products,
            45.0,
            45.0,
        );
        assert_eq!(huge.original_cost, f64::MAX);
        assert_eq!(huge.projected_cost, 1800.0);
        assert!(huge.variance.is_finite());
        assert!(huge.variance_percentage.is_finite());

        for bad in [f64::NAN, -20.0, f64::NEG_INFINITY] {
            let cost = CostEstimator::calculate_cost_implications(
                &OriginalEstimate { total_hours: bad },
                &products,
                45.0,
                45.0,
            );
            assert_eq!(cost.original_cost, 0.0);
            assert_eq!(cost.variance, 1800.0);
            assert_eq!(cost.variance_percentage, 0.0);
        }
    }
}
