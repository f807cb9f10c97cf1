// ==========================================
// 施工现场工时进度引擎 - 进度聚合
// ==========================================
// 职责: 把产品进度列表归约为标量指标 (剩余工时/效率/燃烧率)
// 红线: 无状态、无副作用、对越界输入截断而不报错
// ==========================================

use crate::domain::progress::{DailyProgressSummary, ProductProgress};
use crate::engine::math::{clamp_finite, safe_divide};

/// 无任何完工或工时记录时的效率 (视为按计划)
pub const NEUTRAL_EFFICIENCY: f64 = 100.0;

// ==========================================
// ProgressAggregator - 纯函数工具类
// ==========================================
pub struct ProgressAggregator;

impl ProgressAggregator {
    /// 计算剩余工时
    ///
    /// # 规则
    /// - 单品剩余数量 = max(0, total - completed)
    /// - 单品贡献 = 剩余数量 × 单件工时 (负数/非有限工时贡献 0)
    /// - 空列表 → +0.0 (从 0.0 起折叠, 空迭代器 `sum` 会得到 -0.0)
    pub fn calculate_remaining_hours(products: &[ProductProgress]) -> f64 {
        products
            .iter()
            .map(|p| p.remaining_hours())
            .filter(|h| h.is_finite() && *h > 0.0)
            .fold(0.0, |acc, h| acc + h)
    }

    /// 计算效率 (%)
    ///
    /// # 规则
    /// - 计划工时 = Σ completed × 单件工时; 实际工时 = Σ actual_hours_spent
    /// - 实际工时为 0 或完工总数为 0 → 100
    /// - 否则 计划/实际 × 100, 截断到 [0, ceiling]
    pub fn calculate_efficiency(products: &[ProductProgress], ceiling: f64) -> f64 {
        let planned_hours: f64 = products.iter().map(|p| p.earned_hours()).sum();
        let actual_hours: f64 = products.iter().map(|p| p.actual_hours_spent).sum();
        let completed_units: f64 = products.iter().map(|p| p.completed_units).sum();

        if actual_hours == 0.0 || completed_units == 0.0 {
            return NEUTRAL_EFFICIENCY;
        }

        let efficiency = safe_divide(planned_hours, actual_hours, 0.0) * 100.0;
        let clamped = clamp_finite(efficiency, 0.0, ceiling);
        tracing::debug!(
            planned_hours,
            actual_hours,
            efficiency = clamped,
            "效率计算完成"
        );
        clamped
    }

    /// 计算燃烧率 (小时/天)
    ///
    /// # 规则
    /// - 按 date 升序稳定排序后取最后 window_days 条 (不足则全取)
    /// - 对 hours_worked 取平均; 空序列或窗口为 0 → 0
    pub fn calculate_burn_rate(daily_progress: &[DailyProgressSummary], window_days: usize) -> f64 {
        if daily_progress.is_empty() || window_days == 0 {
            return 0.0;
        }

        let mut ordered: Vec<&DailyProgressSummary> = daily_progress.iter().collect();
        ordered.sort_by_key(|d| d.date);

        let start = ordered.len().saturating_sub(window_days);
        let window = &ordered[start..];
        let total: f64 = window.iter().map(|d| d.hours_worked).sum();

        safe_divide(total, window.len() as f64, 0.0)
    }
}
