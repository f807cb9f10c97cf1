// ==========================================
// 施工现场工时进度引擎 - 每日进度注解
// ==========================================
// 职责: 为每日进度记录补齐派生字段
// - cumulative_progress: 截至当日累计完工占比 (%)
// - target_progress: 按起止日期线性计划的应完成占比 (%)
// - variance: cumulative - target (正数 = 超前)
// - efficiency: 当日计划工时 / 实际工时 (%)
// ==========================================

use crate::domain::progress::{DailyProgressSummary, ProductProgress};
use crate::engine::aggregation::NEUTRAL_EFFICIENCY;
use crate::engine::math::{clamp_finite, safe_divide};
use chrono::NaiveDate;

pub struct HistoryAnnotator;

impl HistoryAnnotator {
    /// 注解每日进度, 返回按日期升序的新序列
    ///
    /// # 参数
    /// - `history`: 每日进度 (任意顺序)
    /// - `products`: 工单下全部产品 (提供总数量与平均单件工时)
    /// - `start` / `target`: 计划开工日与目标完工日
    /// - `efficiency_ceiling`: 效率上限 (%)
    pub fn annotate_history(
        history: &[DailyProgressSummary],
        products: &[ProductProgress],
        start: NaiveDate,
        target: NaiveDate,
        efficiency_ceiling: f64,
    ) -> Vec<DailyProgressSummary> {
        let total_units: f64 = products.iter().map(|p| p.total_quantity.max(0.0)).sum();
        let total_planned_hours: f64 = products
            .iter()
            .map(|p| p.total_quantity.max(0.0) * p.estimated_hours_per_unit)
            .sum();
        let avg_hours_per_unit = safe_divide(total_planned_hours, total_units, 0.0);
        let span_days = (target - start).num_days();

        let mut ordered: Vec<DailyProgressSummary> = history.to_vec();
        ordered.sort_by_key(|d| d.date);

        let mut cumulative_units = 0.0;
        for day in ordered.iter_mut() {
            cumulative_units += day.units_completed;

            day.cumulative_progress =
                clamp_finite(safe_divide(cumulative_units, total_units, 0.0) * 100.0, 0.0, 100.0);

            day.target_progress = if span_days <= 0 {
                100.0
            } else {
                let elapsed = (day.date - start).num_days() + 1;
                clamp_finite(elapsed as f64 / span_days as f64 * 100.0, 0.0, 100.0)
            };

            day.variance = day.cumulative_progress - day.target_progress;

            day.efficiency = if day.hours_worked <= 0.0 {
                NEUTRAL_EFFICIENCY
            } else {
                let planned = day.units_completed * avg_hours_per_unit;
                clamp_finite(
                    safe_divide(planned, day.hours_worked, 0.0) * 100.0,
                    0.0,
                    efficiency_ceiling,
                )
            };
        }

        ordered
    }
}
