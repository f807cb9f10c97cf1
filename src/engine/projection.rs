// ==========================================
// 施工现场工时进度引擎 - 工期/班组预测
// ==========================================
// 职责: 剩余工时 + 燃烧率 → 预计完工日期; 剩余工时 + 可用天数 → 班组建议
// 红线: 非正天数/效率/燃烧率一律替换为安全值, 结果始终有限
// ==========================================

use crate::config::LabourConfig;
use crate::domain::metrics::TeamRecommendation;
use crate::domain::types::Urgency;
use crate::engine::math::{ceil_to_u32, positive_or};
use chrono::{DateTime, Duration, Utc};

/// 预测完工日期的最大跨度 (天)
pub const MAX_PROJECTION_DAYS: u32 = 36_500;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

// ==========================================
// ProjectionEngine - 预测引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: LabourConfig,
}

impl ProjectionEngine {
    pub fn new(config: LabourConfig) -> Self {
        Self { config }
    }

    /// 计算所需班组人数
    ///
    /// # 规则
    /// - 有效工时 = 剩余工时 / (效率/100)
    /// - 人日 = 有效工时 / 标准工日
    /// - 所需人数 = ceil(人日 / 可用天数)
    /// - 分档 (先匹配先生效): <=4 标准; <=8 扩编; 其余 紧急
    /// - 建议人数截断到 [1, max_crew_size]
    ///
    /// # 参数
    /// - `remaining_hours`: 剩余工时
    /// - `days_available`: 距截止日天数, <=0 按 1 天处理
    /// - `current_efficiency`: 当前效率 (%), None 或非正 → 默认效率
    pub fn calculate_required_team_size(
        &self,
        remaining_hours: f64,
        days_available: i64,
        current_efficiency: Option<f64>,
    ) -> TeamRecommendation {
        let cfg = &self.config;

        let efficiency = match current_efficiency {
            Some(e) if e.is_finite() && e > 0.0 => e,
            Some(e) => {
                tracing::warn!("效率 {} 不可用, 使用默认效率 {}", e, cfg.default_efficiency);
                cfg.default_efficiency
            }
            None => cfg.default_efficiency,
        };

        let days = if days_available <= 0 {
            tracing::warn!("可用天数 {} <= 0, 按 1 天计算班组", days_available);
            1
        } else {
            days_available
        };

        // efficiency 已保证为正; 非有限中间值由 ceil_to_u32 截断
        let effective_hours = remaining_hours.max(0.0) / (efficiency / 100.0);
        let man_days = effective_hours / cfg.standard_day_hours;
        let required = ceil_to_u32(man_days / days as f64, u32::MAX);

        let (reasoning, urgency, cost_impact) = if required <= cfg.standard_tier_limit {
            ("Standard team size suitable for timeline", Urgency::Low, 0.0)
        } else if required <= cfg.medium_tier_limit {
            (
                "Larger team needed to meet deadline",
                Urgency::Medium,
                self.extra_worker_cost(required, cfg.medium_cost_per_worker),
            )
        } else {
            (
                "Critical: Very large team or overtime required",
                Urgency::High,
                self.extra_worker_cost(required, cfg.high_cost_per_worker),
            )
        };

        let recommended = required.clamp(1, cfg.max_crew_size.max(1));

        tracing::debug!(
            remaining_hours,
            days,
            efficiency,
            required,
            recommended,
            "班组人数计算完成"
        );

        TeamRecommendation {
            current: cfg.baseline_crew_size,
            recommended,
            reasoning: reasoning.to_string(),
            urgency,
            cost_impact,
        }
    }

    /// 预测完工日期
    ///
    /// # 规则
    /// - 燃烧率 <= 0 → 标准燃烧率 (基线班组 × 标准工日)
    /// - 工作日 = ceil(剩余工时 / 燃烧率)
    /// - 日历日 = ceil(工作日 × 7 / 每周工作日)
    /// - 按周均匀折算, 不逐日跳过周末, 周边界附近会有 ±1 天误差
    ///
    /// # 参数
    /// - `work_days_per_week`: 超出 1..=7 时回落到配置值
    /// - `now`: 基准时间
    pub fn project_completion_date(
        &self,
        remaining_hours: f64,
        burn_rate: f64,
        work_days_per_week: u32,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let rate = positive_or(burn_rate, self.config.standard_burn_rate());
        let week = if (1..=7).contains(&work_days_per_week) {
            work_days_per_week
        } else {
            self.config.work_days_per_week
        };

        let hours = if remaining_hours.is_nan() { 0.0 } else { remaining_hours };
        let work_days = ceil_to_u32(hours / rate, MAX_PROJECTION_DAYS);
        let calendar_days = ceil_to_u32(
            f64::from(work_days) * 7.0 / f64::from(week),
            MAX_PROJECTION_DAYS,
        );

        now + Duration::days(i64::from(calendar_days))
    }

    fn extra_worker_cost(&self, required: u32, cost_per_worker: f64) -> f64 {
        f64::from(required.saturating_sub(self.config.baseline_crew_size)) * cost_per_worker
    }
}

/// 两个时间点之间的天数差, 向上取整 (正数 = to 晚于 from)
pub fn days_between_ceil(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let millis = (to - from).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).ceil() as i64
}
