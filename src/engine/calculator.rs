// ==========================================
// 施工现场工时进度引擎 - 工时计算器 (编排)
// ==========================================
// 职责: 聚合 → 预测 → 告警, 组合为 LabourMetrics
// 输入: 产品进度 + 每日进度历史 + 目标完工日期
// 输出: LabourMetrics (调用方负责持久化/展示)
// 红线: 无内部可变状态, 可被任意并发调用
// ==========================================

use crate::config::LabourConfig;
use crate::domain::metrics::{
    Bottleneck, CostImplications, LabourMetrics, OriginalEstimate, TeamRecommendation, TomorrowPlan,
};
use crate::domain::progress::{DailyProgressSummary, ProductProgress};
use crate::engine::aggregation::ProgressAggregator;
use crate::engine::alerts::{AlertGenerator, AlertInputs};
use crate::engine::cost::CostEstimator;
use crate::engine::planning::WorkPlanner;
use crate::engine::projection::{days_between_ceil, ProjectionEngine};
use chrono::{DateTime, Utc};

// ==========================================
// LabourCalculator - 工时计算器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct LabourCalculator {
    config: LabourConfig,
    projection: ProjectionEngine,
    alerts: AlertGenerator,
    planner: WorkPlanner,
}

impl LabourCalculator {
    pub fn new(config: LabourConfig) -> Self {
        Self {
            projection: ProjectionEngine::new(config.clone()),
            alerts: AlertGenerator::new(config.clone()),
            planner: WorkPlanner::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &LabourConfig {
        &self.config
    }

    // ==========================================
    // 聚合
    // ==========================================

    pub fn calculate_remaining_hours(&self, products: &[ProductProgress]) -> f64 {
        ProgressAggregator::calculate_remaining_hours(products)
    }

    pub fn calculate_efficiency(&self, products: &[ProductProgress]) -> f64 {
        ProgressAggregator::calculate_efficiency(products, self.config.efficiency_ceiling)
    }

    /// 燃烧率; `window_days` 为 None 时使用配置窗口 (默认 7 天)
    pub fn calculate_burn_rate(
        &self,
        daily_progress: &[DailyProgressSummary],
        window_days: Option<usize>,
    ) -> f64 {
        let window = window_days.unwrap_or(self.config.burn_rate_window_days);
        ProgressAggregator::calculate_burn_rate(daily_progress, window)
    }

    // ==========================================
    // 预测
    // ==========================================

    pub fn calculate_required_team_size(
        &self,
        remaining_hours: f64,
        days_available: i64,
        current_efficiency: Option<f64>,
    ) -> TeamRecommendation {
        self.projection
            .calculate_required_team_size(remaining_hours, days_available, current_efficiency)
    }

    pub fn project_completion_date(
        &self,
        remaining_hours: f64,
        burn_rate: f64,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        self.projection.project_completion_date(
            remaining_hours,
            burn_rate,
            self.config.work_days_per_week,
            now,
        )
    }

    // ==========================================
    // 指标快照
    // ==========================================

    /// 以当前时间计算工时指标
    pub fn calculate_labour_metrics(
        &self,
        products: &[ProductProgress],
        daily_progress: &[DailyProgressSummary],
        target_completion: DateTime<Utc>,
    ) -> LabourMetrics {
        self.calculate_labour_metrics_at(products, daily_progress, target_completion, Utc::now())
    }

    /// 以指定时间计算工时指标
    ///
    /// # 步骤
    /// 1. 剩余工时 / 效率 / 燃烧率 (配置窗口)
    /// 2. 距截止日天数 = ceil((目标 - now) / 1天)
    /// 3. 预计完工日期、班组建议 (按距截止日天数与当前效率)
    /// 4. 提前天数 = ceil((目标 - 预计完工) / 1天)
    /// 5. 告警
    pub fn calculate_labour_metrics_at(
        &self,
        products: &[ProductProgress],
        daily_progress: &[DailyProgressSummary],
        target_completion: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> LabourMetrics {
        // 1. 聚合
        let hours_remaining = self.calculate_remaining_hours(products);
        let efficiency = self.calculate_efficiency(products);
        let burn_rate = self.calculate_burn_rate(daily_progress, None);

        // 2. 截止日
        let days_until_deadline = days_between_ceil(now, target_completion);

        // 3. 预测
        let projected_completion = self.project_completion_date(hours_remaining, burn_rate, now);
        let team_recommendation =
            self.calculate_required_team_size(hours_remaining, days_until_deadline, Some(efficiency));

        // 4. 提前/滞后
        let days_ahead = days_between_ceil(projected_completion, target_completion);

        // 5. 告警
        let alerts = self.alerts.generate(&AlertInputs {
            team: &team_recommendation,
            efficiency,
            burn_rate,
            days_until_deadline,
            remaining_hours: hours_remaining,
        });

        tracing::debug!(
            products = products.len(),
            history_days = daily_progress.len(),
            hours_remaining,
            efficiency,
            burn_rate,
            days_until_deadline,
            days_ahead,
            alerts = alerts.len(),
            "工时指标计算完成"
        );

        LabourMetrics {
            hours_remaining,
            required_team_size: team_recommendation.recommended,
            projected_completion,
            efficiency,
            burn_rate,
            days_ahead,
            days_until_deadline,
            team_recommendation,
            alerts,
        }
    }

    // ==========================================
    // 计划 / 成本
    // ==========================================

    pub fn identify_bottlenecks(&self, products: &[ProductProgress]) -> Vec<Bottleneck> {
        self.planner.identify_bottlenecks(products)
    }

    /// 次日计划; `team_size` 为 None 时使用班组基线
    pub fn generate_tomorrow_plan(
        &self,
        products: &[ProductProgress],
        team_size: Option<u32>,
    ) -> TomorrowPlan {
        let team = team_size.unwrap_or(self.config.baseline_crew_size);
        self.planner.generate_tomorrow_plan(products, team)
    }

    /// 成本影响; `hourly_rate` 为 None 或非正时使用配置时薪
    pub fn calculate_cost_implications(
        &self,
        original_estimate: &OriginalEstimate,
        current_progress: &[ProductProgress],
        hourly_rate: Option<f64>,
    ) -> CostImplications {
        CostEstimator::calculate_cost_implications(
            original_estimate,
            current_progress,
            hourly_rate.unwrap_or(self.config.hourly_rate),
            self.config.hourly_rate,
        )
    }
}
