// ==========================================
// 施工现场工时进度引擎 - 瓶颈识别与次日计划
// ==========================================
// 职责:
// - 识别完工率低且效率低的瓶颈产品, 按剩余工时降序
// - 组合次日优先清单: 瓶颈 Top2 → 进行中 2 项 → 未开工 1 项
// ==========================================

use crate::config::LabourConfig;
use crate::domain::metrics::{Bottleneck, PlanTarget, TomorrowPlan};
use crate::domain::progress::ProductProgress;
use crate::domain::types::ProductStatus;
use crate::engine::math::{ceil_to_u32, positive_or, safe_divide};
use std::collections::HashSet;

const PLAN_BOTTLENECK_SLOTS: usize = 2;
const PLAN_IN_PROGRESS_SLOTS: usize = 2;
const PLAN_NOT_STARTED_SLOTS: usize = 1;

// ==========================================
// WorkPlanner - 计划生成器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct WorkPlanner {
    config: LabourConfig,
}

impl WorkPlanner {
    pub fn new(config: LabourConfig) -> Self {
        Self { config }
    }

    /// 识别瓶颈
    ///
    /// # 规则
    /// - 完工率 = completed / total < 0.5 (total <= 0 的产品不参与)
    /// - 单品效率比 = 计划工时 / max(0.1, 实际工时) < 0.8
    /// - 按剩余工时降序 (稳定排序)
    pub fn identify_bottlenecks(&self, products: &[ProductProgress]) -> Vec<Bottleneck> {
        let cfg = &self.config;

        let mut bottlenecks: Vec<Bottleneck> = products
            .iter()
            .filter(|p| p.total_quantity > 0.0)
            .filter_map(|p| {
                let completion_rate = safe_divide(p.completed_units, p.total_quantity, 0.0);
                let efficiency_ratio = safe_divide(
                    p.earned_hours(),
                    p.actual_hours_spent.max(cfg.min_actual_hours),
                    0.0,
                );

                if completion_rate < cfg.bottleneck_completion_ratio
                    && efficiency_ratio < cfg.bottleneck_efficiency_ratio
                {
                    Some(Bottleneck {
                        product_id: p.id.clone(),
                        product_name: p.product_name.clone(),
                        status: p.status,
                        completion_rate,
                        efficiency_ratio,
                        remaining_hours: p.remaining_hours().max(0.0),
                    })
                } else {
                    None
                }
            })
            .collect();

        bottlenecks.sort_by(|a, b| b.remaining_hours.total_cmp(&a.remaining_hours));
        bottlenecks
    }

    /// 生成次日计划
    ///
    /// # 参数
    /// - `products`: 产品进度列表
    /// - `team_size`: 次日班组人数 (用于判断计划是否过满)
    pub fn generate_tomorrow_plan(&self, products: &[ProductProgress], team_size: u32) -> TomorrowPlan {
        let bottlenecks = self.identify_bottlenecks(products);

        let mut selected: Vec<&ProductProgress> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for b in bottlenecks.iter().take(PLAN_BOTTLENECK_SLOTS) {
            if let Some(p) = products.iter().find(|p| p.id == b.product_id) {
                if seen.insert(p.id.as_str()) {
                    selected.push(p);
                }
            }
        }

        for (status, slots) in [
            (ProductStatus::InProgress, PLAN_IN_PROGRESS_SLOTS),
            (ProductStatus::NotStarted, PLAN_NOT_STARTED_SLOTS),
        ] {
            let picks: Vec<&ProductProgress> = products
                .iter()
                .filter(|p| p.status == status && !seen.contains(p.id.as_str()))
                .take(slots)
                .collect();
            for p in picks {
                seen.insert(p.id.as_str());
                selected.push(p);
            }
        }

        let targets: Vec<PlanTarget> = selected.iter().map(|p| self.daily_target(p)).collect();
        let estimated_hours = targets.iter().fold(0.0, |acc, t| acc + t.estimated_hours);

        let mut notes = Vec::new();
        if let Some(top) = bottlenecks.first() {
            notes.push(format!("Focus on {} - identified as bottleneck", top.product_name));
        }
        let capacity = f64::from(team_size) * self.config.standard_day_hours;
        if estimated_hours > capacity {
            notes.push("Ambitious plan - may require overtime or additional crew".to_string());
        }

        tracing::debug!(
            items = selected.len(),
            estimated_hours,
            capacity,
            "次日计划生成完成"
        );

        TomorrowPlan {
            priority: selected.iter().map(|p| p.id.clone()).collect(),
            targets,
            estimated_hours,
            notes,
        }
    }

    /// 单品次日目标: max(1, ceil(剩余数量 / 计划天数))
    fn daily_target(&self, product: &ProductProgress) -> PlanTarget {
        let horizon = positive_or(self.config.planning_horizon_days, 1.0);
        let target_units = ceil_to_u32(product.remaining_units() / horizon, u32::MAX).max(1);
        let hours_per_unit = positive_or(product.estimated_hours_per_unit, 0.0);

        PlanTarget {
            product_id: product.id.clone(),
            product_name: product.product_name.clone(),
            target_units,
            estimated_hours: f64::from(target_units) * hours_per_unit,
        }
    }
}
