// ==========================================
// 施工现场工时进度引擎 - 工时规则参数
// ==========================================
// 职责: 集中管理所有业务常量 (标准工日、班组基线、阈值、费率)
// 可按部署覆写, 见 ConfigManager
// ==========================================

use crate::config::error::ConfigError;
use serde::{Deserialize, Serialize};

/// 工时规则参数
///
/// 所有字段均带默认值, 反序列化时缺失字段回落到默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabourConfig {
    // ===== 班组 =====
    /// 标准工日 (小时)
    pub standard_day_hours: f64,
    /// 组织标准班组人数 (基线)
    pub baseline_crew_size: u32,
    /// 班组人数硬上限
    pub max_crew_size: u32,
    /// 标准档上限 (<= 此值为标准班组)
    pub standard_tier_limit: u32,
    /// 扩编档上限 (<= 此值为中等紧迫)
    pub medium_tier_limit: u32,
    /// 扩编档每增加一人的成本
    pub medium_cost_per_worker: f64,
    /// 紧急档每增加一人的成本
    pub high_cost_per_worker: f64,

    // ===== 效率 =====
    /// 默认效率 (%)
    pub default_efficiency: f64,
    /// 效率上限 (%)
    pub efficiency_ceiling: f64,
    pub low_efficiency_threshold: f64,
    pub high_efficiency_threshold: f64,

    // ===== 燃烧率 / 工期 =====
    pub burn_rate_window_days: usize,
    pub low_burn_rate_threshold: f64,
    pub work_days_per_week: u32,
    pub deadline_alert_days: i64,
    pub deadline_alert_hours: f64,

    // ===== 成本 =====
    pub hourly_rate: f64,

    // ===== 瓶颈 / 次日计划 =====
    pub bottleneck_completion_ratio: f64,
    pub bottleneck_efficiency_ratio: f64,
    /// 实际工时下限 (刚开工的产品防除零)
    pub min_actual_hours: f64,
    pub planning_horizon_days: f64,
}

impl Default for LabourConfig {
    fn default() -> Self {
        Self {
            standard_day_hours: 8.0,
            baseline_crew_size: 4,
            max_crew_size: 12,
            standard_tier_limit: 4,
            medium_tier_limit: 8,
            medium_cost_per_worker: 500.0,
            high_cost_per_worker: 800.0,
            default_efficiency: 85.0,
            efficiency_ceiling: 999.0,
            low_efficiency_threshold: 70.0,
            high_efficiency_threshold: 120.0,
            burn_rate_window_days: 7,
            low_burn_rate_threshold: 20.0,
            work_days_per_week: 5,
            deadline_alert_days: 5,
            deadline_alert_hours: 40.0,
            hourly_rate: 45.0,
            bottleneck_completion_ratio: 0.5,
            bottleneck_efficiency_ratio: 0.8,
            min_actual_hours: 0.1,
            planning_horizon_days: 1.0,
        }
    }
}

impl LabourConfig {
    /// 标准燃烧率 (基线班组 × 标准工日), 无进度历史时使用
    pub fn standard_burn_rate(&self) -> f64 {
        f64::from(self.baseline_crew_size) * self.standard_day_hours
    }

    /// 校验参数
    ///
    /// # 返回
    /// - Ok(()): 全部参数可用
    /// - Err(ConfigError::InvalidValue): 第一个不合法的参数
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(key: &str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("必须为正数, 实际 {}", value),
                })
            }
        }

        positive("standard_day_hours", self.standard_day_hours)?;
        positive("default_efficiency", self.default_efficiency)?;
        positive("efficiency_ceiling", self.efficiency_ceiling)?;
        positive("hourly_rate", self.hourly_rate)?;
        positive("min_actual_hours", self.min_actual_hours)?;
        positive("planning_horizon_days", self.planning_horizon_days)?;

        if self.baseline_crew_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "baseline_crew_size".to_string(),
                message: "班组基线不能为 0".to_string(),
            });
        }

        if self.max_crew_size < self.baseline_crew_size {
            return Err(ConfigError::InvalidValue {
                key: "max_crew_size".to_string(),
                message: format!(
                    "上限 {} 小于班组基线 {}",
                    self.max_crew_size, self.baseline_crew_size
                ),
            });
        }

        if self.standard_tier_limit > self.medium_tier_limit {
            return Err(ConfigError::InvalidValue {
                key: "standard_tier_limit".to_string(),
                message: format!(
                    "标准档 {} 大于扩编档 {}",
                    self.standard_tier_limit, self.medium_tier_limit
                ),
            });
        }

        if !(1..=7).contains(&self.work_days_per_week) {
            return Err(ConfigError::InvalidValue {
                key: "work_days_per_week".to_string(),
                message: format!("必须在 1..=7, 实际 {}", self.work_days_per_week),
            });
        }

        if self.low_efficiency_threshold > self.high_efficiency_threshold {
            return Err(ConfigError::InvalidValue {
                key: "low_efficiency_threshold".to_string(),
                message: "低效率阈值高于高效率阈值".to_string(),
            });
        }

        Ok(())
    }
}
