// ==========================================
// 施工现场工时进度引擎 - 进度领域模型
// ==========================================
// 职责: 产品进度记录 + 每日现场进度汇总
// 红线: 引擎只读, 不修改调用方数据
// ==========================================

use crate::domain::types::ProductStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ProductProgress - 单个产品线的进度
// ==========================================
// 生命周期: 报价转工单时创建; 每次完工/记工时更新; 删除由外部负责
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductProgress {
    // ===== 标识 =====
    pub id: String,
    pub job_id: String,
    pub product_type: String,
    pub product_name: String,

    // ===== 数量 =====
    pub total_quantity: f64,   // 总数量 (>=0)
    pub completed_units: f64,  // 已完成 (期望 0..total, 需容忍越界)
    #[serde(default)]
    pub in_progress_units: f64, // 进行中

    // ===== 工时 =====
    pub estimated_hours_per_unit: f64, // 单件预估工时 (期望 >0, 需容忍 0/负数)
    #[serde(default)]
    pub actual_hours_spent: f64,       // 实际耗时

    // ===== 状态 =====
    pub status: ProductStatus,
    pub last_updated: DateTime<Utc>, // 仅供同步比较使用
}

impl ProductProgress {
    /// 剩余数量 (负数截断为 0)
    pub fn remaining_units(&self) -> f64 {
        (self.total_quantity - self.completed_units).max(0.0)
    }

    /// 剩余工时
    pub fn remaining_hours(&self) -> f64 {
        self.remaining_units() * self.estimated_hours_per_unit
    }

    /// 已完成部分对应的计划工时
    pub fn earned_hours(&self) -> f64 {
        self.completed_units * self.estimated_hours_per_unit
    }
}

// ==========================================
// DailyProgressSummary - 每日现场进度
// ==========================================
// 使用约定: 序列按日期排列 (最近一条在最后); 燃烧率计算会按 date 重新排序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DailyProgressSummary {
    pub date: NaiveDate,
    pub units_completed: f64,
    pub hours_worked: f64,
    #[serde(default)]
    pub workers_on_site: u32,
    #[serde(default)]
    pub efficiency: f64,

    // ===== 派生字段 (见 engine::history) =====
    #[serde(default)]
    pub cumulative_progress: f64,
    #[serde(default)]
    pub target_progress: f64,
    #[serde(default)]
    pub variance: f64,
}

impl DailyProgressSummary {
    /// 只带原始字段的当日记录, 派生字段置 0
    pub fn new(date: NaiveDate, units_completed: f64, hours_worked: f64, workers_on_site: u32) -> Self {
        Self {
            date,
            units_completed,
            hours_worked,
            workers_on_site,
            efficiency: 0.0,
            cumulative_progress: 0.0,
            target_progress: 0.0,
            variance: 0.0,
        }
    }
}
