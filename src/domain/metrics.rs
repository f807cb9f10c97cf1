// ==========================================
// 施工现场工时进度引擎 - 计算结果领域模型
// ==========================================
// 用途: 驾驶舱只读数据; 每次请求重新计算, 引擎不持久化
// ==========================================

use crate::domain::types::{AlertPriority, AlertType, ProductStatus, Urgency};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// LabourMetrics - 工时指标快照
// ==========================================
// 不变量: hours_remaining >= 0; efficiency ∈ [0, 999]; required_team_size ∈ [1, 12]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabourMetrics {
    pub hours_remaining: f64,
    pub required_team_size: u32,
    pub projected_completion: DateTime<Utc>,
    pub efficiency: f64,   // 百分比
    pub burn_rate: f64,    // 小时/天
    pub days_ahead: i64,   // 正数 = 提前
    pub days_until_deadline: i64,
    pub team_recommendation: TeamRecommendation,
    pub alerts: Vec<LabourAlert>, // 顺序有意义
}

// ==========================================
// TeamRecommendation - 班组人数建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecommendation {
    pub current: u32,     // 组织标准班组基线, 非实际在岗人数
    pub recommended: u32, // 1..=12
    pub reasoning: String,
    pub urgency: Urgency,
    pub cost_impact: f64, // >= 0
}

// ==========================================
// LabourAlert - 告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabourAlert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub priority: AlertPriority,
}

impl LabourAlert {
    pub fn new(
        alert_type: AlertType,
        priority: AlertPriority,
        message: impl Into<String>,
        action: Option<String>,
    ) -> Self {
        Self {
            alert_type,
            message: message.into(),
            action,
            priority,
        }
    }
}

// ==========================================
// Bottleneck - 瓶颈产品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bottleneck {
    pub product_id: String,
    pub product_name: String,
    pub status: ProductStatus,
    pub completion_rate: f64,  // 0..1
    pub efficiency_ratio: f64, // 计划工时 / 实际工时
    pub remaining_hours: f64,
}

// ==========================================
// TomorrowPlan - 次日工作计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TomorrowPlan {
    pub priority: Vec<String>, // 产品ID, 按优先顺序
    pub targets: Vec<PlanTarget>,
    pub estimated_hours: f64,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTarget {
    pub product_id: String,
    pub product_name: String,
    pub target_units: u32,
    pub estimated_hours: f64,
}

// ==========================================
// 成本影响
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalEstimate {
    pub total_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostImplications {
    pub original_cost: f64,
    pub projected_cost: f64,
    pub variance: f64,
    pub variance_percentage: f64,
}
