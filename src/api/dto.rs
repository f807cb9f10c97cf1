// ==========================================
// 施工现场工时进度引擎 - API 请求/响应对象
// ==========================================
// 请求拒绝未知字段; 字段名 camelCase (产品记录除外, 沿用 snake_case)
// ==========================================

use crate::api::error::ValidationViolation;
use crate::domain::metrics::{
    Bottleneck, CostImplications, LabourMetrics, OriginalEstimate, TomorrowPlan,
};
use crate::domain::progress::{DailyProgressSummary, ProductProgress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 工时报告请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LabourReportRequest {
    pub job_id: String,
    pub products: Vec<ProductProgress>,
    #[serde(default)]
    pub daily_progress: Vec<DailyProgressSummary>,
    /// 目标完工日: YYYY-MM-DD (UTC 零点) 或 RFC 3339
    pub target_completion: String,
    #[serde(default)]
    pub original_estimate: Option<OriginalEstimate>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub team_size: Option<u32>,
    /// 计算基准时间, 缺省为当前时间
    #[serde(default)]
    pub as_of: Option<DateTime<Utc>>,
}

/// 工时报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabourReport {
    pub report_id: String,
    pub job_id: String,
    pub generated_at: DateTime<Utc>,
    pub metrics: LabourMetrics,
    pub bottlenecks: Vec<Bottleneck>,
    pub tomorrow_plan: TomorrowPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostImplications>,
    /// 宽松模式下记录的输入问题
    #[serde(default)]
    pub warnings: Vec<ValidationViolation>,
}
