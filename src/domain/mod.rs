// ==========================================
// 施工现场工时进度引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod metrics;
pub mod progress;
pub mod quote;
pub mod types;

// 重导出核心类型
pub use metrics::{
    Bottleneck, CostImplications, LabourAlert, LabourMetrics, OriginalEstimate, PlanTarget,
    TeamRecommendation, TomorrowPlan,
};
pub use progress::{DailyProgressSummary, ProductProgress};
pub use quote::{Quote, QuoteLineItem};
pub use types::{AlertPriority, AlertType, ProductStatus, Urgency};
