// ==========================================
// 施工现场工时进度引擎 - 核心库
// ==========================================
// 系统定位: 决策支持 (工时剩余量、班组建议、完工预测、告警)
// 分层: domain → engine → config → importer → api
// 红线: 引擎为纯计算, 不持久化, 不发起网络请求
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 规则参数
pub mod config;

// 导入层 - 外部数据
pub mod importer;

// API 层 - 请求校验与报告
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AlertPriority, AlertType, ProductStatus, Urgency};

// 领域实体
pub use domain::{
    Bottleneck, CostImplications, DailyProgressSummary, LabourAlert, LabourMetrics,
    OriginalEstimate, ProductProgress, Quote, QuoteLineItem, TeamRecommendation, TomorrowPlan,
};

// 引擎
pub use engine::{LabourCalculator, QuoteConverter, StatusDerivation, SyncResolver};

// 配置
pub use config::{ConfigManager, LabourConfig};

// API
pub use api::{ApiError, ApiResult, LabourApi, LabourReport, LabourReportRequest, ValidationMode};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "施工现场工时进度引擎";
