// ==========================================
// 施工现场工时进度引擎 - 引擎层
// ==========================================
// 职责: 工时/进度业务规则 (聚合、预测、告警、计划、成本)
// 红线: 纯计算, 不做 I/O; 对畸形数值截断/替换默认值, 永不失败
// ==========================================

pub mod aggregation;
pub mod alerts;
pub mod calculator;
pub mod cost;
pub mod history;
pub mod math;
pub mod planning;
pub mod projection;
pub mod quote_conversion;
pub mod status_derivation;
pub mod sync;

// 重导出核心引擎
pub use aggregation::ProgressAggregator;
pub use alerts::{AlertGenerator, AlertInputs};
pub use calculator::LabourCalculator;
pub use cost::CostEstimator;
pub use history::HistoryAnnotator;
pub use planning::WorkPlanner;
pub use projection::{days_between_ceil, ProjectionEngine};
pub use quote_conversion::QuoteConverter;
pub use status_derivation::{StatusDerivation, UnitUpdate};
pub use sync::{SyncResolver, SyncWinner};
