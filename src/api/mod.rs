// ==========================================
// 施工现场工时进度引擎 - API 层
// ==========================================
// 职责: 请求校验 + 报告组装, 供 CLI 与嵌入方调用
// ==========================================

pub mod dto;
pub mod error;
pub mod labour_api;
pub mod validator;

// 重导出核心类型
pub use dto::{LabourReport, LabourReportRequest};
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use labour_api::LabourApi;
pub use validator::{RequestValidator, ValidationMode};
