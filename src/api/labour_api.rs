// ==========================================
// 施工现场工时进度引擎 - 工时报告 API
// ==========================================
// 职责: 校验请求 → 调用 LabourCalculator → 组装 LabourReport
// 架构: API 层 → Engine 层 (LabourCalculator), 无持久化
// 边界: 配置/导入错误在这里统一转换为 ApiError
// ==========================================

use crate::api::dto::{LabourReport, LabourReportRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{RequestValidator, ValidationMode};
use crate::config::ConfigManager;
use crate::domain::progress::ProductProgress;
use crate::domain::quote::Quote;
use crate::engine::{LabourCalculator, QuoteConverter};
use crate::importer::{import_daily_progress, import_products, parse_datetime};
use chrono::{DateTime, Utc};
use std::path::Path;
use uuid::Uuid;

// ==========================================
// LabourApi - 工时报告 API
// ==========================================
pub struct LabourApi {
    calculator: LabourCalculator,
    mode: ValidationMode,
}

impl LabourApi {
    pub fn new(calculator: LabourCalculator, mode: ValidationMode) -> Self {
        Self { calculator, mode }
    }

    /// 按配置管理器中的规则参数构建; 参数非法返回 ApiError::ConfigError
    pub fn from_config(manager: &ConfigManager, mode: ValidationMode) -> ApiResult<Self> {
        let config = manager.labour_config()?;
        Ok(Self::new(LabourCalculator::new(config), mode))
    }

    /// 由导入文件组装报告请求
    ///
    /// # 参数
    /// - products_path: 产品进度文件 (.csv / .json)
    /// - daily_path: 每日进度文件, 可选
    /// - imported_at: 产品记录缺少 last_updated 时的取值
    ///
    /// # 返回
    /// - Err(NotFound): 文件不存在
    /// - Err(ImportError): 格式或字段错误 (含文件行号)
    pub fn request_from_files(
        job_id: &str,
        target_completion: &str,
        products_path: &Path,
        daily_path: Option<&Path>,
        imported_at: DateTime<Utc>,
    ) -> ApiResult<LabourReportRequest> {
        let products = import_products(products_path, imported_at)?;
        let daily_progress = match daily_path {
            Some(path) => import_daily_progress(path)?,
            None => Vec::new(),
        };

        Ok(LabourReportRequest {
            job_id: job_id.trim().to_string(),
            products,
            daily_progress,
            target_completion: target_completion.to_string(),
            original_estimate: None,
            hourly_rate: None,
            team_size: None,
            as_of: None,
        })
    }

    /// 生成工时报告 (计算基准为请求 asOf, 缺省为当前时间)
    pub fn generate_report(&self, request: LabourReportRequest) -> ApiResult<LabourReport> {
        self.generate_report_at(request, Utc::now())
    }

    /// 生成工时报告
    ///
    /// # 参数
    /// - request: 报告请求
    /// - now: 请求未携带 asOf 时使用的基准时间
    ///
    /// # 返回
    /// - Ok(LabourReport): 指标 + 瓶颈 + 次日计划 (+ 成本, 若请求携带原始估算)
    /// - Err(ApiError): 目标日期无法解析, 或严格模式下请求违规
    pub fn generate_report_at(
        &self,
        mut request: LabourReportRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<LabourReport> {
        let warnings = RequestValidator::validate(&mut request, self.mode)?;

        let target_completion = parse_datetime(request.target_completion.trim()).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "targetCompletion 格式错误: {} (期望 YYYY-MM-DD 或 RFC 3339)",
                request.target_completion
            ))
        })?;
        let as_of = request.as_of.unwrap_or(now);

        let metrics = self.calculator.calculate_labour_metrics_at(
            &request.products,
            &request.daily_progress,
            target_completion,
            as_of,
        );
        let bottlenecks = self.calculator.identify_bottlenecks(&request.products);
        let tomorrow_plan = self
            .calculator
            .generate_tomorrow_plan(&request.products, request.team_size);
        let cost = request.original_estimate.as_ref().map(|estimate| {
            self.calculator
                .calculate_cost_implications(estimate, &request.products, request.hourly_rate)
        });

        let report = LabourReport {
            report_id: Uuid::new_v4().to_string(),
            job_id: request.job_id,
            generated_at: as_of,
            metrics,
            bottlenecks,
            tomorrow_plan,
            cost,
            warnings,
        };

        tracing::info!(
            report_id = %report.report_id,
            job_id = %report.job_id,
            alerts = report.metrics.alerts.len(),
            bottlenecks = report.bottlenecks.len(),
            "工时报告生成完成"
        );
        Ok(report)
    }

    /// 从原始 JSON 生成报告; 结构不符 (含未知字段) 返回 InvalidInput
    pub fn generate_report_from_json(&self, payload: serde_json::Value) -> ApiResult<LabourReport> {
        let request: LabourReportRequest = serde_json::from_value(payload)?;
        self.generate_report(request)
    }

    /// 报价单 → 产品进度记录
    pub fn convert_quote(&self, quote: &Quote) -> ApiResult<Vec<ProductProgress>> {
        if quote.job_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("报价单缺少 jobId".to_string()));
        }
        if quote.line_items.is_empty() {
            return Err(ApiError::InvalidInput(format!(
                "报价单 {} 没有明细行",
                quote.quote_id
            )));
        }
        Ok(QuoteConverter::convert_quote_to_products(quote, Utc::now()))
    }
}

impl Default for LabourApi {
    fn default() -> Self {
        Self::new(LabourCalculator::default(), ValidationMode::default())
    }
}
