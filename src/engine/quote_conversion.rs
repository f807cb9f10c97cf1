// ==========================================
// 施工现场工时进度引擎 - 报价转工单
// ==========================================
// 职责: 报价行 → 产品进度初始记录 (build targets) + 原始估算工时
// ==========================================

use crate::domain::metrics::OriginalEstimate;
use crate::domain::progress::ProductProgress;
use crate::domain::quote::Quote;
use crate::domain::types::ProductStatus;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub struct QuoteConverter;

impl QuoteConverter {
    /// 报价转产品进度
    ///
    /// 数量 <= 0 或非有限的报价行被跳过; 单件工时非有限时置 0
    pub fn convert_quote_to_products(quote: &Quote, at: DateTime<Utc>) -> Vec<ProductProgress> {
        let products: Vec<ProductProgress> = quote
            .line_items
            .iter()
            .filter(|item| item.quantity.is_finite() && item.quantity > 0.0)
            .map(|item| ProductProgress {
                id: Uuid::new_v4().to_string(),
                job_id: quote.job_id.clone(),
                product_type: item.product_type.clone(),
                product_name: item.product_name.clone(),
                total_quantity: item.quantity,
                completed_units: 0.0,
                in_progress_units: 0.0,
                estimated_hours_per_unit: if item.hours_per_unit.is_finite() {
                    item.hours_per_unit
                } else {
                    0.0
                },
                actual_hours_spent: 0.0,
                status: ProductStatus::NotStarted,
                last_updated: at,
            })
            .collect();

        let skipped = quote.line_items.len() - products.len();
        if skipped > 0 {
            tracing::warn!("报价 {} 跳过 {} 个数量无效的报价行", quote.quote_id, skipped);
        }
        tracing::info!(
            "报价 {} 转换为工单 {}: {} 个产品",
            quote.quote_id,
            quote.job_id,
            products.len()
        );

        products
    }

    /// 报价原始估算工时 = Σ 数量 × 单件工时 (忽略无效行)
    pub fn original_estimate_from_quote(quote: &Quote) -> OriginalEstimate {
        let total_hours = quote
            .line_items
            .iter()
            .map(|item| item.quantity * item.hours_per_unit)
            .filter(|h| h.is_finite() && *h > 0.0)
            .fold(0.0, |acc, h| acc + h);
        OriginalEstimate { total_hours }
    }
}
