// ==========================================
// 施工现场工时进度引擎 - 报价领域模型
// ==========================================
// 用途: 报价转工单 (engine::quote_conversion) 的输入
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub quote_id: String,
    pub job_id: String,
    pub line_items: Vec<QuoteLineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    pub product_type: String,
    pub product_name: String,
    pub quantity: f64,
    pub hours_per_unit: f64,
}
