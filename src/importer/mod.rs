// ==========================================
// 施工现场工时进度引擎 - 导入层
// ==========================================
// 职责: 从 CSV / JSON 文件读取产品进度与每日进度
// 流程: 文件解析 (file_parser) → 字段映射 (field_mapper)
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;

pub use error::{ImportError, ImportResult};
pub use field_mapper::{parse_date, parse_datetime, FieldMapper};
pub use file_parser::{parser_for, CsvParser, FileParser, JsonParser, RawRecord};

use crate::domain::progress::{DailyProgressSummary, ProductProgress};
use chrono::{DateTime, Utc};
use std::path::Path;

/// 导入产品进度文件
pub fn import_products(path: &Path, imported_at: DateTime<Utc>) -> ImportResult<Vec<ProductProgress>> {
    let records = parser_for(path)?.parse_to_raw_records(path)?;
    let products = FieldMapper::map_products(&records, imported_at)?;
    tracing::info!("导入产品进度 {} 条: {}", products.len(), path.display());
    Ok(products)
}

/// 导入每日进度文件
pub fn import_daily_progress(path: &Path) -> ImportResult<Vec<DailyProgressSummary>> {
    let records = parser_for(path)?.parse_to_raw_records(path)?;
    let days = FieldMapper::map_daily_progress(&records)?;
    tracing::info!("导入每日进度 {} 条: {}", days.len(), path.display());
    Ok(days)
}
