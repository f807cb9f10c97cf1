// ==========================================
// 施工现场工时进度引擎 - 字段映射
// ==========================================
// 职责: 原始记录 → ProductProgress / DailyProgressSummary
// 表头匹配不区分大小写, 忽略下划线/空格 (unitsCompleted == units_completed)
// 错误中的行号取自 RawRecord::line (CSV 文件行号, JSON 元素序号)
// ==========================================

use crate::domain::progress::{DailyProgressSummary, ProductProgress};
use crate::domain::types::ProductStatus;
use crate::engine::status_derivation::StatusDerivation;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

/// 规范化后的行视图
struct Row<'a> {
    row: usize,
    fields: HashMap<String, &'a str>,
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != ' ' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl<'a> Row<'a> {
    fn new(record: &'a RawRecord) -> Self {
        let fields = record
            .fields
            .iter()
            .map(|(k, v)| (normalize_key(k), v.as_str()))
            .collect();
        Self {
            row: record.line,
            fields,
        }
    }

    fn optional(&self, field: &str) -> Option<&'a str> {
        self.fields
            .get(&normalize_key(field))
            .copied()
            .filter(|v| !v.is_empty())
    }

    fn required(&self, field: &str) -> ImportResult<&'a str> {
        self.optional(field).ok_or_else(|| ImportError::MissingField {
            row: self.row,
            field: field.to_string(),
        })
    }

    fn number(&self, field: &str, default: Option<f64>) -> ImportResult<f64> {
        let raw = match (self.optional(field), default) {
            (Some(raw), _) => raw,
            (None, Some(d)) => return Ok(d),
            (None, None) => self.required(field)?,
        };
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ImportError::TypeConversionError {
                row: self.row,
                field: field.to_string(),
                message: format!("无法解析为数值: {}", raw),
            })
    }

    fn date(&self, field: &str) -> ImportResult<NaiveDate> {
        let raw = self.required(field)?;
        parse_date(raw).ok_or_else(|| ImportError::DateFormatError {
            row: self.row,
            field: field.to_string(),
            value: raw.to_string(),
        })
    }

    fn datetime_or(&self, field: &str, default: DateTime<Utc>) -> ImportResult<DateTime<Utc>> {
        match self.optional(field) {
            None => Ok(default),
            Some(raw) => parse_datetime(raw).ok_or_else(|| ImportError::DateFormatError {
                row: self.row,
                field: field.to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

/// 解析日期: YYYY-MM-DD 或 RFC 3339 (取 UTC 日期)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(raw).map(|dt| dt.date_naive()))
}

/// 解析时间: RFC 3339, 或 YYYY-MM-DD (UTC 零点)
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub struct FieldMapper;

impl FieldMapper {
    /// 映射产品进度记录
    ///
    /// # 说明
    /// - status 缺失时按数量派生; 非法值报错
    /// - last_updated 缺失时使用 `imported_at`
    pub fn map_products(
        records: &[RawRecord],
        imported_at: DateTime<Utc>,
    ) -> ImportResult<Vec<ProductProgress>> {
        records
            .iter()
            .map(|record| Self::map_product(&Row::new(record), imported_at))
            .collect()
    }

    fn map_product(row: &Row<'_>, imported_at: DateTime<Utc>) -> ImportResult<ProductProgress> {
        let mut product = ProductProgress {
            id: row.required("id")?.to_string(),
            job_id: row.required("job_id")?.to_string(),
            product_type: row.optional("product_type").unwrap_or("").to_string(),
            product_name: row.required("product_name")?.to_string(),
            total_quantity: row.number("total_quantity", None)?,
            completed_units: row.number("completed_units", Some(0.0))?,
            in_progress_units: row.number("in_progress_units", Some(0.0))?,
            estimated_hours_per_unit: row.number("estimated_hours_per_unit", None)?,
            actual_hours_spent: row.number("actual_hours_spent", Some(0.0))?,
            status: ProductStatus::NotStarted,
            last_updated: row.datetime_or("last_updated", imported_at)?,
        };

        product.status = match row.optional("status") {
            Some(raw) => ProductStatus::from_str(raw).ok_or_else(|| ImportError::TypeConversionError {
                row: row.row,
                field: "status".to_string(),
                message: format!("未知状态: {}", raw),
            })?,
            None => StatusDerivation::derive_status(&product),
        };

        Ok(product)
    }

    /// 映射每日进度记录
    pub fn map_daily_progress(records: &[RawRecord]) -> ImportResult<Vec<DailyProgressSummary>> {
        records
            .iter()
            .map(|record| {
                let row = Row::new(record);
                let workers = row.number("workers_on_site", Some(0.0))?;
                let mut day = DailyProgressSummary::new(
                    row.date("date")?,
                    row.number("units_completed", Some(0.0))?,
                    row.number("hours_worked", None)?,
                    workers.max(0.0).round() as u32,
                );
                day.efficiency = row.number("efficiency", Some(0.0))?;
                day.cumulative_progress = row.number("cumulative_progress", Some(0.0))?;
                day.target_progress = row.number("target_progress", Some(0.0))?;
                day.variance = row.number("variance", Some(0.0))?;
                Ok(day)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(line: usize, pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord {
            line,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn imported_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 6, 0, 0).unwrap()
    }

    #[test]
    fn test_map_product_with_derived_status() {
        let records = vec![record(2, &[
            ("id", "P-1"),
            ("job_id", "J-1"),
            ("product_name", "Balustrade"),
            ("total_quantity", "12"),
            ("completed_units", "4"),
            ("estimated_hours_per_unit", "2.5"),
        ])];

        let products = FieldMapper::map_products(&records, imported_at()).unwrap();
        assert_eq!(products[0].status, ProductStatus::InProgress);
        assert_eq!(products[0].actual_hours_spent, 0.0);
        assert_eq!(products[0].last_updated, imported_at());
    }

    #[test]
    fn test_map_product_reports_row_and_field() {
        let records = vec![
            record(2, &[
                ("id", "P-1"),
                ("job_id", "J-1"),
                ("product_name", "A"),
                ("total_quantity", "1"),
                ("estimated_hours_per_unit", "1"),
            ]),
            record(5, &[
                ("id", "P-2"),
                ("job_id", "J-1"),
                ("product_name", "B"),
                ("total_quantity", "many"),
                ("estimated_hours_per_unit", "1"),
            ]),
        ];

        let err = FieldMapper::map_products(&records, imported_at()).unwrap_err();
        match err {
            ImportError::TypeConversionError { row, field, .. } => {
                assert_eq!(row, 5);
                assert_eq!(field, "total_quantity");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_map_product_rejects_unknown_status() {
        let records = vec![record(2, &[
            ("id", "P-1"),
            ("job_id", "J-1"),
            ("product_name", "A"),
            ("total_quantity", "1"),
            ("estimated_hours_per_unit", "1"),
            ("status", "paused"),
        ])];
        assert!(FieldMapper::map_products(&records, imported_at()).is_err());
    }

    #[test]
    fn test_map_daily_accepts_camel_case_headers() {
        let records = vec![record(1, &[
            ("date", "2026-09-01"),
            ("unitsCompleted", "3"),
            ("hoursWorked", "24"),
            ("workersOnSite", "3"),
        ])];

        let days = FieldMapper::map_daily_progress(&records).unwrap();
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        assert_eq!(days[0].hours_worked, 24.0);
        assert_eq!(days[0].workers_on_site, 3);
    }

    #[test]
    fn test_map_daily_missing_hours_is_error() {
        let records = vec![record(1, &[("date", "2026-09-01")])];
        let err = FieldMapper::map_daily_progress(&records).unwrap_err();
        assert!(matches!(err, ImportError::MissingField { row: 1, .. }));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        assert_eq!(parse_date("2026-09-01"), Some(expected));
        assert_eq!(parse_date("2026-09-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_date("01/09/2026"), None);
    }
}
