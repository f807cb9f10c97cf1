// ==========================================
// 施工现场工时进度引擎 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv) / JSON 数组 (.json)
// 输出: 原始记录 (源位置 + 表头 → 字符串值)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始记录
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// 源位置: CSV 为文件行号 (表头为第 1 行), JSON 为数组元素序号 (从 1 开始)
    pub line: usize,
    /// 字段名 → 去空白后的字符串值
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

// ==========================================
// Trait: FileParser
// ==========================================
pub trait FileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}

/// 按扩展名选择解析器
pub fn parser_for(path: &Path) -> ImportResult<Box<dyn FileParser>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "csv" => Ok(Box::new(CsvParser)),
        "json" => Ok(Box::new(JsonParser)),
        other => Err(ImportError::UnsupportedFormat(other.to_string())),
    }
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;

        let content = std::fs::read(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(content.as_slice());

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // 读取所有行
        let mut lines = LineTracker::new(&content);
        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record
                .position()
                .map_or(0, |pos| lines.line_at(pos.byte() as usize));
            let mut fields = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if fields.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(RawRecord { line, fields });
        }

        tracing::debug!("CSV 解析完成: {} 行, 文件 {}", records.len(), file_path.display());
        Ok(records)
    }
}

/// 记录起始字节 → 文件行号
///
/// csv 给出的记录位置是上一条记录的结束处, 被跳过的空行会算在下一条记录前面,
/// 这里先越过换行符再计数. 偏移需单调递增.
struct LineTracker<'a> {
    content: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineTracker<'a> {
    fn new(content: &'a [u8]) -> Self {
        Self {
            content,
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, byte: usize) -> usize {
        let len = self.content.len();
        let mut start = byte.min(len);
        while start < len && matches!(self.content[start], b'\n' | b'\r') {
            start += 1;
        }
        if start > self.offset {
            self.line += self.content[self.offset..start]
                .iter()
                .filter(|b| **b == b'\n')
                .count();
            self.offset = start;
        }
        self.line
    }
}

// ==========================================
// JSON Parser 实现
// ==========================================
// 顶层必须为对象数组; 标量值转为字符串, null 视为空
pub struct JsonParser;

impl FileParser for JsonParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;

        let file = File::open(file_path)?;
        let parsed: Vec<serde_json::Map<String, Value>> = serde_json::from_reader(file)?;

        let records: Vec<RawRecord> = parsed
            .into_iter()
            .enumerate()
            .map(|(idx, object)| RawRecord {
                line: idx + 1,
                fields: object
                    .into_iter()
                    .map(|(k, v)| {
                        let text = match v {
                            Value::Null => String::new(),
                            Value::String(s) => s.trim().to_string(),
                            other => other.to_string(),
                        };
                        (k.trim().to_string(), text)
                    })
                    .collect(),
            })
            .collect();

        tracing::debug!("JSON 解析完成: {} 条, 文件 {}", records.len(), file_path.display());
        Ok(records)
    }
}
