//! 导出行映射
//!
//! 把查询返回的行（字段名到 JSON 值）按输出列顺序转换成表格单元格。
//! 平台为选项集、查找等字段额外返回带后缀的格式化值，存在时优先使用。

use crate::config::SearchConfig;
use serde_json::{Map, Value};

/// 导出表格中的一个单元格
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Text(String),
    /// 主显示字段：显示文本加可跳转的记录链接
    Link { display: String, url: String },
}

/// 按固定列顺序映射结果行
#[derive(Debug, Clone)]
pub struct RowMapper {
    columns: Vec<String>,
    row_identifier: String,
    config: SearchConfig,
}

impl RowMapper {
    pub fn new(columns: Vec<String>, row_identifier: &str, config: SearchConfig) -> Self {
        Self {
            columns,
            row_identifier: row_identifier.to_string(),
            config,
        }
    }

    /// 表头，与输出列一致
    pub fn header(&self) -> &[String] {
        &self.columns
    }

    pub fn map_row(&self, row: &Map<String, Value>) -> Vec<Cell> {
        self.columns.iter().map(|column| self.map_cell(column, row)).collect()
    }

    fn map_cell(&self, column: &str, row: &Map<String, Value>) -> Cell {
        if column == self.row_identifier {
            return text_cell(row.get(column));
        }

        if column == self.config.title_field {
            let Some(display) = row.get(column).and_then(cell_text) else {
                return Cell::Empty;
            };
            let id = row
                .get(&self.row_identifier)
                .and_then(cell_text)
                .unwrap_or_default();
            return Cell::Link {
                display,
                url: self.config.record_url(&id),
            };
        }

        let formatted = row.get(&self.config.formatted_key(column)).and_then(cell_text);
        match formatted {
            Some(text) => Cell::Text(text),
            None => text_cell(row.get(column)),
        }
    }
}

fn text_cell(value: Option<&Value>) -> Cell {
    match value.and_then(cell_text) {
        Some(text) => Cell::Text(text),
        None => Cell::Empty,
    }
}

/// 标量转成文本，null 视为无值
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
