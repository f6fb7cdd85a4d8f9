//! 配置模块，负责加载JSON配置文件

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("配置错误: 配置文件不存在: {}", .path.display())]
    Missing { path: PathBuf },
    #[error("配置错误: 无法读取配置文件 {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("配置错误: 无法解析JSON配置文件 {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 搜索会话的配置，所有字段都有默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 主显示字段，导出时呈现为带链接的单元格
    pub title_field: String,
    /// 平台返回格式化值时附加在字段名后的后缀
    pub formatted_value_suffix: String,
    /// 记录链接模板，`{id}` 替换为行标识
    pub record_url_template: String,
    /// 保存视图时每列的宽度
    pub column_width: u32,
    /// 日志级别，作为 `EnvFilter` 指令使用
    pub log_level: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            title_field: "title".to_string(),
            formatted_value_suffix: "@OData.Community.Display.V1.FormattedValue".to_string(),
            record_url_template: "/main.aspx?etn=incident&pagetype=entityrecord&id={id}".to_string(),
            column_width: 150,
            log_level: "info".to_string(),
        }
    }
}

impl SearchConfig {
    /// 从JSON文件加载配置，缺省的字段取默认值
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        // 检查文件是否存在
        if !path_ref.exists() {
            return Err(ConfigError::Missing {
                path: path_ref.to_path_buf(),
            });
        }

        // 读取文件内容
        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_ref.to_path_buf(),
            source,
        })?;

        // 解析JSON
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path_ref.to_path_buf(),
            source,
        })
    }

    /// 生成记录链接
    pub fn record_url(&self, id: &str) -> String {
        self.record_url_template.replace("{id}", id)
    }

    /// 字段对应的格式化值键
    pub fn formatted_key(&self, column: &str) -> String {
        format!("{}{}", column, self.formatted_value_suffix)
    }
}
