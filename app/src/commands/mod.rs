/// 命令模块
///
/// 包含展示层可调用的所有命令:
/// - scrape_commands: 启动/停止/等待爬取
/// - data_commands: 统计、筛选、详情与清空
/// - export_commands: CSV / Excel 导出
pub mod data_commands;
pub mod export_commands;
pub mod scrape_commands;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{ExportError, ScrapeError};

/// 命令执行错误
///
/// `code` 是稳定的机器可读错误码,`error` 是给用户看的提示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandError {
    pub error: String,
    pub code: String,
}

impl CommandError {
    fn new(code: &str, message: String) -> Self {
        Self {
            error: message,
            code: code.to_string(),
        }
    }

    pub(crate) fn invalid_keyword() -> Self {
        Self::new("INVALID_KEYWORD", "请输入搜索关键词！".to_string())
    }

    pub(crate) fn invalid_request(err: &ScrapeError) -> Self {
        Self::new("INVALID_REQUEST", err.to_string())
    }

    pub(crate) fn scrape_in_progress() -> Self {
        Self::new(
            "SCRAPE_IN_PROGRESS",
            "已有爬取正在进行,请先停止或等待完成".to_string(),
        )
    }

    pub(crate) fn no_active_scrape() -> Self {
        Self::new("NO_ACTIVE_SCRAPE", "当前没有正在进行的爬取".to_string())
    }

    pub(crate) fn no_data() -> Self {
        Self::new("NO_DATA", "没有数据可导出！".to_string())
    }

    pub(crate) fn export_failed(details: &str) -> Self {
        Self::new("EXPORT_FAILED", format!("导出失败: {}", details))
    }

    pub(crate) fn scrape_failed(err: &ScrapeError) -> Self {
        Self::new("SCRAPE_FAILED", format!("爬取过程中出现错误：{}", err))
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.error)
    }
}

impl std::error::Error for CommandError {}

impl From<ExportError> for CommandError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NoData => CommandError::no_data(),
            other => CommandError::export_failed(&other.to_string()),
        }
    }
}
