use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 爬取相关错误
///
/// 处理与微博搜索接口交互时的各种失败场景。
/// "没有搜索结果"不属于错误,由空表表达。
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ScrapeError {
    /// 网络请求失败
    ///
    /// 可能原因:
    /// - 网络连接中断
    /// - 微博服务器不可达
    /// - 请求超时
    #[error("网络请求失败: {0}")]
    NetworkFailed(String),

    /// HTTP状态码错误
    ///
    /// 微博接口返回了非2xx状态码
    #[error("HTTP错误 {status}: {message}")]
    HttpStatusError { status: u16, message: String },

    /// 触发速率限制
    ///
    /// 微博接口返回418/429,通常意味着请求过于频繁
    #[error("请求过于频繁,已被限流 (HTTP {status})")]
    RateLimited { status: u16 },

    /// 响应格式无效
    ///
    /// 响应体不是预期的JSON结构
    #[error("响应格式无效: {0}")]
    InvalidResponse(String),

    /// 爬取参数无效
    #[error("爬取参数无效: {0}")]
    InvalidRequest(String),

    /// 后台爬取任务异常退出,没有交付结果
    #[error("爬取任务异常退出: {0}")]
    TaskFailed(String),

    /// 用户取消
    #[error("爬取已被取消")]
    Cancelled,
}

/// 导出相关错误
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ExportError {
    /// 没有可导出的数据
    #[error("没有数据可导出")]
    NoData,

    /// 文件写入失败 (路径不可写、磁盘已满等)
    #[error("文件写入失败: {0}")]
    Io(String),

    /// 工作簿生成失败
    #[error("Excel工作簿生成失败: {0}")]
    Workbook(String),
}

/// 配置加载错误
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ConfigError {
    /// 环境变量取值无效
    #[error("配置项 {key} 的值无效: {value}")]
    InvalidValue { key: String, value: String },

    /// I/O错误
    ///
    /// 读取 .env 文件时的文件系统错误
    #[error("I/O错误: {0}")]
    IoError(String),
}

/// 实现从reqwest::Error到ScrapeError的转换
impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScrapeError::NetworkFailed("请求超时".to_string())
        } else if err.is_connect() {
            ScrapeError::NetworkFailed("无法连接到服务器".to_string())
        } else if err.is_decode() {
            ScrapeError::InvalidResponse(err.to_string())
        } else {
            ScrapeError::NetworkFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(err: serde_json::Error) -> Self {
        ScrapeError::InvalidResponse(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                ExportError::Io(format!("没有写入权限: {}", err))
            }
            std::io::ErrorKind::NotFound => ExportError::Io(format!("目录不存在: {}", err)),
            _ => ExportError::Io(err.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        match err {
            rust_xlsxwriter::XlsxError::IoError(io) => ExportError::from(io),
            other => ExportError::Workbook(other.to_string()),
        }
    }
}
