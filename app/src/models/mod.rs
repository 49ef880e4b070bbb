//! 数据模型模块
//!
//! 包含所有核心数据结构:
//! - errors: 错误类型定义 (爬取、导出、配置)
//! - post: 帖子记录与帖子表
//! - stats: 统计结果 (基础统计、作者统计、内容长度统计)
//! - scrape: 爬取请求、进度事件与最终结果
//! - app_config: 应用配置

pub mod app_config;
pub mod errors;
pub mod post;
pub mod scrape;
pub mod stats;

// 重导出常用类型,简化外部引用
pub use app_config::{AppConfig, LogConfig};
pub use errors::{ConfigError, ExportError, ScrapeError};
pub use post::{Post, PostId, PostTable, UNKNOWN_TIME};
pub use scrape::{ScrapeEvent, ScrapeEventType, ScrapeOutcome, SearchRequest};
pub use stats::{AuthorStats, BasicStats, ContentLengthStats, HourlyDistribution, MetricValue};
