//! 工具模块
//!
//! - logger: 日志系统初始化与结构化日志宏
//! - text: 微博正文清理
//! - time_utils: 发布时间解析与规范化

pub mod logger;
pub mod text;
pub mod time_utils;
