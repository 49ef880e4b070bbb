//! 微博关键词搜索数据采集与分析
//!
//! - models: 帖子、统计、爬取请求/事件、配置与错误类型
//! - services: 爬取、聚合、筛选、导出
//! - commands: 展示层调用的命令
//! - state: 应用状态
//! - utils: 日志、正文清理、时间处理

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
