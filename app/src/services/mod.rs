//! 服务层模块
//!
//! 包含所有业务逻辑服务:
//! - `weibo_search`: 微博搜索接口客户端,按页抓取帖子
//! - `scrape_runner`: 在后台任务中执行爬取,推送进度并交付结果
//! - `aggregator`: 帖子表的统计聚合
//! - `filter_engine`: 作者/互动数筛选与内容预览
//! - `exporter`: CSV / Excel 导出
//! - `config_service`: 从环境变量加载配置
//!
//! # 服务架构
//!
//! ```text
//! ┌─────────────────┐
//! │    Commands     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌──────────────────────────────────────┐
//! │         Services Layer               │
//! │  ┌──────────────┐  ┌──────────────┐ │
//! │  │ ScrapeRunner │  │  Aggregator  │ │
//! │  └──────┬───────┘  │ FilterEngine │ │
//! │         │          │   Exporter   │ │
//! │  ┌──────▼───────┐  └──────────────┘ │
//! │  │ WeiboSearch  │                   │
//! │  └──────────────┘                   │
//! └──────────────────────────────────────┘
//!          │
//!          ▼
//!    m.weibo.cn
//! ```

pub mod aggregator;
pub mod config_service;
pub mod exporter;
pub mod filter_engine;
pub mod scrape_runner;
pub mod weibo_search;

// 重导出常用类型,简化外部引用
pub use config_service::ConfigService;
pub use exporter::{ExportFormat, ExportSummary};
pub use filter_engine::{AuthorSelector, PostFilter};
pub use scrape_runner::{ProgressReporter, ScrapeHandle, ScrapeRunner};
pub use weibo_search::{PostSource, WeiboSearchClient};
