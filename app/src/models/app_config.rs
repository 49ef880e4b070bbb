use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 默认的桌面浏览器UA,微博移动端接口对缺省UA会直接拒绝
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 应用配置
///
/// 每个字段都对应一个 `WEIBO_*` 环境变量,未设置时取默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 微博搜索接口地址
    ///
    /// 默认: https://m.weibo.cn
    pub base_url: String,

    /// 请求时携带的Cookie (可选)
    ///
    /// 部分关键词未登录时结果较少,可填入浏览器中复制的Cookie
    pub cookie: Option<String>,

    pub user_agent: String,

    /// 单个请求超时 (秒)
    pub request_timeout_secs: u64,

    /// 默认爬取页数
    pub default_pages: u32,

    /// 默认请求间隔 (秒)
    pub default_delay_secs: f64,

    /// 导出文件目录
    pub export_dir: PathBuf,

    pub log: LogConfig,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志目录,按天轮转写入 JSON 日志
    pub dir: PathBuf,

    /// 未设置 RUST_LOG 时使用的过滤级别
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: "info".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://m.weibo.cn".to_string(),
            cookie: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 15,
            default_pages: 5,
            default_delay_secs: 2.0,
            export_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 生成用于日志记录的配置摘要
    ///
    /// Cookie 只记录是否存在,不记录内容
    pub fn summary_for_logging(&self) -> String {
        format!(
            "base_url={}, cookie={}, timeout={}s, pages={}, delay={:.1}s, export_dir={}",
            self.base_url,
            if self.cookie.is_some() { "***" } else { "none" },
            self.request_timeout_secs,
            self.default_pages,
            self.default_delay_secs,
            self.export_dir.display()
        )
    }
}
