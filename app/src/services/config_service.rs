use crate::models::{AppConfig, ConfigError, LogConfig};
use std::path::PathBuf;
use std::str::FromStr;

/// 配置服务
///
/// 从环境变量(以及当前目录或上层目录的 .env 文件)加载应用配置:
/// - WEIBO_BASE_URL: 搜索接口地址 (默认: https://m.weibo.cn)
/// - WEIBO_COOKIE: 请求Cookie (可选)
/// - WEIBO_USER_AGENT: 请求UA
/// - WEIBO_REQUEST_TIMEOUT_SECS: 请求超时 (默认: 15)
/// - WEIBO_DEFAULT_PAGES: 默认页数 (默认: 5)
/// - WEIBO_DEFAULT_DELAY_SECS: 默认请求间隔 (默认: 2.0)
/// - WEIBO_EXPORT_DIR: 导出目录 (默认: 系统下载目录)
/// - WEIBO_LOG_DIR / WEIBO_LOG_LEVEL: 日志目录与级别
pub struct ConfigService;

impl ConfigService {
    /// 加载 .env 后从进程环境变量读取配置
    ///
    /// # 错误处理
    /// - .env 文件不存在时忽略(不报错)
    /// - .env 文件格式错误时返回 IoError
    /// - 数值格式错误时返回 InvalidValue
    pub fn load() -> Result<AppConfig, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::info!(path = %path.display(), "已加载 .env 文件");
            }
            Err(e) if e.not_found() => {
                tracing::debug!("未找到 .env 文件,仅使用进程环境变量");
            }
            Err(e) => return Err(ConfigError::IoError(e.to_string())),
        }

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::info!(config = %config.summary_for_logging(), "已加载应用配置");
        Ok(config)
    }

    /// 通过查找函数构建配置
    ///
    /// 测试中传入闭包即可,无需修改进程环境变量
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let config = AppConfig {
            base_url: get("WEIBO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            cookie: get("WEIBO_COOKIE"),
            user_agent: get("WEIBO_USER_AGENT").unwrap_or(defaults.user_agent),
            request_timeout_secs: parse_or(
                "WEIBO_REQUEST_TIMEOUT_SECS",
                get("WEIBO_REQUEST_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            )?,
            default_pages: parse_or(
                "WEIBO_DEFAULT_PAGES",
                get("WEIBO_DEFAULT_PAGES"),
                defaults.default_pages,
            )?,
            default_delay_secs: parse_or(
                "WEIBO_DEFAULT_DELAY_SECS",
                get("WEIBO_DEFAULT_DELAY_SECS"),
                defaults.default_delay_secs,
            )?,
            export_dir: get("WEIBO_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            log: LogConfig {
                dir: get("WEIBO_LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.log.dir),
                level: get("WEIBO_LOG_LEVEL").unwrap_or(defaults.log.level),
            },
        };

        if config.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "WEIBO_REQUEST_TIMEOUT_SECS".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(config)
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}
