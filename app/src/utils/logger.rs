use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::models::LogConfig;

/// 按 `LogConfig` 安装全局日志订阅器
///
/// - 文件: `{dir}/weibo-search.YYYY-MM-DD.log`,每行一条JSON,按天轮转
/// - 控制台: stderr,人类可读
/// - 级别: RUST_LOG 优先,其次是配置中的 level,都无效时为 info
///
/// 文件中的一条爬取完成记录:
/// ```json
/// {
///   "timestamp": "2025-10-07T10:30:45.123Z",
///   "level": "INFO",
///   "target": "weibo_search::services::scrape_runner",
///   "fields": {
///     "event_type": "ScrapeCompleted",
///     "total_posts": 87
///   }
/// }
/// ```
///
/// 调用方持有返回的 `WorkerGuard` 直到进程退出,guard 释放时会刷出缓冲的日志。
/// 全局订阅器已经存在时返回 `AlreadyExists`。
pub fn init(config: &LogConfig) -> Result<WorkerGuard, io::Error> {
    std::fs::create_dir_all(&config.dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("weibo-search")
        .filename_suffix("log")
        .build(&config.dir)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // 文件层
    let file_layer = fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false);

    // 控制台层: 输出到stderr,不干扰终端外壳在stdout上的结果
    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;

    Ok(guard)
}

/// 业务事件日志宏
///
/// 统一带上 `event_type` 字段,便于在JSON日志中按事件过滤。
pub mod macros {
    /// INFO级业务事件
    /// ```no_run
    /// use weibo_search::log_event;
    /// log_event!("ScrapeCompleted", keyword = "python", total_posts = 87);
    /// ```
    #[macro_export]
    macro_rules! log_event {
        ($event_type:expr, $($field:tt = $value:expr),* $(,)?) => {
            tracing::info!(
                event_type = $event_type,
                $($field = $value),*
            );
        };
    }

    /// ERROR级业务事件
    /// ```no_run
    /// use weibo_search::log_error;
    /// log_error!("ExportFailed", path = "/tmp/a.xlsx", error = "permission denied");
    /// ```
    #[macro_export]
    macro_rules! log_error {
        ($event_type:expr, $($field:tt = $value:expr),* $(,)?) => {
            tracing::error!(
                event_type = $event_type,
                $($field = $value),*
            );
        };
    }
}
