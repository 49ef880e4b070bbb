use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use weibo_search::commands::data_commands::{self, DEFAULT_DETAIL_LIMIT};
use weibo_search::commands::{export_commands, scrape_commands, CommandError};
use weibo_search::models::{ScrapeEvent, ScrapeEventType, SearchRequest};
use weibo_search::services::{AuthorSelector, ConfigService, ExportFormat, WeiboSearchClient};
use weibo_search::state::{AppState, SharedState};
use weibo_search::utils::logger;

#[derive(Parser)]
#[command(name = "weibo-search")]
#[command(about = "微博关键词搜索: 爬取、统计、筛选与导出")]
#[command(version)]
struct Cli {
    /// 搜索关键词
    keyword: String,

    /// 爬取页数 (1-20),默认取配置
    #[arg(long)]
    pages: Option<u32>,

    /// 请求间隔秒数 (1.0-10.0),默认取配置
    #[arg(long)]
    delay: Option<f64>,

    /// 只显示该作者的微博 ("全部" 表示不限)
    #[arg(long, default_value = "全部")]
    author: String,

    /// 最小互动数 (转发+评论+点赞)
    #[arg(long, default_value_t = 0)]
    min_engagement: u64,

    /// 导出CSV,省略路径时写入配置的导出目录
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    csv: Option<Option<PathBuf>>,

    /// 导出Excel,省略路径时写入配置的导出目录
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    xlsx: Option<Option<PathBuf>>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigService::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("配置加载失败: {}", e);
            std::process::exit(2);
        }
    };

    // guard必须存活到进程退出
    let _log_guard = logger::init(&config.log).expect("日志系统初始化失败");

    let client = match WeiboSearchClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("HTTP客户端初始化失败: {}", e);
            std::process::exit(2);
        }
    };

    let request = SearchRequest::new(
        cli.keyword.as_str(),
        cli.pages.unwrap_or(config.default_pages),
        cli.delay.unwrap_or(config.default_delay_secs),
    );
    let state = AppState::shared(config);

    if let Err(e) = run(&cli, &state, client, request).await {
        eprintln!("{}", e.error);
        std::process::exit(1);
    }
}

async fn run(
    cli: &Cli,
    state: &SharedState,
    client: Arc<WeiboSearchClient>,
    request: SearchRequest,
) -> Result<(), CommandError> {
    let started = scrape_commands::start_scrape(state, client, request).await?;
    println!("开始爬取: {}", started.keyword);

    // Ctrl-C 只停止爬取,结果仍走正常收尾
    let stopper = Arc::clone(state);
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = scrape_commands::stop_scrape(&stopper).await;
        }
    });

    let report = scrape_commands::wait_scrape(state, print_progress).await;
    ctrl_c.abort();
    let report = report?;
    println!("{}", report.message);

    if report.status != scrape_commands::ScrapeStatus::Completed {
        return Ok(());
    }

    print_stats(state).await;

    let author = AuthorSelector::from_label(&cli.author);
    let rows = data_commands::filter_posts(state, author, cli.min_engagement).await;
    println!("\n筛选结果: {} 条", rows.len());
    for row in &rows {
        println!(
            "[{}] {} | {} | {} | 转发 {} 评论 {} 点赞 {}",
            row.index + 1,
            row.author,
            row.published_at,
            row.preview,
            row.reposts,
            row.comments,
            row.likes
        );
    }

    print_details(state).await;

    if let Some(path) = &cli.csv {
        let path = export_path(state, path.as_ref(), ExportFormat::Csv).await;
        let summary = export_commands::export_csv(state, &path).await?;
        println!("数据已导出到: {}", summary.file_path.display());
    }
    if let Some(path) = &cli.xlsx {
        let path = export_path(state, path.as_ref(), ExportFormat::Xlsx).await;
        let summary = export_commands::export_excel(state, &path).await?;
        println!("数据已导出到: {}", summary.file_path.display());
    }

    Ok(())
}

async fn export_path(
    state: &SharedState,
    explicit: Option<&PathBuf>,
    format: ExportFormat,
) -> PathBuf {
    match explicit {
        Some(path) => path.clone(),
        None => export_commands::default_export_path(state, format).await,
    }
}

fn print_progress(event: ScrapeEvent) {
    match event.event_type {
        ScrapeEventType::Started { delay_secs, .. } => {
            println!("开始爬取，请求间隔: {:.1}秒", delay_secs);
        }
        ScrapeEventType::PageFetched {
            page,
            page_posts,
            total_posts,
        } => {
            println!("第 {} 页: {} 条,累计 {} 条", page, page_posts, total_posts);
        }
        ScrapeEventType::Finished { duration_ms, .. } => {
            println!("爬取结束,耗时 {:.1} 秒", duration_ms as f64 / 1000.0);
        }
        ScrapeEventType::Failed { .. } => println!("爬取出错"),
        ScrapeEventType::Cancelled => println!("爬取已停止"),
    }
}

async fn print_stats(state: &SharedState) {
    if let Some(stats) = data_commands::get_basic_stats(state).await {
        println!("\n基础统计");
        for (name, value) in stats.metric_rows() {
            println!("  {}: {}", name, value);
        }
    }

    if let Some(distribution) = data_commands::get_time_distribution(state).await {
        println!("\n发布时间分布");
        for (hour, count) in &distribution {
            println!("  {:02}时: {} 条", hour, count);
        }
    }

    if let Some(authors) = data_commands::get_author_stats(state).await {
        println!("\n活跃作者 TOP{}", authors.len());
        for author in &authors {
            println!(
                "  {}: {} 条 (转发 {} 评论 {} 点赞 {})",
                author.author, author.post_count, author.reposts, author.comments, author.likes
            );
        }
    }

    if let Some(lengths) = data_commands::get_content_length_stats(state).await {
        println!("\n内容长度");
        println!(
            "  平均 {:.1} / 最长 {} / 最短 {} / 中位数 {:.1}",
            lengths.mean, lengths.max, lengths.min, lengths.median
        );
    }
}

async fn print_details(state: &SharedState) {
    let details = data_commands::post_details(state, DEFAULT_DETAIL_LIMIT).await;

    println!("\n微博详细信息");
    println!("{}", "=".repeat(50));
    for entry in &details.entries {
        println!("【{}】作者: {}", entry.number, entry.author);
        println!("发布时间: {}", entry.published_at);
        println!("内容: {}", entry.content);
        println!(
            "互动数据: 转发 {} | 评论 {} | 点赞 {}",
            entry.reposts, entry.comments, entry.likes
        );
        if let Some(url) = &entry.url {
            println!("链接: {}", url);
        }
        println!("{}", "-".repeat(50));
    }
    if details.remaining > 0 {
        println!("... 还有 {} 条数据", details.remaining);
    }
}
