use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::models::{AppConfig, Post, PostTable};
use crate::services::filter_engine::distinct_authors;
use crate::services::{AuthorSelector, PostFilter, ScrapeHandle};

/// 命令层共享的状态句柄
pub type SharedState = Arc<Mutex<AppState>>;

/// 正在进行的爬取
///
/// 句柄在等待期间会被移出,取消令牌始终留在这里供停止操作使用。
pub struct ActiveScrape {
    pub id: Uuid,
    pub keyword: String,
    cancel: CancellationToken,
    handle: Option<ScrapeHandle>,
}

impl ActiveScrape {
    pub fn new(handle: ScrapeHandle) -> Self {
        Self {
            id: handle.id,
            keyword: handle.request.keyword.clone(),
            cancel: handle.cancel_token(),
            handle: Some(handle),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// 移出句柄以便等待结果,已被移出时返回 `None`
    pub fn take_handle(&mut self) -> Option<ScrapeHandle> {
        self.handle.take()
    }
}

/// 应用全局状态
///
/// - table: 最近一次成功爬取的帖子表,只会被整体替换
/// - filter: 当前生效的筛选条件
/// - active_scrape: 同一时刻至多一个爬取
pub struct AppState {
    pub config: AppConfig,
    table: PostTable,
    filter: PostFilter,
    active_scrape: Option<ActiveScrape>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        tracing::info!(config = %config.summary_for_logging(), "AppState initialized");

        Self {
            config,
            table: PostTable::new(),
            filter: PostFilter::default(),
            active_scrape: None,
        }
    }

    pub fn shared(config: AppConfig) -> SharedState {
        Arc::new(Mutex::new(Self::new(config)))
    }

    pub fn table(&self) -> &PostTable {
        &self.table
    }

    pub fn filter(&self) -> &PostFilter {
        &self.filter
    }

    pub fn has_data(&self) -> bool {
        !self.table.is_empty()
    }

    /// 整体替换帖子表,筛选条件重置为 全部/0
    pub fn replace_table(&mut self, table: PostTable) {
        tracing::info!(
            previous = self.table.len(),
            current = table.len(),
            "替换帖子表"
        );
        self.table = table;
        self.filter = PostFilter::default();
    }

    /// 清空数据和筛选条件,不影响正在进行的爬取
    pub fn clear(&mut self) {
        self.table = PostTable::new();
        self.filter = PostFilter::default();
    }

    pub fn set_filter(&mut self, filter: PostFilter) {
        self.filter = filter;
    }

    /// 当前筛选条件下可见的帖子
    pub fn visible_posts(&self) -> Vec<&Post> {
        self.table.iter().filter(|p| self.filter.matches(p)).collect()
    }

    pub fn author_options(&self) -> Vec<AuthorSelector> {
        distinct_authors(&self.table)
    }

    pub fn active_scrape(&self) -> Option<&ActiveScrape> {
        self.active_scrape.as_ref()
    }

    pub fn active_scrape_mut(&mut self) -> Option<&mut ActiveScrape> {
        self.active_scrape.as_mut()
    }

    pub fn is_scraping(&self) -> bool {
        self.active_scrape.is_some()
    }

    /// 登记新的爬取;已有爬取时原样退回句柄
    pub fn begin_scrape(&mut self, handle: ScrapeHandle) -> Result<Uuid, ScrapeHandle> {
        if self.active_scrape.is_some() {
            return Err(handle);
        }
        let active = ActiveScrape::new(handle);
        let id = active.id;
        self.active_scrape = Some(active);
        Ok(id)
    }

    pub fn end_scrape(&mut self) -> Option<ActiveScrape> {
        self.active_scrape.take()
    }
}
