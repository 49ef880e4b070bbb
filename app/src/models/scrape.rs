//! 爬取请求、进度事件与结果

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::errors::ScrapeError;
use super::post::PostTable;

/// 爬取页数范围
pub const MIN_PAGES: u32 = 1;
pub const MAX_PAGES: u32 = 20;

/// 请求间隔范围 (秒)
pub const MIN_DELAY_SECS: f64 = 1.0;
pub const MAX_DELAY_SECS: f64 = 10.0;

/// 爬取请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub keyword: String,
    pub max_pages: u32,
    /// 两页之间的等待秒数
    pub delay_secs: f64,
}

impl SearchRequest {
    pub fn new(keyword: impl Into<String>, max_pages: u32, delay_secs: f64) -> Self {
        Self {
            keyword: keyword.into().trim().to_string(),
            max_pages,
            delay_secs,
        }
    }

    pub fn validate(&self) -> Result<(), ScrapeError> {
        if self.keyword.trim().is_empty() {
            return Err(ScrapeError::InvalidRequest("请输入搜索关键词".to_string()));
        }

        if !(MIN_PAGES..=MAX_PAGES).contains(&self.max_pages) {
            return Err(ScrapeError::InvalidRequest(format!(
                "爬取页数必须在 {}-{} 之间,当前为 {}",
                MIN_PAGES, MAX_PAGES, self.max_pages
            )));
        }

        if !self.delay_secs.is_finite()
            || !(MIN_DELAY_SECS..=MAX_DELAY_SECS).contains(&self.delay_secs)
        {
            return Err(ScrapeError::InvalidRequest(format!(
                "请求间隔必须在 {:.1}-{:.1} 秒之间,当前为 {}",
                MIN_DELAY_SECS, MAX_DELAY_SECS, self.delay_secs
            )));
        }

        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_secs.max(0.0))
    }
}

/// 爬取进度事件
///
/// 只携带进度信息,帖子数据在爬取完成后一次性交付。
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeEvent {
    pub scrape_id: Uuid,
    pub event_type: ScrapeEventType,
    pub timestamp: DateTime<Utc>,
}

impl ScrapeEvent {
    pub fn new(scrape_id: Uuid, event_type: ScrapeEventType) -> Self {
        Self {
            scrape_id,
            event_type,
            timestamp: Utc::now(),
        }
    }
}

/// 爬取事件类型
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ScrapeEventType {
    /// 开始爬取
    Started { keyword: String, delay_secs: f64 },
    /// 一页完成
    PageFetched {
        page: u32,
        page_posts: usize,
        total_posts: usize,
    },
    /// 爬取完成
    Finished { total_posts: usize, duration_ms: u64 },
    /// 发生错误
    Failed { error: String },
    /// 用户取消
    Cancelled,
}

/// 一次爬取的最终结果
///
/// 区分"没有结果"与"爬取失败",两者对用户的提示不同。
#[derive(Debug)]
pub enum ScrapeOutcome {
    Completed(PostTable),
    Empty,
    Failed(ScrapeError),
    Cancelled,
}

impl ScrapeOutcome {
    /// 根据爬取函数的返回值归类
    pub fn from_result(result: Result<PostTable, ScrapeError>) -> Self {
        match result {
            Ok(table) if table.is_empty() => ScrapeOutcome::Empty,
            Ok(table) => ScrapeOutcome::Completed(table),
            Err(ScrapeError::Cancelled) => ScrapeOutcome::Cancelled,
            Err(e) => ScrapeOutcome::Failed(e),
        }
    }
}
