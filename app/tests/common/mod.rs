//! 测试公共模块
//!
//! 提供假的帖子来源和样例数据,避免测试依赖真实的微博接口。
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use weibo_search::models::{Post, PostTable, ScrapeError, SearchRequest};
use weibo_search::services::{PostSource, ProgressReporter};

/// 假帖子来源
///
/// 按预设的分页数据返回结果,支持:
/// - 每页等待 (用于测试取消)
/// - 在所有页之后失败 (用于测试错误路径)
/// 忽略请求中的间隔设置,测试不需要真的等待。
pub struct FakeSource {
    pages: Vec<Vec<Post>>,
    page_delay: Duration,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_pages(pages: Vec<Vec<Post>>) -> Self {
        Self {
            pages,
            page_delay: Duration::ZERO,
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// 没有任何结果
    pub fn empty() -> Self {
        Self::with_pages(Vec::new())
    }

    /// 抓取完所有页后以网络错误结束
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::with_pages(vec![vec![post(900u64, "X", "partial", 1, 1, 1)]])
        }
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PostSource for FakeSource {
    async fn search(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
        progress: &ProgressReporter,
    ) -> Result<PostTable, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut posts = Vec::new();
        for (i, page) in self.pages.iter().take(request.max_pages as usize).enumerate() {
            tokio::select! {
                _ = cancel.cancelled() => return Err(ScrapeError::Cancelled),
                _ = tokio::time::sleep(self.page_delay) => {}
            }
            posts.extend(page.iter().cloned());
            progress.page_fetched(i as u32 + 1, page.len(), posts.len());
        }

        if let Some(message) = &self.fail_with {
            return Err(ScrapeError::NetworkFailed(message.clone()));
        }

        Ok(PostTable::from(posts))
    }
}

/// 构造帖子
pub fn post(id: u64, author: &str, content: &str, reposts: u64, comments: u64, likes: u64) -> Post {
    Post::new(id, author, content)
        .with_published_at("2025-10-07 12:34:56")
        .with_counts(reposts, comments, likes)
        .with_url(format!("https://m.weibo.cn/detail/{}", id))
}

/// 两条帖子的基准表: a 互动 1/2/3, b 互动 10/0/0
pub fn example_table() -> PostTable {
    PostTable::from(vec![
        Post::new(1u64, "a", "hello").with_counts(1, 2, 3),
        Post::new(2u64, "b", "world").with_counts(10, 0, 0),
    ])
}

/// 覆盖多位作者、多个时段和缺失字段的样例表
pub fn sample_table() -> PostTable {
    PostTable::from(vec![
        post(101, "小明", "今天学习了 Rust 的所有权", 5, 3, 20)
            .with_published_at("2025-10-07 09:15:00"),
        post(102, "小红", "周末去爬山,风景很好", 0, 1, 2).with_published_at("2025-10-07 14:02:11"),
        post(103, "小明", "借用检查器终于不报错了", 12, 8, 100)
            .with_published_at("2025-10-07 09:48:30"),
        post(104, "阿强", "", 0, 0, 0).with_published_at("N/A"),
        post(105, "小红", "晚饭吃了火锅", 1, 0, 5).with_published_at("2025-10-06 21:30:00"),
        Post::new(106u64, "路人", "").without_content(),
    ])
}

/// 分成两页的样例数据
pub fn sample_pages() -> Vec<Vec<Post>> {
    let posts = sample_table().into_posts();
    let (first, second) = posts.split_at(3);
    vec![first.to_vec(), second.to_vec()]
}
