//! 数据查询命令
//!
//! 统计类命令作用于完整帖子表,筛选只影响列表展示。

use serde::Serialize;

use crate::models::{AuthorStats, BasicStats, ContentLengthStats, HourlyDistribution, Post};
use crate::services::aggregator::{
    compute_author_stats, compute_basic_stats, compute_content_length_stats,
    compute_time_distribution,
};
use crate::services::filter_engine::{content_preview, DEFAULT_PREVIEW_LIMIT};
use crate::services::{AuthorSelector, PostFilter};
use crate::state::SharedState;

/// 详情视图默认展示条数
pub const DEFAULT_DETAIL_LIMIT: usize = 10;

/// 列表行
///
/// `index` 是帖子在完整表中的位置,用于打开链接等后续操作。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRow {
    pub index: usize,
    pub author: String,
    pub preview: String,
    pub published_at: String,
    pub reposts: u64,
    pub comments: u64,
    pub likes: u64,
}

impl PostRow {
    fn from_post(index: usize, post: &Post) -> Self {
        Self {
            index,
            author: post.author.clone(),
            preview: content_preview(post.content_text(), DEFAULT_PREVIEW_LIMIT),
            published_at: post.published_at.clone(),
            reposts: post.reposts,
            comments: post.comments,
            likes: post.likes,
        }
    }
}

/// 单条帖子的完整信息
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    /// 从 1 开始的序号
    pub number: usize,
    pub author: String,
    pub published_at: String,
    pub content: String,
    pub reposts: u64,
    pub comments: u64,
    pub likes: u64,
    pub url: Option<String>,
}

/// 详情视图: 前若干条完整信息 + 未展示条数
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetails {
    pub entries: Vec<PostDetail>,
    pub remaining: usize,
}

pub async fn get_basic_stats(state: &SharedState) -> Option<BasicStats> {
    compute_basic_stats(state.lock().await.table())
}

pub async fn get_time_distribution(state: &SharedState) -> Option<HourlyDistribution> {
    compute_time_distribution(state.lock().await.table())
}

pub async fn get_author_stats(state: &SharedState) -> Option<Vec<AuthorStats>> {
    compute_author_stats(state.lock().await.table())
}

pub async fn get_content_length_stats(state: &SharedState) -> Option<ContentLengthStats> {
    compute_content_length_stats(state.lock().await.table())
}

/// 应用筛选条件并返回可见行
///
/// 筛选条件会保存到状态中,直到下次筛选或数据被替换。
pub async fn filter_posts(
    state: &SharedState,
    author: AuthorSelector,
    min_engagement: u64,
) -> Vec<PostRow> {
    let mut guard = state.lock().await;
    let filter = PostFilter::new(author, min_engagement);

    let rows: Vec<PostRow> = guard
        .table()
        .iter()
        .enumerate()
        .filter(|(_, post)| filter.matches(post))
        .map(|(index, post)| PostRow::from_post(index, post))
        .collect();

    tracing::debug!(
        author = %filter.author,
        min_engagement = filter.min_engagement,
        visible = rows.len(),
        total = guard.table().len(),
        "筛选完成"
    );

    guard.set_filter(filter);
    rows
}

/// 作者下拉选项
pub async fn author_options(state: &SharedState) -> Vec<AuthorSelector> {
    state.lock().await.author_options()
}

/// 前 `limit` 条帖子的完整信息
pub async fn post_details(state: &SharedState, limit: usize) -> PostDetails {
    let guard = state.lock().await;
    let table = guard.table();

    let entries = table
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, post)| PostDetail {
            number: i + 1,
            author: post.author.clone(),
            published_at: post.published_at.clone(),
            content: post.content_text().to_string(),
            reposts: post.reposts,
            comments: post.comments,
            likes: post.likes,
            url: post.url.clone(),
        })
        .collect();

    PostDetails {
        entries,
        remaining: table.len().saturating_sub(limit),
    }
}

/// 完整表中第 `index` 条帖子的链接
pub async fn post_url(state: &SharedState, index: usize) -> Option<String> {
    state
        .lock()
        .await
        .table()
        .get(index)
        .and_then(|post| post.url.clone())
}

/// 清空数据
pub async fn clear_data(state: &SharedState) {
    let mut guard = state.lock().await;
    let cleared = guard.table().len();
    guard.clear();
    tracing::info!(cleared, "数据已清空");
}
