//! 微博帖子模型
//!
//! 一次爬取得到的帖子以固定字段的记录保存,而不是以列名为键的动态表。
//! `PostTable` 保持爬取顺序,由调用方独占持有;统计与筛选只读取它。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 未知发布时间的标记
pub const UNKNOWN_TIME: &str = "N/A";

/// 帖子标识
///
/// 微博接口有时返回数字,有时返回字符串 (mid),两者都原样保留。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(u64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(n) => write!(f, "{}", n),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for PostId {
    fn from(value: u64) -> Self {
        PostId::Number(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        PostId::Text(value.to_string())
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        PostId::Text(value)
    }
}

/// 微博帖子
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: String,
    /// 已清理的正文,接口未返回时为 `None`
    pub content: Option<String>,
    /// 原始发布时间文本,`"N/A"` 表示未知
    pub published_at: String,
    #[serde(default)]
    pub reposts: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub likes: u64,
    pub url: Option<String>,
}

impl Post {
    /// 创建帖子,发布时间未知,互动数为0
    pub fn new(id: impl Into<PostId>, author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            content: Some(content.into()),
            published_at: UNKNOWN_TIME.to_string(),
            reposts: 0,
            comments: 0,
            likes: 0,
            url: None,
        }
    }

    /// 设置发布时间 (构建器模式)
    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = published_at.into();
        self
    }

    /// 设置转发/评论/点赞数 (构建器模式)
    pub fn with_counts(mut self, reposts: u64, comments: u64, likes: u64) -> Self {
        self.reposts = reposts;
        self.comments = comments;
        self.likes = likes;
        self
    }

    /// 设置链接 (构建器模式)
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// 去掉正文 (构建器模式)
    pub fn without_content(mut self) -> Self {
        self.content = None;
        self
    }

    /// 互动总数: 转发 + 评论 + 点赞
    pub fn engagement(&self) -> u64 {
        self.reposts
            .saturating_add(self.comments)
            .saturating_add(self.likes)
    }

    /// 正文文本,缺失时为空串
    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// 发布时间是否不是 "N/A" 标记
    pub fn has_known_time(&self) -> bool {
        self.published_at != UNKNOWN_TIME
    }
}

/// 一次完成的爬取得到的帖子表
///
/// 顺序即爬取顺序。下一次爬取整体替换,不做增量合并。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostTable {
    posts: Vec<Post>,
}

impl PostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Post> {
        self.posts.get(index)
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }
}

impl From<Vec<Post>> for PostTable {
    fn from(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

impl FromIterator<Post> for PostTable {
    fn from_iter<I: IntoIterator<Item = Post>>(iter: I) -> Self {
        Self {
            posts: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PostTable {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}
