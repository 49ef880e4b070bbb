//! 筛选服务
//!
//! 按作者和最小互动数派生帖子表的可见子集,不修改原表。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::models::{Post, PostTable};

/// "不限作者"在界面上显示的标签
pub const ALL_AUTHORS_LABEL: &str = "全部";

/// 内容预览默认截断长度 (字符)
pub const DEFAULT_PREVIEW_LIMIT: usize = 50;

/// 截断标记
pub const PREVIEW_MARKER: &str = "...";

/// 作者筛选条件
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "author", rename_all = "snake_case")]
pub enum AuthorSelector {
    /// 不限作者
    #[default]
    All,
    /// 精确匹配作者名 (区分大小写,不做归一化)
    Exact(String),
}

impl AuthorSelector {
    /// 从界面选项解析: "全部" 表示不限作者
    pub fn from_label(label: &str) -> Self {
        if label == ALL_AUTHORS_LABEL {
            AuthorSelector::All
        } else {
            AuthorSelector::Exact(label.to_string())
        }
    }

    pub fn matches(&self, author: &str) -> bool {
        match self {
            AuthorSelector::All => true,
            AuthorSelector::Exact(expected) => expected == author,
        }
    }
}

impl fmt::Display for AuthorSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorSelector::All => f.write_str(ALL_AUTHORS_LABEL),
            AuthorSelector::Exact(author) => f.write_str(author),
        }
    }
}

/// 当前生效的筛选条件
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostFilter {
    pub author: AuthorSelector,
    /// 最小互动数,0 表示不限制
    pub min_engagement: u64,
}

impl PostFilter {
    pub fn new(author: AuthorSelector, min_engagement: u64) -> Self {
        Self {
            author,
            min_engagement,
        }
    }

    /// 两个条件同时满足才保留
    pub fn matches(&self, post: &Post) -> bool {
        self.author.matches(&post.author)
            && (self.min_engagement == 0 || post.engagement() >= self.min_engagement)
    }

    pub fn apply(&self, table: &PostTable) -> PostTable {
        table.iter().filter(|p| self.matches(p)).cloned().collect()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.author == AuthorSelector::All && self.min_engagement == 0
    }
}

/// 筛选帖子表,保持原有相对顺序
///
/// 没有匹配的帖子时返回空表,而不是错误。
pub fn filter(table: &PostTable, author: &AuthorSelector, min_engagement: u64) -> PostTable {
    PostFilter::new(author.clone(), min_engagement).apply(table)
}

/// 内容预览
///
/// 不超过 `limit` 个字符时原样返回,否则截取前 `limit` 个字符并追加 "..."。
pub fn content_preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{}", &text[..cut], PREVIEW_MARKER),
    }
}

/// 作者选项: "全部" 在前,其后按首次出现顺序列出不重复的作者
pub fn distinct_authors(table: &PostTable) -> Vec<AuthorSelector> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut options = vec![AuthorSelector::All];

    for post in table {
        if seen.insert(post.author.as_str()) {
            options.push(AuthorSelector::Exact(post.author.clone()));
        }
    }

    options
}
