//! 统计服务
//!
//! 对帖子表做只读的描述性统计,供展示和导出使用。
//! 所有函数都是输入的纯函数: 空表返回 `None`,不会因为结构合法的表报错。

use std::collections::HashMap;

use crate::models::{
    AuthorStats, BasicStats, ContentLengthStats, HourlyDistribution, PostTable,
};
use crate::utils::time_utils::hour_of_day;

/// 作者统计最多返回的作者数
pub const TOP_AUTHOR_LIMIT: usize = 10;

/// 保留指定小数位,恰好一半时取偶 (0.125 → 0.12)
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round_ties_even() / factor
}

/// 基础统计: 总数、求和、均值(两位小数)、最大值
///
/// 空表返回 `None`,调用方应视为"无可展示内容"。
pub fn compute_basic_stats(table: &PostTable) -> Option<BasicStats> {
    if table.is_empty() {
        return None;
    }

    let count = table.len();
    let mut stats = BasicStats {
        count,
        sum_reposts: 0,
        sum_comments: 0,
        sum_likes: 0,
        mean_reposts: 0.0,
        mean_comments: 0.0,
        mean_likes: 0.0,
        max_reposts: 0,
        max_comments: 0,
        max_likes: 0,
    };

    for post in table {
        stats.sum_reposts = stats.sum_reposts.saturating_add(post.reposts);
        stats.sum_comments = stats.sum_comments.saturating_add(post.comments);
        stats.sum_likes = stats.sum_likes.saturating_add(post.likes);
        stats.max_reposts = stats.max_reposts.max(post.reposts);
        stats.max_comments = stats.max_comments.max(post.comments);
        stats.max_likes = stats.max_likes.max(post.likes);
    }

    let n = count as f64;
    stats.mean_reposts = round_to(stats.sum_reposts as f64 / n, 2);
    stats.mean_comments = round_to(stats.sum_comments as f64 / n, 2);
    stats.mean_likes = round_to(stats.sum_likes as f64 / n, 2);

    Some(stats)
}

/// 按发布小时(0-23)统计帖子数
///
/// "N/A" 与无法解析的时间逐条跳过,不影响其他记录。
/// 空表或没有任何有效时间时返回 `None`。
pub fn compute_time_distribution(table: &PostTable) -> Option<HourlyDistribution> {
    let mut distribution = HourlyDistribution::new();

    for post in table.iter().filter(|p| p.has_known_time()) {
        match hour_of_day(&post.published_at) {
            Some(hour) => *distribution.entry(hour).or_insert(0) += 1,
            None => {
                tracing::trace!(published_at = %post.published_at, "跳过无法解析的发布时间");
            }
        }
    }

    if distribution.is_empty() {
        None
    } else {
        Some(distribution)
    }
}

/// 作者统计: 按发帖数降序取前10
///
/// 发帖数相同时保持作者首次出现的顺序。
pub fn compute_author_stats(table: &PostTable) -> Option<Vec<AuthorStats>> {
    if table.is_empty() {
        return None;
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<AuthorStats> = Vec::new();

    for post in table {
        let slot = *index.entry(post.author.as_str()).or_insert_with(|| {
            groups.push(AuthorStats {
                author: post.author.clone(),
                post_count: 0,
                reposts: 0,
                comments: 0,
                likes: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.post_count += 1;
        group.reposts = group.reposts.saturating_add(post.reposts);
        group.comments = group.comments.saturating_add(post.comments);
        group.likes = group.likes.saturating_add(post.likes);
    }

    // sort_by 是稳定排序
    groups.sort_by(|a, b| b.post_count.cmp(&a.post_count));
    groups.truncate(TOP_AUTHOR_LIMIT);

    Some(groups)
}

/// 正文长度统计 (字符数)
///
/// 缺失的正文长度记为0。仅在空表时返回 `None`。
pub fn compute_content_length_stats(table: &PostTable) -> Option<ContentLengthStats> {
    if table.is_empty() {
        return None;
    }

    let mut lengths: Vec<usize> = table
        .iter()
        .map(|p| p.content_text().chars().count())
        .collect();
    lengths.sort_unstable();

    let n = lengths.len();
    let total: usize = lengths.iter().sum();
    let median = if n % 2 == 1 {
        lengths[n / 2] as f64
    } else {
        (lengths[n / 2 - 1] + lengths[n / 2]) as f64 / 2.0
    };

    Some(ContentLengthStats {
        mean: round_to(total as f64 / n as f64, 2),
        max: lengths[n - 1],
        min: lengths[0],
        median,
    })
}
