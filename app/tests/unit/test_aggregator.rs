#[path = "../common/mod.rs"]
mod common;

use common::{example_table, post, sample_table};
use weibo_search::models::{AuthorStats, Post, PostTable};
use weibo_search::services::aggregator::{
    compute_author_stats, compute_basic_stats, compute_content_length_stats,
    compute_time_distribution, TOP_AUTHOR_LIMIT,
};

// ============================================================================
// compute_basic_stats 测试
// ============================================================================

#[test]
fn test_basic_stats_两条帖子的基准表() {
    let stats = compute_basic_stats(&example_table()).unwrap();

    assert_eq!(stats.count, 2);
    assert_eq!(
        (stats.sum_reposts, stats.sum_comments, stats.sum_likes),
        (11, 2, 3)
    );
    assert_eq!(stats.mean_reposts, 5.5);
    assert_eq!(stats.mean_comments, 1.0);
    assert_eq!(stats.mean_likes, 1.5);
    assert_eq!(
        (stats.max_reposts, stats.max_comments, stats.max_likes),
        (10, 2, 3)
    );
}

#[test]
fn test_basic_stats_空表返回none() {
    assert!(compute_basic_stats(&PostTable::new()).is_none());
}

#[test]
fn test_basic_stats_求和与逐条相加一致() {
    let table = sample_table();
    let stats = compute_basic_stats(&table).unwrap();

    assert_eq!(stats.count, table.len());
    assert_eq!(stats.sum_reposts, table.iter().map(|p| p.reposts).sum::<u64>());
    assert_eq!(stats.sum_comments, table.iter().map(|p| p.comments).sum::<u64>());
    assert_eq!(stats.sum_likes, table.iter().map(|p| p.likes).sum::<u64>());
}

#[test]
fn test_basic_stats_均值保留两位小数() {
    let stats = compute_basic_stats(&sample_table()).unwrap();

    // 127 / 6 = 21.1666...
    assert_eq!(stats.mean_likes, 21.17);
    assert_eq!(stats.mean_reposts, 3.0);
    assert_eq!(stats.max_likes, 100);
}

#[test]
fn test_basic_stats_均值恰好一半时取偶() {
    // 8 条帖子: 转发 1/8 = 0.125,评论 5/8 = 0.625,点赞 3/8 = 0.375
    let mut posts: Vec<Post> = (1..=7u64).map(|i| post(i, "a", "x", 0, 0, 0)).collect();
    posts.push(post(8, "b", "y", 1, 5, 3));
    let stats = compute_basic_stats(&PostTable::from(posts)).unwrap();

    assert_eq!(stats.mean_reposts, 0.12);
    assert_eq!(stats.mean_comments, 0.62);
    assert_eq!(stats.mean_likes, 0.38);
}

#[test]
fn test_basic_stats_单条帖子() {
    let table = PostTable::from(vec![Post::new(1u64, "a", "x").with_counts(7, 0, 0)]);
    let stats = compute_basic_stats(&table).unwrap();

    assert_eq!(stats.count, 1);
    assert_eq!(stats.mean_reposts, 7.0);
    assert_eq!(stats.max_reposts, 7);
}

// ============================================================================
// compute_time_distribution 测试
// ============================================================================

#[test]
fn test_time_distribution_按小时计数() {
    let distribution = compute_time_distribution(&sample_table()).unwrap();

    let entries: Vec<(u32, usize)> = distribution.into_iter().collect();
    assert_eq!(entries, vec![(9, 2), (14, 1), (21, 1)]);
}

#[test]
fn test_time_distribution_全部为na时缺失() {
    let table = PostTable::from(vec![
        Post::new(1u64, "a", "x"),
        Post::new(2u64, "b", "y").with_published_at("N/A"),
    ]);

    assert!(compute_time_distribution(&table).is_none());
}

#[test]
fn test_time_distribution_跳过无法解析的时间() {
    let table = PostTable::from(vec![
        Post::new(1u64, "a", "x").with_published_at("不是时间"),
        Post::new(2u64, "b", "y").with_published_at("2025-10-07 23:59:59"),
    ]);

    let distribution = compute_time_distribution(&table).unwrap();
    assert_eq!(distribution.len(), 1);
    assert_eq!(distribution.get(&23), Some(&1));
}

#[test]
fn test_time_distribution_仅日期的帖子不计入() {
    let table = PostTable::from(vec![
        Post::new(1u64, "a", "x").with_published_at("2025-10-07"),
        Post::new(2u64, "b", "y").with_published_at("2025-10-07 00:30:00"),
    ]);

    let distribution = compute_time_distribution(&table).unwrap();
    assert_eq!(distribution.into_iter().collect::<Vec<_>>(), vec![(0, 1)]);
}

#[test]
fn test_time_distribution_空表() {
    assert!(compute_time_distribution(&PostTable::new()).is_none());
}

// ============================================================================
// compute_author_stats 测试
// ============================================================================

#[test]
fn test_author_stats_按发帖数降序() {
    let authors = compute_author_stats(&sample_table()).unwrap();

    let names: Vec<&str> = authors.iter().map(|a| a.author.as_str()).collect();
    assert_eq!(names, vec!["小明", "小红", "阿强", "路人"]);

    assert_eq!(
        authors[0],
        AuthorStats {
            author: "小明".to_string(),
            post_count: 2,
            reposts: 17,
            comments: 11,
            likes: 120,
        }
    );
}

#[test]
fn test_author_stats_最多十位且并列保持首次出现顺序() {
    let mut posts: Vec<Post> = (0..12u64)
        .map(|i| Post::new(i, format!("u{}", i), "x"))
        .collect();
    posts.push(Post::new(100u64, "u11", "again"));

    let authors = compute_author_stats(&PostTable::from(posts)).unwrap();

    assert_eq!(authors.len(), TOP_AUTHOR_LIMIT);
    assert_eq!(authors[0].author, "u11");
    assert_eq!(authors[0].post_count, 2);

    let rest: Vec<&str> = authors[1..].iter().map(|a| a.author.as_str()).collect();
    assert_eq!(
        rest,
        vec!["u0", "u1", "u2", "u3", "u4", "u5", "u6", "u7", "u8"]
    );
}

#[test]
fn test_author_stats_空表() {
    assert!(compute_author_stats(&PostTable::new()).is_none());
}

// ============================================================================
// compute_content_length_stats 测试
// ============================================================================

#[test]
fn test_content_length_stats_按字符计数() {
    let stats = compute_content_length_stats(&sample_table()).unwrap();

    // 长度: 15, 10, 11, 0, 6, 0 (缺失正文记为0)
    assert_eq!(stats.max, 15);
    assert_eq!(stats.min, 0);
    assert_eq!(stats.mean, 7.0);
    assert_eq!(stats.median, 8.0);
}

#[test]
fn test_content_length_stats_奇数条取中间值() {
    let table = PostTable::from(vec![
        Post::new(1u64, "a", "一"),
        Post::new(2u64, "a", "一二三"),
        Post::new(3u64, "a", "一二"),
    ]);

    let stats = compute_content_length_stats(&table).unwrap();
    assert_eq!(stats.median, 2.0);
    assert_eq!(stats.mean, 2.0);
}

#[test]
fn test_content_length_stats_均值取偶() {
    let mut posts: Vec<Post> = (1..=7u64).map(|i| Post::new(i, "a", "")).collect();
    posts.push(Post::new(8u64, "a", "x"));

    let stats = compute_content_length_stats(&PostTable::from(posts)).unwrap();
    assert_eq!(stats.mean, 0.12);
}

#[test]
fn test_content_length_stats_空表() {
    assert!(compute_content_length_stats(&PostTable::new()).is_none());
}
