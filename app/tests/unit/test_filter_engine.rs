#[path = "../common/mod.rs"]
mod common;

use std::collections::HashSet;

use common::{example_table, sample_table};
use weibo_search::models::{Post, PostId, PostTable};
use weibo_search::services::filter_engine::{
    content_preview, distinct_authors, filter, DEFAULT_PREVIEW_LIMIT,
};
use weibo_search::services::{AuthorSelector, PostFilter};

fn ids(table: &PostTable) -> Vec<PostId> {
    table.iter().map(|p| p.id.clone()).collect()
}

// ============================================================================
// filter 测试
// ============================================================================

#[test]
fn test_filter_不限条件时原样返回() {
    let table = sample_table();
    assert_eq!(filter(&table, &AuthorSelector::All, 0), table);
}

#[test]
fn test_filter_互动数阈值边界() {
    let table = example_table();

    let kept = filter(&table, &AuthorSelector::All, 10);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept.get(0).unwrap().author, "b");

    assert!(filter(&table, &AuthorSelector::All, 11).is_empty());
}

#[test]
fn test_filter_按作者精确匹配并保持顺序() {
    let table = sample_table();
    let kept = filter(&table, &AuthorSelector::Exact("小明".to_string()), 0);

    assert_eq!(ids(&kept), vec![PostId::from(101u64), PostId::from(103u64)]);
}

#[test]
fn test_filter_两个条件同时满足() {
    let table = sample_table();
    let kept = filter(&table, &AuthorSelector::Exact("小明".to_string()), 50);

    assert_eq!(ids(&kept), vec![PostId::from(103u64)]);
}

#[test]
fn test_filter_幂等() {
    let table = sample_table();
    let author = AuthorSelector::Exact("小红".to_string());

    let once = filter(&table, &author, 5);
    let twice = filter(&once, &author, 5);
    assert_eq!(once, twice);
}

#[test]
fn test_filter_保留的帖子都满足条件() {
    let table = sample_table();
    let criteria = PostFilter::new(AuthorSelector::All, 6);
    let kept = criteria.apply(&table);

    assert!(kept.iter().all(|p| p.engagement() >= 6));
    let excluded = table.iter().filter(|p| !kept.iter().any(|k| k.id == p.id));
    assert!(excluded.into_iter().all(|p| p.engagement() < 6));
}

#[test]
fn test_filter_未知作者返回空表() {
    let table = sample_table();
    assert!(filter(&table, &AuthorSelector::Exact("不存在".to_string()), 0).is_empty());
}

#[test]
fn test_filter_空表() {
    let empty = PostTable::new();
    assert!(filter(&empty, &AuthorSelector::All, 100).is_empty());
}

// ============================================================================
// content_preview 测试
// ============================================================================

#[test]
fn test_preview_不超过上限时不变() {
    assert_eq!(content_preview("短内容", DEFAULT_PREVIEW_LIMIT), "短内容");
    assert_eq!(content_preview("", DEFAULT_PREVIEW_LIMIT), "");
}

#[test]
fn test_preview_超过上限时截断并追加省略号() {
    let text: String = "这是一条很长的微博".repeat(10);
    let preview = content_preview(&text, DEFAULT_PREVIEW_LIMIT);

    assert_eq!(preview.chars().count(), DEFAULT_PREVIEW_LIMIT + 3);
    assert!(preview.ends_with("..."));
    let prefix: String = text.chars().take(DEFAULT_PREVIEW_LIMIT).collect();
    assert!(preview.starts_with(&prefix));
}

#[test]
fn test_preview_恰好多一个字符() {
    let text = "a".repeat(51);
    assert_eq!(content_preview(&text, 50), format!("{}...", "a".repeat(50)));
}

// ============================================================================
// distinct_authors 测试
// ============================================================================

#[test]
fn test_distinct_authors_全部在前且无重复() {
    let options = distinct_authors(&sample_table());

    assert_eq!(options[0], AuthorSelector::All);
    let unique: HashSet<&AuthorSelector> = options.iter().collect();
    assert_eq!(unique.len(), options.len());
    assert_eq!(
        options.iter().map(|o| o.to_string()).collect::<Vec<_>>(),
        vec!["全部", "小明", "小红", "阿强", "路人"]
    );
}

#[test]
fn test_distinct_authors_空表只有全部() {
    assert_eq!(distinct_authors(&PostTable::new()), vec![AuthorSelector::All]);
}

#[test]
fn test_distinct_authors_区分大小写() {
    let table = PostTable::from(vec![
        Post::new(1u64, "Alice", "x"),
        Post::new(2u64, "alice", "y"),
        Post::new(3u64, "Alice", "z"),
    ]);

    assert_eq!(distinct_authors(&table).len(), 3);
}
