use regex::Regex;
use std::sync::OnceLock;

/// 原始数据中表示缺失的占位文本
const MISSING_MARKER: &str = "N/A";

fn html_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]+>").expect("有效的HTML标签正则"))
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("有效的空白正则"))
}

/// 清理微博内容
///
/// - 缺失或 "N/A" → 空串
/// - 移除HTML标签 (链接、表情图片、话题标记)
/// - 连续空白合并为一个空格,去掉首尾空白
pub fn clean_content(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(s) if s != MISSING_MARKER => s,
        _ => return String::new(),
    };

    let without_tags = html_tag_pattern().replace_all(raw, "");
    whitespace_pattern()
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}
