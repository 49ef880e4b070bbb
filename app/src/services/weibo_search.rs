use chrono::{Local, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::models::{AppConfig, Post, PostId, PostTable, ScrapeError, SearchRequest};
use crate::services::scrape_runner::ProgressReporter;
use crate::utils::text::clean_content;
use crate::utils::time_utils::normalize_weibo_time;

/// 两页之间在配置延迟之外追加的随机抖动上限 (毫秒)
const JITTER_MAX_MS: u64 = 500;

/// 用户信息缺失 (如已注销账号) 时的作者名
const UNKNOWN_AUTHOR: &str = "N/A";

/// 帖子来源
///
/// 爬取器的接口: 给定关键词、页数和请求间隔,返回完整的帖子表。
/// 没有结果时返回空表;网络或解析失败时返回错误。
/// 实现需要在页与页之间检查取消令牌。
pub trait PostSource: Send + Sync + 'static {
    fn search(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
        progress: &ProgressReporter,
    ) -> impl Future<Output = Result<PostTable, ScrapeError>> + Send;
}

/// 微博搜索客户端
///
/// 调用移动端搜索接口 `/api/container/getIndex`,逐页抓取关键词搜索结果。
/// 职责:
/// - 构造搜索请求 (UA、Cookie、超时)
/// - 解析卡片中的 mblog 为帖子
/// - 跨页去重,遇到空页提前结束
pub struct WeiboSearchClient {
    http: reqwest::Client,
    base_url: String,
    cookie: Option<String>,
}

/// 搜索接口响应
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    ok: i64,
    #[serde(default)]
    data: Option<SearchData>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchData {
    #[serde(default)]
    cards: Vec<Card>,
}

/// 搜索卡片,帖子可能直接挂在卡片上,也可能在 card_group 中
#[derive(Debug, Deserialize)]
struct Card {
    #[serde(default)]
    mblog: Option<RawMblog>,
    #[serde(default)]
    card_group: Vec<Card>,
}

#[derive(Debug, Deserialize)]
struct RawMblog {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    mid: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default, deserialize_with = "lenient_count")]
    reposts_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    comments_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    attitudes_count: u64,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(default)]
    screen_name: Option<String>,
}

impl WeiboSearchClient {
    /// 创建新的客户端
    pub fn new(config: &AppConfig) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .cookie_store(true)
            .build()?;

        tracing::info!(
            base_url = %config.base_url,
            has_cookie = config.cookie.is_some(),
            "Weibo search client initialized"
        );

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie: config.cookie.clone(),
        })
    }

    /// 抓取一页搜索结果
    ///
    /// # 错误
    /// - `ScrapeError::RateLimited`: HTTP 418/429
    /// - `ScrapeError::HttpStatusError`: 其他非2xx状态码
    /// - `ScrapeError::NetworkFailed`: 连接失败或超时
    /// - `ScrapeError::InvalidResponse`: 响应不是JSON
    pub async fn fetch_page(&self, keyword: &str, page: u32) -> Result<Vec<Post>, ScrapeError> {
        let url = format!("{}/api/container/getIndex", self.base_url);
        let containerid = format!("100103type=1&q={}", keyword);
        let page_param = page.to_string();

        let mut builder = self
            .http
            .get(&url)
            .query(&[
                ("containerid", containerid.as_str()),
                ("page_type", "searchall"),
                ("page", page_param.as_str()),
            ])
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .header(reqwest::header::REFERER, format!("{}/search", self.base_url));

        if let Some(cookie) = &self.cookie {
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }

        tracing::debug!(keyword = %keyword, page, "Requesting search page");

        let response = builder.send().await?;
        let status = response.status();

        if status.as_u16() == 418 || status.as_u16() == 429 {
            tracing::warn!(status = status.as_u16(), page, "Search request rate limited");
            return Err(ScrapeError::RateLimited {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let message = status.canonical_reason().unwrap_or("unknown").to_string();
            tracing::error!(status = status.as_u16(), page, "Search request failed");
            return Err(ScrapeError::HttpStatusError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let posts = parse_search_page(&body, Local::now().naive_local())?;

        tracing::debug!(page, posts = posts.len(), "Search page parsed");
        Ok(posts)
    }

    /// 两页之间等待,可被取消
    async fn pause_between_pages(
        &self,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), ScrapeError> {
        let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_MS);
        let wait = delay + Duration::from_millis(jitter);

        tokio::select! {
            _ = cancel.cancelled() => Err(ScrapeError::Cancelled),
            _ = tokio::time::sleep(wait) => Ok(()),
        }
    }
}

impl PostSource for WeiboSearchClient {
    async fn search(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
        progress: &ProgressReporter,
    ) -> Result<PostTable, ScrapeError> {
        request.validate()?;

        let mut seen: HashSet<PostId> = HashSet::new();
        let mut posts: Vec<Post> = Vec::new();

        for page in 1..=request.max_pages {
            if cancel.is_cancelled() {
                return Err(ScrapeError::Cancelled);
            }

            let page_posts = tokio::select! {
                _ = cancel.cancelled() => return Err(ScrapeError::Cancelled),
                result = self.fetch_page(&request.keyword, page) => result?,
            };

            if page_posts.is_empty() {
                tracing::info!(keyword = %request.keyword, page, "没有更多数据,提前结束");
                break;
            }

            let mut added = 0;
            for post in page_posts {
                if seen.insert(post.id.clone()) {
                    posts.push(post);
                    added += 1;
                }
            }

            progress.page_fetched(page, added, posts.len());

            if page < request.max_pages {
                self.pause_between_pages(request.delay(), cancel).await?;
            }
        }

        Ok(PostTable::from(posts))
    }
}

/// 解析一页搜索结果
///
/// `ok != 1` 表示没有内容 (例如关键词无结果),返回空列表而不是错误。
/// 没有ID的帖子无法去重,直接跳过。
pub fn parse_search_page(body: &str, now: NaiveDateTime) -> Result<Vec<Post>, ScrapeError> {
    let response: SearchResponse = serde_json::from_str(body)?;

    if response.ok != 1 {
        return Ok(Vec::new());
    }

    let cards = response.data.unwrap_or_default().cards;
    let mut posts = Vec::new();
    collect_posts(cards, now, &mut posts);
    Ok(posts)
}

fn collect_posts(cards: Vec<Card>, now: NaiveDateTime, posts: &mut Vec<Post>) {
    for card in cards {
        if let Some(mblog) = card.mblog {
            match mblog_to_post(mblog, now) {
                Some(post) => posts.push(post),
                None => tracing::warn!("跳过缺少ID的帖子"),
            }
        }
        collect_posts(card.card_group, now, posts);
    }
}

fn mblog_to_post(mblog: RawMblog, now: NaiveDateTime) -> Option<Post> {
    let numeric = mblog.id.as_ref().and_then(Value::as_u64);
    let id = match (numeric, mblog.id, mblog.mid) {
        (Some(n), _, _) => PostId::Number(n),
        (None, Some(Value::String(s)), _) if !s.is_empty() => PostId::Text(s),
        (None, _, Some(mid)) if !mid.is_empty() => PostId::Text(mid),
        _ => return None,
    };

    let author = mblog
        .user
        .and_then(|u| u.screen_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let url = format!("https://m.weibo.cn/detail/{}", id);

    Some(Post {
        id,
        author,
        content: mblog.text.as_deref().map(|t| clean_content(Some(t))),
        published_at: normalize_weibo_time(mblog.created_at.as_deref(), now),
        reposts: mblog.reposts_count,
        comments: mblog.comments_count,
        likes: mblog.attitudes_count,
        url: Some(url),
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(count_from_value).unwrap_or(0))
}

/// 互动数可能是数字,也可能是 "1.2万"、"100万+" 这样的文本
pub fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => parse_count_text(s),
        _ => 0,
    }
}

/// 解析文本形式的计数,无法识别时为0
pub fn parse_count_text(text: &str) -> u64 {
    let text = text.trim().trim_end_matches('+');

    let (number, multiplier) = if let Some(n) = text.strip_suffix('万') {
        (n, 10_000.0)
    } else if let Some(n) = text.strip_suffix('亿') {
        (n, 100_000_000.0)
    } else {
        (text, 1.0)
    };

    match number.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => (v * multiplier).round() as u64,
        _ => 0,
    }
}
