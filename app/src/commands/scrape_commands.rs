//! 爬取命令
//!
//! - start_scrape: 在后台启动一次爬取
//! - stop_scrape: 请求停止正在进行的爬取
//! - wait_scrape: 等待爬取结束并应用结果
//! - finish_scrape: 把爬取结果应用到应用状态

use serde::Serialize;
use std::sync::Arc;

use super::CommandError;
use crate::models::{ScrapeEvent, ScrapeOutcome, SearchRequest};
use crate::services::{PostSource, ScrapeRunner};
use crate::state::SharedState;

// ==================== 请求/响应结构 ====================

/// 启动爬取响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartScrapeResponse {
    pub scrape_id: String,
    pub keyword: String,
}

/// 爬取结束状态 (失败以 `CommandError` 返回)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStatus {
    Completed,
    Empty,
    Cancelled,
}

/// 爬取结束报告
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeReport {
    pub scrape_id: Option<String>,
    pub status: ScrapeStatus,
    /// 本次爬取交付的帖子数
    pub total_posts: usize,
    pub message: String,
}

// ==================== 命令实现 ====================

/// 启动爬取
///
/// # 错误
/// - INVALID_KEYWORD: 关键词为空
/// - INVALID_REQUEST: 页数或间隔超出范围
/// - SCRAPE_IN_PROGRESS: 已有爬取在进行
pub async fn start_scrape<S: PostSource>(
    state: &SharedState,
    source: Arc<S>,
    request: SearchRequest,
) -> Result<StartScrapeResponse, CommandError> {
    if request.keyword.trim().is_empty() {
        return Err(CommandError::invalid_keyword());
    }
    request
        .validate()
        .map_err(|e| CommandError::invalid_request(&e))?;

    let mut guard = state.lock().await;
    if guard.is_scraping() {
        return Err(CommandError::scrape_in_progress());
    }

    let keyword = request.keyword.clone();
    let handle = ScrapeRunner::spawn(source, request);
    let scrape_id = guard.begin_scrape(handle).map_err(|rejected| {
        rejected.cancel();
        CommandError::scrape_in_progress()
    })?;

    tracing::info!(scrape_id = %scrape_id, keyword = %keyword, "爬取已启动");

    Ok(StartScrapeResponse {
        scrape_id: scrape_id.to_string(),
        keyword,
    })
}

/// 停止爬取
///
/// 只中止爬取本身,当前数据不受影响。结果仍由 wait_scrape / finish_scrape 收尾。
pub async fn stop_scrape(state: &SharedState) -> Result<(), CommandError> {
    let guard = state.lock().await;
    let active = guard
        .active_scrape()
        .ok_or_else(CommandError::no_active_scrape)?;

    active.cancel();
    tracing::info!(scrape_id = %active.id, keyword = %active.keyword, "已请求停止爬取");
    Ok(())
}

/// 等待爬取结束并应用结果
///
/// 等待期间不持有状态锁,其他命令 (包括 stop_scrape) 可以正常执行。
pub async fn wait_scrape<F>(state: &SharedState, on_event: F) -> Result<ScrapeReport, CommandError>
where
    F: FnMut(ScrapeEvent),
{
    let mut handle = {
        let mut guard = state.lock().await;
        let active = guard
            .active_scrape_mut()
            .ok_or_else(CommandError::no_active_scrape)?;
        // 句柄已被另一个等待者取走
        active
            .take_handle()
            .ok_or_else(CommandError::scrape_in_progress)?
    };

    let outcome = handle.wait_with_events(on_event).await;
    finish_scrape(state, outcome).await
}

/// 把爬取结果应用到状态
///
/// - Completed: 整体替换帖子表并重置筛选
/// - Empty / Cancelled: 保留原有数据
/// - Failed: 保留原有数据,返回 SCRAPE_FAILED
pub async fn finish_scrape(
    state: &SharedState,
    outcome: ScrapeOutcome,
) -> Result<ScrapeReport, CommandError> {
    let mut guard = state.lock().await;
    let scrape_id = guard.end_scrape().map(|active| active.id.to_string());

    match outcome {
        ScrapeOutcome::Completed(table) => {
            let total_posts = table.len();
            guard.replace_table(table);
            Ok(ScrapeReport {
                scrape_id,
                status: ScrapeStatus::Completed,
                total_posts,
                message: format!("成功爬取 {} 条微博数据！", total_posts),
            })
        }
        ScrapeOutcome::Empty => Ok(ScrapeReport {
            scrape_id,
            status: ScrapeStatus::Empty,
            total_posts: 0,
            message: "未获取到数据，请尝试更换关键词或检查网络连接".to_string(),
        }),
        ScrapeOutcome::Cancelled => Ok(ScrapeReport {
            scrape_id,
            status: ScrapeStatus::Cancelled,
            total_posts: 0,
            message: "爬取已停止".to_string(),
        }),
        ScrapeOutcome::Failed(e) => {
            tracing::error!(scrape_id = ?scrape_id, error = %e, "爬取失败");
            Err(CommandError::scrape_failed(&e))
        }
    }
}
