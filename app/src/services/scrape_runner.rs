//! 爬取任务运行器
//!
//! 核心职责:
//! - 在后台tokio任务中执行爬取,不阻塞调用方
//! - 通过通道推送进度事件
//! - 爬取结束后一次性交付完整的帖子表(或错误),不交付部分结果
//! - 取消令牌只中止爬取本身

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::models::{ScrapeError, ScrapeEvent, ScrapeEventType, ScrapeOutcome, SearchRequest};
use crate::services::weibo_search::PostSource;
use crate::{log_error, log_event};

/// 进度上报器
///
/// 爬取实现通过它推送页级进度;接收端已关闭时静默丢弃。
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    scrape_id: Uuid,
    tx: Option<mpsc::UnboundedSender<ScrapeEvent>>,
}

impl ProgressReporter {
    pub fn new(scrape_id: Uuid, tx: mpsc::UnboundedSender<ScrapeEvent>) -> Self {
        Self {
            scrape_id,
            tx: Some(tx),
        }
    }

    /// 不连接任何接收端的上报器,用于直接调用爬取实现
    pub fn detached() -> Self {
        Self {
            scrape_id: Uuid::new_v4(),
            tx: None,
        }
    }

    pub fn scrape_id(&self) -> Uuid {
        self.scrape_id
    }

    pub fn emit(&self, event_type: ScrapeEventType) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(ScrapeEvent::new(self.scrape_id, event_type));
        }
    }

    pub fn page_fetched(&self, page: u32, page_posts: usize, total_posts: usize) {
        tracing::debug!(scrape_id = %self.scrape_id, page, page_posts, total_posts, "页面爬取完成");
        self.emit(ScrapeEventType::PageFetched {
            page,
            page_posts,
            total_posts,
        });
    }
}

/// 正在进行的爬取
///
/// 持有取消令牌、进度事件接收端和结果接收端。
pub struct ScrapeHandle {
    pub id: Uuid,
    pub request: SearchRequest,
    cancel: CancellationToken,
    events: mpsc::UnboundedReceiver<ScrapeEvent>,
    outcome: oneshot::Receiver<ScrapeOutcome>,
}

impl ScrapeHandle {
    /// 请求停止爬取
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// 取消令牌的副本,句柄被移走等待时仍可用于停止爬取
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 非阻塞地取出一条进度事件
    pub fn try_next_event(&mut self) -> Option<ScrapeEvent> {
        self.events.try_recv().ok()
    }

    /// 等待下一条进度事件,任务结束且事件取尽后返回 `None`
    pub async fn next_event(&mut self) -> Option<ScrapeEvent> {
        self.events.recv().await
    }

    /// 非阻塞地检查结果是否已交付
    ///
    /// 结果只交付一次,取到之后不要再调用。
    pub fn try_outcome(&mut self) -> Option<ScrapeOutcome> {
        match self.outcome.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(ScrapeOutcome::Failed(
                ScrapeError::TaskFailed("结果通道已关闭".to_string()),
            )),
        }
    }

    /// 等待爬取结束
    pub async fn wait(&mut self) -> ScrapeOutcome {
        self.wait_with_events(|_| {}).await
    }

    /// 等待爬取结束,期间把进度事件逐条交给 `on_event`
    ///
    /// 结果到达后先取尽剩余事件再返回,保证事件先于结果被处理。
    pub async fn wait_with_events<F>(&mut self, mut on_event: F) -> ScrapeOutcome
    where
        F: FnMut(ScrapeEvent),
    {
        let received = loop {
            tokio::select! {
                biased;
                Some(event) = self.events.recv() => on_event(event),
                received = &mut self.outcome => break received,
            }
        };

        while let Ok(event) = self.events.try_recv() {
            on_event(event);
        }

        match received {
            Ok(outcome) => outcome,
            Err(_) => ScrapeOutcome::Failed(ScrapeError::TaskFailed(
                "后台任务未交付结果".to_string(),
            )),
        }
    }
}

/// 爬取运行器
pub struct ScrapeRunner;

impl ScrapeRunner {
    /// 在后台任务中启动爬取
    ///
    /// 必须在tokio运行时内调用。立即返回句柄,耗时操作在后台执行。
    pub fn spawn<S: PostSource>(source: Arc<S>, request: SearchRequest) -> ScrapeHandle {
        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = oneshot::channel();

        let reporter = ProgressReporter::new(id, events_tx);
        let task_cancel = cancel.clone();
        let task_request = request.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            let scrape_id = id.to_string();

            log_event!(
                "ScrapeStarted",
                scrape_id = scrape_id.as_str(),
                keyword = task_request.keyword.as_str(),
                max_pages = task_request.max_pages,
                delay_secs = task_request.delay_secs,
            );
            reporter.emit(ScrapeEventType::Started {
                keyword: task_request.keyword.clone(),
                delay_secs: task_request.delay_secs,
            });

            let result = source.search(&task_request, &task_cancel, &reporter).await;

            // 用户已停止时丢弃结果,即使爬取恰好完成
            let outcome = if task_cancel.is_cancelled() {
                ScrapeOutcome::Cancelled
            } else {
                ScrapeOutcome::from_result(result)
            };

            let duration_ms = started.elapsed().as_millis() as u64;
            match &outcome {
                ScrapeOutcome::Completed(table) => {
                    log_event!(
                        "ScrapeCompleted",
                        scrape_id = scrape_id.as_str(),
                        total_posts = table.len(),
                        duration_ms = duration_ms,
                    );
                    reporter.emit(ScrapeEventType::Finished {
                        total_posts: table.len(),
                        duration_ms,
                    });
                }
                ScrapeOutcome::Empty => {
                    log_event!("ScrapeEmpty", scrape_id = scrape_id.as_str(), duration_ms = duration_ms);
                    reporter.emit(ScrapeEventType::Finished {
                        total_posts: 0,
                        duration_ms,
                    });
                }
                ScrapeOutcome::Failed(e) => {
                    log_error!(
                        "ScrapeFailed",
                        scrape_id = scrape_id.as_str(),
                        error = e.to_string().as_str(),
                    );
                    reporter.emit(ScrapeEventType::Failed {
                        error: e.to_string(),
                    });
                }
                ScrapeOutcome::Cancelled => {
                    log_event!(
                        "ScrapeCancelled",
                        scrape_id = scrape_id.as_str(),
                        duration_ms = duration_ms,
                    );
                    reporter.emit(ScrapeEventType::Cancelled);
                }
            }

            if outcome_tx.send(outcome).is_err() {
                tracing::debug!(scrape_id = %id, "结果接收端已关闭,丢弃爬取结果");
            }
        });

        ScrapeHandle {
            id,
            request,
            cancel,
            events: events_rx,
            outcome: outcome_rx,
        }
    }
}
