//! 导出命令
//!
//! 导出完整帖子表,与当前筛选条件无关。

use std::path::{Path, PathBuf};

use super::CommandError;
use crate::log_event;
use crate::services::exporter::{self, default_export_file_name};
use crate::services::{ExportFormat, ExportSummary};
use crate::state::SharedState;

/// 导出CSV
///
/// # 错误
/// - NO_DATA: 当前没有数据
/// - EXPORT_FAILED: 文件写入失败
pub async fn export_csv(state: &SharedState, path: &Path) -> Result<ExportSummary, CommandError> {
    let guard = state.lock().await;
    let summary = exporter::export_csv(guard.table(), path)?;
    log_finished(&summary);
    Ok(summary)
}

/// 导出Excel
pub async fn export_excel(
    state: &SharedState,
    path: &Path,
) -> Result<ExportSummary, CommandError> {
    let guard = state.lock().await;
    let summary = exporter::export_xlsx(guard.table(), path)?;
    log_finished(&summary);
    Ok(summary)
}

/// 导出目录下的默认文件路径
pub async fn default_export_path(state: &SharedState, format: ExportFormat) -> PathBuf {
    let now = chrono::Local::now().naive_local();
    let guard = state.lock().await;
    guard
        .config
        .export_dir
        .join(default_export_file_name(format, now))
}

fn log_finished(summary: &ExportSummary) {
    log_event!(
        "ExportFinished",
        format = summary.format.extension(),
        path = summary.file_path.display().to_string().as_str(),
        exported_count = summary.exported_count,
        file_size = summary.file_size,
    );
}
