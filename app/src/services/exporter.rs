//! 导出服务
//!
//! 将帖子表写成 CSV 或多工作表的 Excel 工作簿。
//! - CSV: UTF-8 带BOM,表头与帖子字段名一致,兼容常见电子表格软件
//! - Excel: 微博数据 / 统计信息 / 作者统计 (作者统计为空时省略)

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::models::{ExportError, Post, PostTable};
use crate::services::aggregator::{compute_author_stats, compute_basic_stats};
use crate::utils::time_utils::export_timestamp;

/// UTF-8 字节序标记
pub const UTF8_BOM: &str = "\u{FEFF}";

/// 帖子字段表头,CSV 与 Excel 数据表共用
pub const POST_COLUMNS: [&str; 8] = [
    "id",
    "author",
    "content",
    "published_at",
    "reposts",
    "comments",
    "likes",
    "url",
];

pub const DATA_SHEET: &str = "微博数据";
pub const STATS_SHEET: &str = "统计信息";
pub const AUTHOR_SHEET: &str = "作者统计";

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// 导出结果
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub format: ExportFormat,
    pub file_path: PathBuf,
    pub exported_count: usize,
    pub file_size: u64,
}

/// 默认导出文件名
///
/// - CSV: 微博数据_20251007_123456.csv
/// - Excel: 微博数据分析_20251007_123456.xlsx
pub fn default_export_file_name(format: ExportFormat, now: NaiveDateTime) -> String {
    let prefix = match format {
        ExportFormat::Csv => "微博数据",
        ExportFormat::Xlsx => "微博数据分析",
    };
    format!("{}_{}.{}", prefix, export_timestamp(now), format.extension())
}

/// 将帖子表序列化为CSV文本 (含BOM)
pub fn render_csv(table: &PostTable) -> String {
    let mut csv = String::from(UTF8_BOM);
    csv.push_str(&POST_COLUMNS.join(","));
    csv.push_str("\r\n");

    for post in table {
        let row = post_cells(post)
            .iter()
            .map(|cell| escape_csv_field(cell))
            .collect::<Vec<_>>()
            .join(",");
        // 写入 String 不会失败
        let _ = write!(csv, "{}\r\n", row);
    }

    csv
}

/// 导出CSV文件
pub fn export_csv(table: &PostTable, path: &Path) -> Result<ExportSummary, ExportError> {
    if table.is_empty() {
        return Err(ExportError::NoData);
    }

    let content = render_csv(table);
    std::fs::write(path, &content)?;

    tracing::info!(
        path = %path.display(),
        exported_count = table.len(),
        "CSV导出完成"
    );

    Ok(ExportSummary {
        format: ExportFormat::Csv,
        file_path: path.to_path_buf(),
        exported_count: table.len(),
        file_size: content.len() as u64,
    })
}

/// 导出Excel工作簿
///
/// 工作表:
/// 1. 微博数据: 完整帖子表
/// 2. 统计信息: (指标, 数值) 两列
/// 3. 作者统计: 以作者为行键,可选
pub fn export_xlsx(table: &PostTable, path: &Path) -> Result<ExportSummary, ExportError> {
    if table.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut workbook = build_workbook(table)?;
    workbook.save(path)?;

    let file_size = std::fs::metadata(path)?.len();

    tracing::info!(
        path = %path.display(),
        exported_count = table.len(),
        file_size,
        "Excel导出完成"
    );

    Ok(ExportSummary {
        format: ExportFormat::Xlsx,
        file_path: path.to_path_buf(),
        exported_count: table.len(),
        file_size,
    })
}

/// 构建工作簿 (不写盘)
pub fn build_workbook(table: &PostTable) -> Result<Workbook, XlsxError> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    workbook.push_worksheet(data_sheet(table, &header)?);

    if let Some(stats) = compute_basic_stats(table) {
        let mut sheet = Worksheet::new();
        sheet.set_name(STATS_SHEET)?;
        sheet.write_string_with_format(0, 0, "指标", &header)?;
        sheet.write_string_with_format(0, 1, "数值", &header)?;
        for (row, (name, value)) in stats.metric_rows().into_iter().enumerate() {
            let row = row as u32 + 1;
            sheet.write_string(row, 0, name)?;
            sheet.write_number(row, 1, value.as_f64())?;
        }
        workbook.push_worksheet(sheet);
    }

    if let Some(authors) = compute_author_stats(table) {
        let mut sheet = Worksheet::new();
        sheet.set_name(AUTHOR_SHEET)?;
        for (col, title) in ["作者", "微博数量", "转发数", "评论数", "点赞数"]
            .into_iter()
            .enumerate()
        {
            sheet.write_string_with_format(0, col as u16, title, &header)?;
        }
        for (row, author) in authors.iter().enumerate() {
            let row = row as u32 + 1;
            sheet.write_string(row, 0, &author.author)?;
            sheet.write_number(row, 1, author.post_count as f64)?;
            sheet.write_number(row, 2, author.reposts as f64)?;
            sheet.write_number(row, 3, author.comments as f64)?;
            sheet.write_number(row, 4, author.likes as f64)?;
        }
        workbook.push_worksheet(sheet);
    }

    Ok(workbook)
}

fn data_sheet(table: &PostTable, header: &Format) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(DATA_SHEET)?;

    for (col, title) in POST_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    for (row, post) in table.iter().enumerate() {
        let row = row as u32 + 1;
        sheet.write_string(row, 0, post.id.to_string())?;
        sheet.write_string(row, 1, &post.author)?;
        sheet.write_string(row, 2, post.content_text())?;
        sheet.write_string(row, 3, &post.published_at)?;
        sheet.write_number(row, 4, post.reposts as f64)?;
        sheet.write_number(row, 5, post.comments as f64)?;
        sheet.write_number(row, 6, post.likes as f64)?;
        if let Some(url) = &post.url {
            sheet.write_string(row, 7, url)?;
        }
    }

    Ok(sheet)
}

/// 帖子按表头顺序展开为文本单元格
fn post_cells(post: &Post) -> [String; 8] {
    [
        post.id.to_string(),
        post.author.clone(),
        post.content_text().to_string(),
        post.published_at.clone(),
        post.reposts.to_string(),
        post.comments.to_string(),
        post.likes.to_string(),
        post.url.clone().unwrap_or_default(),
    ]
}

/// 转义CSV字段
///
/// 包含逗号、引号或换行符时用引号包裹,内部引号加倍
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
