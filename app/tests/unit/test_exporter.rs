#[path = "../common/mod.rs"]
mod common;

use std::io::Read;
use std::path::Path;

use common::sample_table;
use weibo_search::models::{ExportError, Post, PostTable};
use weibo_search::services::exporter::{
    export_csv, export_xlsx, render_csv, AUTHOR_SHEET, DATA_SHEET, STATS_SHEET, UTF8_BOM,
};
use weibo_search::services::ExportFormat;

// ============================================================================
// CSV 测试
// ============================================================================

#[test]
fn test_render_csv_带bom与表头() {
    let csv = render_csv(&sample_table());

    assert!(csv.starts_with(UTF8_BOM));
    let mut lines = csv.trim_start_matches(UTF8_BOM).split("\r\n");
    assert_eq!(
        lines.next(),
        Some("id,author,content,published_at,reposts,comments,likes,url")
    );
    assert_eq!(
        lines.next(),
        Some("101,小明,今天学习了 Rust 的所有权,2025-10-07 09:15:00,5,3,20,https://m.weibo.cn/detail/101")
    );
}

#[test]
fn test_render_csv_一行一条帖子() {
    let table = sample_table();
    let csv = render_csv(&table);

    // 表头 + 每条帖子一行,末尾换行后为空串
    assert_eq!(csv.split("\r\n").count(), table.len() + 2);
}

#[test]
fn test_render_csv_转义逗号引号与换行() {
    let table = PostTable::from(vec![Post::new(
        "abc",
        "作者,甲",
        "他说\"你好\"\n第二行",
    )]);

    let csv = render_csv(&table);
    let row = csv.split("\r\n").nth(1).unwrap();
    assert!(row.starts_with("abc,\"作者,甲\",\"他说\"\"你好\"\"\n第二行\",N/A,0,0,0,"));
}

#[test]
fn test_render_csv_缺失字段为空() {
    let table = PostTable::from(vec![Post::new(7u64, "a", "x").without_content()]);

    let csv = render_csv(&table);
    assert!(csv.ends_with("7,a,,N/A,0,0,0,\r\n"));
}

#[test]
fn test_export_csv_写入文件() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weibo.csv");
    let table = sample_table();

    let summary = export_csv(&table, &path).unwrap();

    assert_eq!(summary.format, ExportFormat::Csv);
    assert_eq!(summary.exported_count, table.len());
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_csv(&table));
    assert_eq!(summary.file_size, written.len() as u64);
}

#[test]
fn test_export_csv_空表拒绝导出() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");

    let err = export_csv(&PostTable::new(), &path).unwrap_err();

    assert!(matches!(err, ExportError::NoData));
    assert!(!path.exists());
}

#[test]
fn test_export_csv_目录不存在() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("weibo.csv");

    let err = export_csv(&sample_table(), &path).unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
}

// ============================================================================
// Excel 测试
// ============================================================================

#[test]
fn test_export_xlsx_生成工作簿() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weibo.xlsx");
    let table = sample_table();

    let summary = export_xlsx(&table, &path).unwrap();

    assert_eq!(summary.format, ExportFormat::Xlsx);
    assert_eq!(summary.exported_count, table.len());
    assert!(summary.file_size > 0);

    // xlsx 是 zip 容器
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

fn read_xlsx_entry(path: &Path, name: &str) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut xml = String::new();
    entry.read_to_string(&mut xml).unwrap();
    xml
}

#[test]
fn test_export_xlsx_三个工作表依次排列() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weibo.xlsx");
    export_xlsx(&sample_table(), &path).unwrap();

    let workbook = read_xlsx_entry(&path, "xl/workbook.xml");
    let position = |sheet: &str| {
        workbook
            .find(&format!("<sheet name=\"{}\"", sheet))
            .unwrap_or_else(|| panic!("缺少工作表 {}", sheet))
    };

    assert_eq!((DATA_SHEET, STATS_SHEET, AUTHOR_SHEET), ("微博数据", "统计信息", "作者统计"));
    assert!(position(DATA_SHEET) < position(STATS_SHEET));
    assert!(position(STATS_SHEET) < position(AUTHOR_SHEET));
}

#[test]
fn test_export_xlsx_统计页为指标数值两列() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weibo.xlsx");
    export_xlsx(&sample_table(), &path).unwrap();

    let strings = read_xlsx_entry(&path, "xl/sharedStrings.xml");
    for text in ["指标", "数值", "总微博数", "平均转发数", "最热微博点赞数"] {
        assert!(strings.contains(text), "共享字符串缺少 {}", text);
    }

    // 第一列是指标名,第二列依次是总数、总转发数...
    let stats = read_xlsx_entry(&path, "xl/worksheets/sheet2.xml");
    assert!(stats.contains(r#"<c r="A2" t="s">"#));
    assert!(stats.contains(r#"<c r="B2"><v>6</v></c>"#));
    assert!(stats.contains(r#"<c r="B3"><v>18</v></c>"#));
    assert!(!stats.contains(r#"r="C2""#));
}

#[test]
fn test_export_xlsx_作者页以作者为行() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weibo.xlsx");
    export_xlsx(&sample_table(), &path).unwrap();

    let strings = read_xlsx_entry(&path, "xl/sharedStrings.xml");
    for text in ["作者", "微博数量", "小明", "路人"] {
        assert!(strings.contains(text), "共享字符串缺少 {}", text);
    }

    // 小明 2 条排第一,四位作者各占一行
    let authors = read_xlsx_entry(&path, "xl/worksheets/sheet3.xml");
    assert!(authors.contains(r#"<c r="A2" t="s">"#));
    assert!(authors.contains(r#"<c r="B2"><v>2</v></c>"#));
    assert!(authors.contains(r#"r="A5""#));
    assert!(!authors.contains(r#"r="A6""#));
}

#[test]
fn test_export_xlsx_空表拒绝导出() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");

    let err = export_xlsx(&PostTable::new(), &path).unwrap_err();

    assert!(matches!(err, ExportError::NoData));
    assert!(!path.exists());
}

#[test]
fn test_export_xlsx_目录不存在() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("weibo.xlsx");

    let err = export_xlsx(&sample_table(), &path).unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
}
