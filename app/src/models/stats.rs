//! 统计结果模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 按小时(0-23)统计的发帖数量,键有序
pub type HourlyDistribution = BTreeMap<u32, usize>;

/// 基础统计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    pub count: usize,
    pub sum_reposts: u64,
    pub sum_comments: u64,
    pub sum_likes: u64,
    pub mean_reposts: f64,
    pub mean_comments: f64,
    pub mean_likes: f64,
    pub max_reposts: u64,
    pub max_comments: u64,
    pub max_likes: u64,
}

/// 统计项的取值: 整数精确值或保留两位小数的均值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(u64),
    Decimal(f64),
}

impl MetricValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            MetricValue::Integer(v) => v as f64,
            MetricValue::Decimal(v) => v,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{}", v),
            MetricValue::Decimal(v) => write!(f, "{}", v),
        }
    }
}

impl BasicStats {
    /// 以固定顺序列出 (指标名, 数值),用于展示和导出统计工作表
    pub fn metric_rows(&self) -> Vec<(&'static str, MetricValue)> {
        vec![
            ("总微博数", MetricValue::Integer(self.count as u64)),
            ("总转发数", MetricValue::Integer(self.sum_reposts)),
            ("总评论数", MetricValue::Integer(self.sum_comments)),
            ("总点赞数", MetricValue::Integer(self.sum_likes)),
            ("平均转发数", MetricValue::Decimal(self.mean_reposts)),
            ("平均评论数", MetricValue::Decimal(self.mean_comments)),
            ("平均点赞数", MetricValue::Decimal(self.mean_likes)),
            ("最热微博转发数", MetricValue::Integer(self.max_reposts)),
            ("最热微博评论数", MetricValue::Integer(self.max_comments)),
            ("最热微博点赞数", MetricValue::Integer(self.max_likes)),
        ]
    }
}

/// 单个作者的汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorStats {
    pub author: String,
    pub post_count: usize,
    pub reposts: u64,
    pub comments: u64,
    pub likes: u64,
}

/// 正文长度统计 (单位: 字符)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentLengthStats {
    pub mean: f64,
    pub max: usize,
    pub min: usize,
    pub median: f64,
}
