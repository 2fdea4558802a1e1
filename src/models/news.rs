//! 新闻数据模型

use serde::{Deserialize, Serialize};

/// 新闻情绪标签
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
}

/// 扁平新闻条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    /// 标题（非空）
    pub title: String,
    /// 摘要，超过 150 字符时截断并追加 "..."
    pub summary: String,
    /// 来源媒体
    pub source: String,
    /// 原文链接（非空）
    pub url: String,
    /// 情绪
    pub sentiment: Sentiment,
    /// 发布时间（毫秒时间戳）
    pub timestamp: i64,
    /// 北京时间显示（MM-DD HH:MM）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beijing_time: Option<String>,
    /// 日期分组："今天" 或 MM-DD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_group: Option<String>,
}
