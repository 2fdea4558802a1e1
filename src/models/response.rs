//! API 响应模型
//!
//! 所有数据接口都带有顶层 `timestamp`（北京时间，ISO 8601）

use std::collections::BTreeMap;

use chrono::Utc;
use chrono_tz::Asia::Shanghai;
use serde::Serialize;

use super::{NewsItem, QuoteRecord};

/// 获取北京时间字符串（ISO 8601 格式，带+08:00时区）
pub fn get_beijing_time() -> String {
    Utc::now().with_timezone(&Shanghai).to_rfc3339()
}

/// GET /api/prices
#[derive(Debug, Serialize)]
pub struct PricesResponse {
    /// 代码 -> 最新价
    pub prices: BTreeMap<String, f64>,
    /// 代码 -> 最近一次成功更新时间
    pub last_update: BTreeMap<String, String>,
    pub timestamp: String,
}

impl PricesResponse {
    pub fn new(prices: BTreeMap<String, f64>, last_update: BTreeMap<String, String>) -> Self {
        Self {
            prices,
            last_update,
            timestamp: get_beijing_time(),
        }
    }
}

/// GET /api/all-data
#[derive(Debug, Serialize)]
pub struct AllDataResponse {
    /// 代码 -> 报价详情（获取失败时为全零哨兵）
    pub prices: BTreeMap<String, QuoteRecord>,
    pub last_update: BTreeMap<String, String>,
    pub timestamp: String,
}

impl AllDataResponse {
    pub fn new(
        prices: BTreeMap<String, QuoteRecord>,
        last_update: BTreeMap<String, String>,
    ) -> Self {
        Self {
            prices,
            last_update,
            timestamp: get_beijing_time(),
        }
    }
}

/// GET /api/news/flat[/{page}]
#[derive(Debug, Serialize)]
pub struct NewsPageResponse {
    pub news: Vec<NewsItem>,
    pub page: u32,
    pub per_page: usize,
    /// 仅根据本页是否填满判断，最后一页恰好满页时会误报
    pub has_more: bool,
    pub timestamp: String,
}

impl NewsPageResponse {
    pub fn new(news: Vec<NewsItem>, page: u32, per_page: usize) -> Self {
        let has_more = news.len() == per_page;
        Self {
            news,
            page,
            per_page,
            has_more,
            timestamp: get_beijing_time(),
        }
    }
}

/// GET /api/health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
