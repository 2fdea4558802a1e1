//! NewsAPI 新闻接口实现
//!
//! 对接 https://newsapi.org/v2/everything

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;

use super::{display_fields, NewsProvider, DISPLAY_TZ};
use crate::models::{NewsItem, Sentiment};

/// NewsAPI everything 接口
pub const NEWSAPI_EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";

/// 新闻请求超时
const NEWS_TIMEOUT: Duration = Duration::from_secs(5);

/// 覆盖关注公司及大盘财经的检索式
pub const NEWS_QUERY: &str = "(Tesla OR TSLA OR \"Elon Musk\" OR EV) \
    OR (Uber OR UBER OR \"ride sharing\") \
    OR (Coinbase OR COIN OR cryptocurrency) \
    OR (Reddit OR RDDT OR social media) \
    OR (Candel OR CADL) \
    OR (stock market OR stocks OR trading OR investment OR earnings \
    OR market OR finance OR financial OR business OR economy)";

/// 被撤稿文章的占位标题
const REMOVED_TITLE: &str = "[Removed]";
/// 摘要最大字符数
const SUMMARY_MAX_CHARS: usize = 150;
const DEFAULT_SUMMARY: &str = "点击查看详情";
const DEFAULT_SOURCE: &str = "权威媒体";

/// NewsAPI 原始文章
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub source: Option<RawSource>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    articles: Vec<RawArticle>,
    message: Option<String>,
}

/// NewsAPI 客户端
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, NEWSAPI_EVERYTHING_URL)
    }

    /// 指定 everything 接口地址
    pub fn with_base_url(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(NEWS_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn fetch_articles(
        &self,
        page: u32,
        page_size: usize,
        from: DateTime<Utc>,
    ) -> Result<Vec<RawArticle>> {
        let from = from.to_rfc3339_opts(SecondsFormat::Secs, true);
        let page_size = page_size.to_string();
        let page = page.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", NEWS_QUERY),
                ("apiKey", self.api_key.as_str()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("from", from.as_str()),
                ("pageSize", page_size.as_str()),
                ("page", page.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("获取新闻失败: {}", response.status()));
        }

        let data: EverythingResponse = response.json().await?;
        if data.status != "ok" {
            bail!(
                "NewsAPI 返回状态 {}: {}",
                data.status,
                data.message.unwrap_or_default()
            );
        }
        if data.articles.is_empty() {
            bail!("NewsAPI 未返回文章");
        }

        Ok(data.articles)
    }
}

/// 截断摘要，超过 150 字符时追加 "..."
pub fn truncate_summary(text: &str) -> String {
    if text.chars().count() > SUMMARY_MAX_CHARS {
        let head: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// 将原始文章规范化为新闻条目
///
/// 丢弃标题为空、已撤稿或链接为空的文章，最多保留 `per_page` 条
pub fn normalize_articles(
    articles: Vec<RawArticle>,
    per_page: usize,
    now: DateTime<Utc>,
) -> Vec<NewsItem> {
    let now_local = now.with_timezone(&DISPLAY_TZ);

    articles
        .into_iter()
        .filter_map(|article| normalize_article(article, &now_local))
        .take(per_page)
        .collect()
}

fn normalize_article(article: RawArticle, now: &DateTime<Tz>) -> Option<NewsItem> {
    let title = article.title.as_deref().unwrap_or("").trim().to_string();
    let url = article.url.as_deref().unwrap_or("").trim().to_string();

    if title.is_empty() || title == REMOVED_TITLE || url.is_empty() {
        return None;
    }

    let description = article.description.as_deref().unwrap_or("").trim();
    let summary = if description.is_empty() {
        DEFAULT_SUMMARY
    } else {
        description
    };

    let source = article
        .source
        .and_then(|s| s.name)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    let published = article
        .published_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&DISPLAY_TZ))
        .unwrap_or(*now);

    let (beijing_time, date_group) = display_fields(&published, now);

    Some(NewsItem {
        title,
        summary: truncate_summary(summary),
        source,
        url,
        sentiment: Sentiment::Positive,
        timestamp: published.timestamp_millis(),
        beijing_time: Some(beijing_time),
        date_group: Some(date_group),
    })
}
