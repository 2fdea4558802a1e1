//! 财经新闻服务
//!
//! 配置了 NewsAPI 密钥时请求实时新闻，未配置或请求失败时回退到备用新闻。
//! 新闻不做缓存，每次请求重新生成

pub mod fallback;
pub mod newsapi;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::config::FallbackSet;
use crate::models::NewsItem;
use crate::services::clock::Clock;

pub use fallback::{fallback_news, paginate};
pub use newsapi::{normalize_articles, NewsApiClient, RawArticle};

/// 新闻显示时区
pub const DISPLAY_TZ: Tz = chrono_tz::Asia::Shanghai;

/// 新闻检索时间范围（天）
const LOOKBACK_DAYS: i64 = 7;
/// NewsAPI 单页上限
const MAX_PAGE_SIZE: usize = 100;

/// 计算显示字段：(MM-DD HH:MM, 日期分组)
pub fn display_fields(published: &DateTime<Tz>, now: &DateTime<Tz>) -> (String, String) {
    let beijing_time = published.format("%m-%d %H:%M").to_string();
    let date_group = if published.date_naive() == now.date_naive() {
        "今天".to_string()
    } else {
        published.format("%m-%d").to_string()
    };
    (beijing_time, date_group)
}

/// 新闻数据源
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// 获取 `from` 之后的文章，按发布时间倒序
    async fn fetch_articles(
        &self,
        page: u32,
        page_size: usize,
        from: DateTime<Utc>,
    ) -> Result<Vec<RawArticle>>;
}

/// 新闻聚合服务
pub struct NewsService {
    provider: Option<Arc<dyn NewsProvider>>,
    fallback: FallbackSet,
    per_page: usize,
    clock: Arc<dyn Clock>,
}

impl NewsService {
    /// 创建新闻服务，`provider` 为空时只使用备用新闻
    pub fn new(
        provider: Option<Arc<dyn NewsProvider>>,
        fallback: FallbackSet,
        per_page: usize,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            fallback,
            per_page,
            clock,
        }
    }

    /// 每页条数
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// 获取一页新闻
    ///
    /// 实时数据源失败时回退到备用新闻，本方法不返回错误
    pub async fn get_news(&self, page: u32, per_page: usize) -> Vec<NewsItem> {
        let page = page.max(1);
        let now = self.clock.now();

        if let Some(provider) = &self.provider {
            let page_size = per_page.saturating_mul(2).min(MAX_PAGE_SIZE);
            let from = now - Duration::days(LOOKBACK_DAYS);

            match provider.fetch_articles(page, page_size, from).await {
                Ok(articles) => return normalize_articles(articles, per_page, now),
                Err(e) => log::warn!("获取新闻失败，使用备用新闻: {}", e),
            }
        } else {
            log::debug!("未设置 NEWS_API_KEY，使用备用新闻");
        }

        paginate(&fallback_news(self.fallback, now), page, per_page)
    }
}
