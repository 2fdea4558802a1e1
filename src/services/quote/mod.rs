//! 股票行情服务
//!
//! 按代码缓存最近一次成功获取的报价，缓存未过期时直接返回，
//! 过期或不存在时调用上游数据源
//!
//! ## 失败处理
//! - 内部接口 `get_quote` 返回 `Result`，调用方可以区分失败和真实的零价格
//! - 只有接口层通过 `get_quote_or_default` 把失败折叠为全零哨兵
//! - 获取失败不会清除已有缓存
//!
//! 同一代码的并发缓存未命中可能同时请求上游，没有请求合并

pub mod yahoo;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Asia::Shanghai;
use futures::future::join_all;
use parking_lot::RwLock;
use thiserror::Error;

use crate::models::QuoteRecord;
use crate::services::clock::Clock;

pub use yahoo::YahooQuoteProvider;

/// 行情获取错误
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("请求上游失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("上游返回状态码 {0}")]
    Status(u16),

    #[error("上游返回错误: {0}")]
    Upstream(String),

    #[error("响应格式异常: {0}")]
    Malformed(String),

    #[error("{0} 无有效K线数据")]
    EmptySeries(String),

    #[error("{0} 昨收价为 0，无法计算涨跌幅")]
    ZeroPreviousClose(String),
}

/// 单根K线
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub close: f64,
    pub volume: Option<u64>,
}

/// 上游返回的近期价格序列（按时间升序）
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    pub bars: Vec<PriceBar>,
    /// 上游提供的昨收价
    pub previous_close: Option<f64>,
}

/// 行情数据源
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// 数据源标识，用于日志
    fn id(&self) -> &'static str;

    /// 获取近期价格序列
    async fn fetch_history(&self, symbol: &str) -> Result<PriceHistory, QuoteError>;
}

/// 根据价格序列计算报价
///
/// - 最新价：最后一根K线收盘价
/// - 昨收价：上游字段，其次倒数第二根收盘价，再次取最新价
/// - 成交量：最后一根K线成交量，缺失为 0
pub fn build_quote(symbol: &str, history: &PriceHistory) -> Result<QuoteRecord, QuoteError> {
    let last = history
        .bars
        .last()
        .ok_or_else(|| QuoteError::EmptySeries(symbol.to_string()))?;

    let current = last.close;
    let previous_close = history
        .previous_close
        .filter(|p| p.is_finite() && *p > 0.0)
        .or_else(|| {
            history
                .bars
                .len()
                .checked_sub(2)
                .map(|i| history.bars[i].close)
        })
        .unwrap_or(current);

    QuoteRecord::from_prices(current, previous_close, last.volume.unwrap_or(0))
        .ok_or_else(|| QuoteError::ZeroPreviousClose(symbol.to_string()))
}

/// 缓存条目
#[derive(Debug, Clone, Copy)]
pub struct CacheEntry {
    pub quote: QuoteRecord,
    pub captured_at: DateTime<Utc>,
}

/// 关注列表的最新价快照
#[derive(Debug, Default)]
struct PriceSnapshot {
    latest_price: BTreeMap<String, f64>,
    last_update: BTreeMap<String, String>,
}

/// 行情缓存服务
pub struct QuoteService {
    provider: Arc<dyn QuoteProvider>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    watchlist: Vec<String>,
    cache: RwLock<HashMap<String, CacheEntry>>,
    snapshot: RwLock<PriceSnapshot>,
}

impl QuoteService {
    /// 创建行情服务
    ///
    /// # 参数
    /// - ttl: 缓存有效期
    /// - watchlist: 关注的股票列表
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        watchlist: Vec<String>,
    ) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            provider,
            clock,
            ttl,
            watchlist,
            cache: RwLock::new(HashMap::new()),
            snapshot: RwLock::new(PriceSnapshot::default()),
        }
    }

    /// 关注列表
    pub fn watchlist(&self) -> &[String] {
        &self.watchlist
    }

    /// 读取缓存条目（不论是否过期）
    #[cfg(test)]
    pub fn cached(&self, symbol: &str) -> Option<CacheEntry> {
        self.cache.read().get(symbol).copied()
    }

    fn fresh(&self, symbol: &str, now: DateTime<Utc>) -> Option<QuoteRecord> {
        let cache = self.cache.read();
        let entry = cache.get(symbol)?;
        (now - entry.captured_at < self.ttl).then_some(entry.quote)
    }

    /// 获取报价
    ///
    /// 缓存未过期时不访问上游；获取成功后覆盖缓存，失败时缓存保持不变
    pub async fn get_quote(&self, symbol: &str) -> Result<QuoteRecord, QuoteError> {
        if let Some(quote) = self.fresh(symbol, self.clock.now()) {
            log::debug!("{} 命中缓存", symbol);
            return Ok(quote);
        }

        let result = self
            .provider
            .fetch_history(symbol)
            .await
            .and_then(|history| build_quote(symbol, &history));

        match result {
            Ok(quote) => {
                let entry = CacheEntry {
                    quote,
                    captured_at: self.clock.now(),
                };
                self.cache.write().insert(symbol.to_string(), entry);
                Ok(quote)
            }
            Err(e) => {
                log::warn!("获取 {} 股价失败 ({}): {}", symbol, self.provider.id(), e);
                Err(e)
            }
        }
    }

    /// 获取报价，失败时返回全零哨兵
    pub async fn get_quote_or_default(&self, symbol: &str) -> QuoteRecord {
        self.get_quote(symbol)
            .await
            .unwrap_or_else(|_| QuoteRecord::sentinel())
    }

    /// 刷新关注列表中的全部股票
    ///
    /// 成功的代码更新最新价和更新时间，失败的代码跳过
    pub async fn refresh_all(&self) {
        let results = join_all(self.watchlist.iter().map(|s| self.get_quote(s))).await;
        let updated_at = self.clock.now().with_timezone(&Shanghai).to_rfc3339();

        let mut snapshot = self.snapshot.write();
        let mut ok_count = 0;
        for (symbol, result) in self.watchlist.iter().zip(results) {
            if let Ok(quote) = result {
                snapshot.latest_price.insert(symbol.clone(), quote.current);
                snapshot.last_update.insert(symbol.clone(), updated_at.clone());
                ok_count += 1;
            }
        }

        log::info!("刷新股价完成: {}/{} 成功", ok_count, self.watchlist.len());
    }

    /// 最新价（只包含曾经成功获取过的代码）
    pub fn latest_prices(&self) -> BTreeMap<String, f64> {
        self.snapshot.read().latest_price.clone()
    }

    /// 最近一次成功更新时间
    pub fn last_updates(&self) -> BTreeMap<String, String> {
        self.snapshot.read().last_update.clone()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 可编程的行情数据源
    #[derive(Default)]
    pub struct FakeQuoteProvider {
        histories: Mutex<HashMap<String, PriceHistory>>,
        calls: AtomicUsize,
    }

    impl FakeQuoteProvider {
        pub fn set(&self, symbol: &str, closes: &[f64], previous_close: Option<f64>) {
            let bars = closes
                .iter()
                .map(|&close| PriceBar {
                    close,
                    volume: Some(1_000),
                })
                .collect();
            self.histories
                .lock()
                .insert(symbol.to_string(), PriceHistory { bars, previous_close });
        }

        pub fn remove(&self, symbol: &str) {
            self.histories.lock().remove(symbol);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteProvider for FakeQuoteProvider {
        fn id(&self) -> &'static str {
            "FAKE"
        }

        async fn fetch_history(&self, symbol: &str) -> Result<PriceHistory, QuoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.histories
                .lock()
                .get(symbol)
                .cloned()
                .ok_or(QuoteError::Status(404))
        }
    }
}
