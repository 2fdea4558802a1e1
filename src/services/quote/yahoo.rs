//! Yahoo Finance 行情接口实现
//!
//! 对接 https://query1.finance.yahoo.com/v8/finance/chart/<symbol>
//! 取最近 5 个交易日的 1 分钟K线

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{PriceBar, PriceHistory, QuoteError, QuoteProvider};

/// Yahoo 图表 API
pub const YAHOO_CHART_API: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo 行情数据源
pub struct YahooQuoteProvider {
    client: Client,
    base_url: String,
}

impl YahooQuoteProvider {
    /// 创建数据源，超时取自配置
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        Self::with_base_url(YAHOO_CHART_API, timeout, connect_timeout)
    }

    /// 指定图表 API 地址（不含代码部分）
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    fn id(&self) -> &'static str {
        "YAHOO"
    }

    async fn fetch_history(&self, symbol: &str) -> Result<PriceHistory, QuoteError> {
        let url = format!("{}/{}", self.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("range", "5d"), ("interval", "1m")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuoteError::Status(response.status().as_u16()));
        }

        let chart: ChartResponse = response.json().await?;
        parse_chart(chart, symbol)
    }
}

// ==================== 响应结构 ====================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    previous_close: Option<f64>,
    regular_market_previous_close: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// 将图表响应转换为价格序列
///
/// 收盘价为空的K线会被丢弃，成交量缺失记为 `None`
fn parse_chart(chart: ChartResponse, symbol: &str) -> Result<PriceHistory, QuoteError> {
    if let Some(err) = chart.chart.error {
        return Err(QuoteError::Upstream(format!(
            "{}: {}",
            err.code.unwrap_or_default(),
            err.description.unwrap_or_default()
        )));
    }

    let result = chart
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| QuoteError::Malformed(format!("{} 无 result 字段", symbol)))?;

    let previous_close = result
        .meta
        .previous_close
        .or(result.meta.regular_market_previous_close);

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let bars = quote
        .close
        .iter()
        .enumerate()
        .filter_map(|(i, close)| {
            let close = (*close).filter(|c| c.is_finite())?;
            let volume = quote
                .volume
                .get(i)
                .copied()
                .flatten()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u64);
            Some(PriceBar { close, volume })
        })
        .collect();

    Ok(PriceHistory {
        bars,
        previous_close,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn parse(json: serde_json::Value) -> Result<PriceHistory, QuoteError> {
        let chart: ChartResponse = serde_json::from_value(json).unwrap();
        parse_chart(chart, "TSLA")
    }

    #[test]
    fn test_parse_chart_drops_null_bars() {
        let history = parse(serde_json::json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "TSLA", "previousClose": 240.5 },
                    "timestamp": [1, 2, 3, 4],
                    "indicators": {
                        "quote": [{
                            "close": [241.0, null, 242.25, 243.1],
                            "volume": [100, 200, null, 400]
                        }]
                    }
                }],
                "error": null
            }
        }))
        .unwrap();

        assert_eq!(history.previous_close, Some(240.5));
        let closes: Vec<f64> = history.bars.iter().map(|b| b.close).collect();
        let volumes: Vec<Option<u64>> = history.bars.iter().map(|b| b.volume).collect();
        assert_eq!(closes, vec![241.0, 242.25, 243.1]);
        assert_eq!(volumes, vec![Some(100), None, Some(400)]);
    }

    #[test]
    fn test_parse_chart_regular_market_previous_close() {
        let history = parse(serde_json::json!({
            "chart": {
                "result": [{
                    "meta": { "regularMarketPreviousClose": 12.5 },
                    "indicators": { "quote": [{ "close": [13.0] }] }
                }],
                "error": null
            }
        }))
        .unwrap();

        assert_eq!(history.previous_close, Some(12.5));
        assert_eq!(history.bars.len(), 1);
        assert_eq!(history.bars[0].volume, None);
    }

    #[test]
    fn test_parse_chart_upstream_error() {
        let result = parse(serde_json::json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                }
            }
        }));

        assert!(matches!(result, Err(QuoteError::Upstream(msg)) if msg.contains("Not Found")));
    }

    #[test]
    fn test_parse_chart_missing_result() {
        let result = parse(serde_json::json!({ "chart": { "result": [], "error": null } }));
        assert!(matches!(result, Err(QuoteError::Malformed(_))));
    }

    #[test]
    fn test_parse_chart_without_indicators() {
        let history = parse(serde_json::json!({
            "chart": { "result": [{ "meta": {} }], "error": null }
        }))
        .unwrap();

        assert!(history.bars.is_empty());
        assert!(history.previous_close.is_none());
    }

    fn provider(server: &MockServer) -> YahooQuoteProvider {
        YahooQuoteProvider::with_base_url(
            format!("{}/v8/finance/chart/", server.uri()),
            Duration::from_secs(2),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_history_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/TSLA"))
            .and(query_param("range", "5d"))
            .and(query_param("interval", "1m"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "chart": {
                    "result": [{
                        "meta": { "previousClose": 200.0 },
                        "indicators": {
                            "quote": [{ "close": [201.0, 202.5], "volume": [10, 20] }]
                        }
                    }],
                    "error": null
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let history = provider(&server).fetch_history("TSLA").await.unwrap();
        assert_eq!(history.previous_close, Some(200.0));
        assert_eq!(history.bars.len(), 2);
        assert_eq!(history.bars[1].close, 202.5);
        assert_eq!(history.bars[1].volume, Some(20));
    }

    #[tokio::test]
    async fn test_fetch_history_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/COIN"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let result = provider(&server).fetch_history("COIN").await;
        assert!(matches!(result, Err(QuoteError::Status(429))));
    }

    #[tokio::test]
    async fn test_fetch_history_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/UBER"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let result = provider(&server).fetch_history("UBER").await;
        assert!(matches!(result, Err(QuoteError::Http(_))));
    }
}
