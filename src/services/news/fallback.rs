//! 备用新闻
//!
//! 未配置 NewsAPI 密钥或请求失败时使用的固定新闻集合，
//! 发布时间相对当前时间倒推

use chrono::{DateTime, Duration, Utc};

use super::{display_fields, DISPLAY_TZ};
use crate::config::FallbackSet;
use crate::models::{NewsItem, Sentiment};

/// (标题, 摘要, 来源, 链接, 情绪, 距今小时数)
type FallbackEntry = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    Sentiment,
    i64,
);

const SAMPLE_NEWS: [FallbackEntry; 6] = [
    (
        "Tesla股价因自动驾驶技术突破上涨",
        "特斯拉最新的FSD v12版本在测试中表现出色，投资者信心增强",
        "Reuters",
        "https://reuters.com/business/autos/tesla-fsd-breakthrough",
        Sentiment::Positive,
        1,
    ),
    (
        "Reddit广告收入超预期，用户增长强劲",
        "Reddit最新财报显示广告收入同比增长显著，用户活跃度提升",
        "CNBC",
        "https://cnbc.com/2024/reddit-earnings-beat",
        Sentiment::Positive,
        2,
    ),
    (
        "Uber宣布扩大自动驾驶车队规模",
        "优步计划在主要城市扩大自动驾驶车队规模",
        "Bloomberg",
        "https://bloomberg.com/news/uber-autonomous-expansion",
        Sentiment::Positive,
        3,
    ),
    (
        "Coinbase推出新功能提升用户体验",
        "Coinbase宣布推出多项新功能",
        "CoinDesk",
        "https://coindesk.com/business/coinbase-new-features",
        Sentiment::Positive,
        4,
    ),
    (
        "特朗普政策讨论影响科技股走势",
        "市场对特朗普政策进行解读，科技股波动",
        "Financial Times",
        "https://ft.com/content/trump-tech-impact",
        Sentiment::Neutral,
        5,
    ),
    (
        "Candel Therapeutics临床进展顺利",
        "CADL癌症免疫疗法临床试验显示良好效果",
        "BioPharma Dive",
        "https://biopharmadive.com/news/cadel-clinical-trial",
        Sentiment::Positive,
        6,
    ),
];

const MOCK_NEWS: [FallbackEntry; 3] = [
    (
        "Tesla股价因自动驾驶技术突破上涨5%",
        "特斯拉最新的FSD v12版本在测试中表现出色，投资者信心增强，股价应声上涨",
        "路透社",
        "#",
        Sentiment::Positive,
        1,
    ),
    (
        "Reddit广告收入超预期，用户增长强劲",
        "Reddit最新财报显示广告收入同比增长45%，超出分析师预期",
        "CNBC",
        "#",
        Sentiment::Positive,
        2,
    ),
    (
        "Uber宣布扩大自动驾驶车队规模至10万辆",
        "优步计划在2025年将自动驾驶车队扩大至10万辆，投资50亿美元",
        "彭博社",
        "#",
        Sentiment::Positive,
        3,
    ),
];

/// 生成备用新闻（按时间倒序）
pub fn fallback_news(set: FallbackSet, now: DateTime<Utc>) -> Vec<NewsItem> {
    let entries: &[FallbackEntry] = match set {
        FallbackSet::Sample => &SAMPLE_NEWS,
        FallbackSet::Mock => &MOCK_NEWS,
    };

    let now_local = now.with_timezone(&DISPLAY_TZ);

    let mut items: Vec<NewsItem> = entries
        .iter()
        .map(|&(title, summary, source, url, sentiment, hours_ago)| {
            let published = now_local - Duration::hours(hours_ago);
            let (beijing_time, date_group) = display_fields(&published, &now_local);
            NewsItem {
                title: title.to_string(),
                summary: summary.to_string(),
                source: source.to_string(),
                url: url.to_string(),
                sentiment,
                timestamp: published.timestamp_millis(),
                beijing_time: Some(beijing_time),
                date_group: Some(date_group),
            }
        })
        .collect();

    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items
}

/// 内存分页
///
/// `page` 从 1 开始，起始位置超出总数时返回空
pub fn paginate<T: Clone>(items: &[T], page: u32, per_page: usize) -> Vec<T> {
    let page = page.max(1) as usize;
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(per_page).min(items.len());
    items[start..end].to_vec()
}
