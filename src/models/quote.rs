//! 股票行情数据模型
//!
//! 定义单只股票的报价快照

use serde::{Deserialize, Serialize};

/// 保留两位小数（四舍五入，远离零）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 股票报价
///
/// `change` 与 `change_percent` 均由已取整的 `current` 和 `previous_close`
/// 计算得出，因此三者始终保持一致
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct QuoteRecord {
    /// 最新价
    pub current: f64,
    /// 昨收价
    pub previous_close: f64,
    /// 涨跌额
    pub change: f64,
    /// 涨跌幅（百分比）
    pub change_percent: f64,
    /// 最近一根K线的成交量
    pub volume: u64,
}

impl QuoteRecord {
    /// 根据最新价和昨收价构建报价
    ///
    /// 昨收价取整后为 0 时返回 `None`，避免除零
    pub fn from_prices(current: f64, previous_close: f64, volume: u64) -> Option<Self> {
        let current = round2(current);
        let previous_close = round2(previous_close);

        if previous_close == 0.0 || !current.is_finite() || !previous_close.is_finite() {
            return None;
        }

        let change = round2(current - previous_close);
        let change_percent = round2(change / previous_close * 100.0);

        Some(Self {
            current,
            previous_close,
            change,
            change_percent,
            volume,
        })
    }

    /// 全零哨兵值
    ///
    /// 仅在获取失败时由接口层返回，不代表真实的零价格。
    /// 内部调用方应使用 `QuoteService::get_quote` 的 `Result` 区分失败
    pub fn sentinel() -> Self {
        Self {
            current: 0.0,
            previous_close: 0.0,
            change: 0.0,
            change_percent: 0.0,
            volume: 0,
        }
    }
}
