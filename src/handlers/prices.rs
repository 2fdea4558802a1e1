//! 股价接口处理器
//!
//! ## API 列表
//! - GET /api/prices - 刷新并返回最新价
//! - GET /api/all-data - 刷新并返回每只股票的完整报价
//!
//! 上游失败不会返回 5xx，失败的股票在 all-data 中以全零哨兵表示

use std::collections::BTreeMap;

use actix_web::{web, HttpResponse, Result};

use crate::models::{AllDataResponse, PricesResponse};
use crate::services::quote::QuoteService;

/// 获取最新价
///
/// GET /api/prices
pub async fn get_prices(service: web::Data<QuoteService>) -> Result<HttpResponse> {
    service.refresh_all().await;

    let response = PricesResponse::new(service.latest_prices(), service.last_updates());
    Ok(HttpResponse::Ok().json(response))
}

/// 获取完整报价
///
/// GET /api/all-data
pub async fn get_all_data(service: web::Data<QuoteService>) -> Result<HttpResponse> {
    service.refresh_all().await;

    let mut prices = BTreeMap::new();
    for symbol in service.watchlist() {
        let quote = service.get_quote_or_default(symbol).await;
        prices.insert(symbol.clone(), quote);
    }

    let response = AllDataResponse::new(prices, service.last_updates());
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/prices", web::get().to(get_prices))
        .route("/all-data", web::get().to(get_all_data));
}
