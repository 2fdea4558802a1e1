//! 股票监控后端服务
//!
//! 为前端看板提供关注股票的实时报价和财经新闻
//! 数据来源：Yahoo Finance、NewsAPI

mod config;   // 配置加载
mod handlers; // HTTP 请求处理器
mod models;   // 数据模型定义
mod services; // 业务逻辑服务

use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::services::clock::{Clock, SystemClock};
use crate::services::news::{NewsApiClient, NewsProvider, NewsService};
use crate::services::quote::{QuoteService, YahooQuoteProvider};

/// 应用程序入口
///
/// 启动 HTTP 服务器，端口取自 `PORT` 环境变量（默认 8080）
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 初始化日志系统，默认日志级别为 info
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::load();
    log::info!("启动股票监控服务，关注列表: {:?}", config.quote.watchlist);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let quote_provider = YahooQuoteProvider::new(
        Duration::from_secs(config.api.timeout_secs),
        Duration::from_secs(config.api.connect_timeout_secs),
    )
    .map_err(std::io::Error::other)?;

    let quotes = web::Data::new(QuoteService::new(
        Arc::new(quote_provider),
        clock.clone(),
        config.cache_ttl(),
        config.quote.watchlist.clone(),
    ));

    let news_provider: Option<Arc<dyn NewsProvider>> = match config.news_api_key() {
        Some(key) => match NewsApiClient::new(key) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                log::warn!("创建 NewsAPI 客户端失败，使用备用新闻: {}", e);
                None
            }
        },
        None => {
            log::warn!("未设置 NEWS_API_KEY 环境变量，使用备用新闻");
            None
        }
    };

    let news = web::Data::new(NewsService::new(
        news_provider,
        config.news.fallback,
        config.news.per_page,
        clock,
    ));

    let static_dir = config.server.static_dir.clone();

    let bind_addr = config.bind_addr();
    log::info!("监听地址: {}", bind_addr);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(quotes.clone())
            .app_data(news.clone())
            .configure(handlers::config)  // 配置路由
            .service(handlers::static_files::service(&static_dir))  // 静态文件放在最后
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await
}
