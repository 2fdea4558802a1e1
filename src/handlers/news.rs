//! 新闻接口处理器
//!
//! - GET /api/news/flat - 第一页
//! - GET /api/news/flat/{page} - 指定页（页码从 1 开始，0 视为 1）

use actix_web::{web, HttpResponse, Result};

use crate::models::NewsPageResponse;
use crate::services::news::NewsService;

async fn news_page(service: &NewsService, page: u32) -> HttpResponse {
    let page = page.max(1);
    let per_page = service.per_page();
    let news = service.get_news(page, per_page).await;

    HttpResponse::Ok().json(NewsPageResponse::new(news, page, per_page))
}

/// GET /api/news/flat
pub async fn get_flat_news(service: web::Data<NewsService>) -> Result<HttpResponse> {
    Ok(news_page(&service, 1).await)
}

/// GET /api/news/flat/{page}
pub async fn get_flat_news_page(
    service: web::Data<NewsService>,
    path: web::Path<u32>,
) -> Result<HttpResponse> {
    Ok(news_page(&service, path.into_inner()).await)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/news/flat")
            .route("", web::get().to(get_flat_news))
            .route("/{page}", web::get().to(get_flat_news_page))
    );
}
