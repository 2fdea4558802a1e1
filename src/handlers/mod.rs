pub mod health;
pub mod news;
pub mod prices;
pub mod static_files;

use actix_web::web;

/// 注册 `/api` 路由，静态文件服务由 `static_files::service` 在其后挂载
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(health::config)
            .configure(prices::config)
            .configure(news::config)
    );
}
