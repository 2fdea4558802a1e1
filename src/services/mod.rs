//! 业务逻辑服务模块
//!
//! 封装行情缓存和新闻聚合逻辑

pub mod clock;  // 时钟抽象
pub mod news;   // 新闻聚合服务
pub mod quote;  // 行情缓存服务
