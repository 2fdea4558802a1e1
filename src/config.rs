//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，环境变量 `PORT` / `NEWS_API_KEY` 优先

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
    /// 前端静态文件目录
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

/// 上游请求配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 行情配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// 关注的股票列表，启动后不可变
    #[serde(default = "default_watchlist")]
    pub watchlist: Vec<String>,
    /// 报价缓存有效期（秒）
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

/// 备用新闻集合
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FallbackSet {
    /// 6 条固定样例新闻（部署环境）
    Sample,
    /// 3 条模拟新闻（本地开发）
    Mock,
}

/// 新闻配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// NewsAPI 密钥（为空则只使用备用新闻）
    #[serde(default)]
    pub api_key: String,
    /// 每页条数
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    /// 备用新闻集合
    #[serde(default = "default_fallback")]
    pub fallback: FallbackSet,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 上游请求配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 行情配置
    #[serde(default)]
    pub quote: QuoteConfig,
    /// 新闻配置
    #[serde(default)]
    pub news: NewsConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_static_dir() -> PathBuf { PathBuf::from("static") }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_watchlist() -> Vec<String> {
    ["RDDT", "TSLA", "UBER", "COIN", "CADL"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_cache_ttl() -> u64 { 300 }
fn default_per_page() -> usize { 10 }
fn default_fallback() -> FallbackSet { FallbackSet::Sample }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
            static_dir: default_static_dir(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            watchlist: default_watchlist(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            per_page: default_per_page(),
            fallback: default_fallback(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值，最后应用环境变量覆盖
    pub fn load() -> Self {
        let mut config = Self::load_file();
        config.apply_env(|key| env::var(key).ok());
        config
    }

    fn load_file() -> Self {
        let config_paths = ["config.json", "config/config.json"];

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        log::info!("从 {} 加载配置成功", path);
                        return config;
                    }
                    Err(e) => {
                        log::warn!("加载配置文件 {} 失败: {}", path, e);
                    }
                }
            }
        }

        log::info!("使用默认配置");
        Self::default()
    }

    /// 应用环境变量覆盖
    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => log::warn!("PORT 环境变量无效 ({}): {}", port, e),
            }
        }

        if let Some(key) = lookup("NEWS_API_KEY") {
            self.news.api_key = key.trim().to_string();
        }

        if self.news.per_page == 0 {
            log::warn!("news.per_page 不能为 0，使用默认值");
            self.news.per_page = default_per_page();
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 报价缓存有效期
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.quote.cache_ttl_secs)
    }

    /// 新闻 API 密钥，未配置时返回 `None`
    pub fn news_api_key(&self) -> Option<&str> {
        let key = self.news.api_key.as_str();
        (!key.is_empty()).then_some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.quote.cache_ttl_secs, 300);
        assert_eq!(config.quote.watchlist, vec!["RDDT", "TSLA", "UBER", "COIN", "CADL"]);
        assert_eq!(config.news.per_page, 10);
        assert_eq!(config.news.fallback, FallbackSet::Sample);
        assert!(config.news_api_key().is_none());
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "server": { "port": 9000 },
            "quote": { "watchlist": ["AAPL"], "cache_ttl_secs": 60 },
            "news": { "fallback": "mock" }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.quote.watchlist, vec!["AAPL"]);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.news.fallback, FallbackSet::Mock);
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env(lookup_from(&[("PORT", "3000"), ("NEWS_API_KEY", " abc ")]));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.news_api_key(), Some("abc"));
    }

    #[test]
    fn test_env_invalid_port_keeps_previous() {
        let mut config = AppConfig::default();
        config.apply_env(lookup_from(&[("PORT", "not-a-port")]));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_empty_api_key_means_none() {
        let mut config = AppConfig::default();
        config.apply_env(lookup_from(&[("NEWS_API_KEY", "")]));
        assert!(config.news_api_key().is_none());
    }
}
