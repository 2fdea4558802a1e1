//! 前端静态文件
//!
//! - GET / - index.html
//! - GET /{filename} - 静态目录下的任意文件
//!
//! 必须在 `/api` 作用域之后注册

use std::path::Path;

use actix_files::Files;

/// 以 `root` 为根目录的静态文件服务
pub fn service(root: &Path) -> Files {
    Files::new("/", root).index_file("index.html")
}
