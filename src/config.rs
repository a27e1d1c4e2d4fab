//! 进程级配置
//!
//! 在 `main` 中构建一次 `AppConfig`，之后以只读方式传入各组件，不使用散落的全局常量。

use crate::image_handler::ImageConfig;

/// HTTP 监听配置。
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 绑定地址，默认监听所有网卡。
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

/// 应用整体配置。
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub image: ImageConfig,
}
