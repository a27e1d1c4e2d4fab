//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有"可调策略"集中到 `ImageConfig`，在进程启动时构建一次，之后只读传递。
//! 覆盖的阶段：源图片下载、解码限制、像素化半径策略、两个阶段各自的超时。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用配置。
//! - `validate` 在启动时拒绝自相矛盾的参数，避免运行期才暴露问题。
//! - 超时以 `Option<u64>` 表达："None" 即不设上限。

use std::time::Duration;

use super::ImageError;

/// 默认的远程图片源。固定配置，永远不从请求参数中读取（防 SSRF）。
pub const DEFAULT_SOURCE_URL: &str = "https://api.anosu.top/img?sort=setu";

/// 图片处理配置。
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// 远程图片源地址。
    pub source_url: String,
    /// 获取阶段（下载 + 解码）超时（毫秒），`None` 表示不限。
    pub fetch_timeout_ms: Option<u64>,
    /// 变换阶段（像素化 + 编码）超时（毫秒），`None` 表示不限。
    pub transform_timeout_ms: Option<u64>,
    /// `size` 缺失或不是数字时采用的半径。
    pub default_radius: u32,
    /// 允许的最大半径。
    pub max_radius: u32,
    /// 建立连接（TCP/TLS）超时时间（秒）。
    pub connect_timeout: u64,
    /// 最大重定向次数。
    pub max_redirects: usize,
    /// 下载允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fetch_timeout_ms: Some(30_000),
            transform_timeout_ms: Some(1_000),
            default_radius: 10,
            max_radius: 100,
            connect_timeout: 8,
            max_redirects: 5,
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
        }
    }
}

impl ImageConfig {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    pub fn transform_timeout(&self) -> Option<Duration> {
        self.transform_timeout_ms.map(Duration::from_millis)
    }

    /// 解析源地址，只接受 http/https。
    pub fn parsed_source_url(&self) -> Result<reqwest::Url, ImageError> {
        let parsed = reqwest::Url::parse(&self.source_url)
            .map_err(|e| ImageError::Validation(format!("source_url 格式错误：{}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ImageError::Validation(format!(
                "source_url 仅支持 http/https，当前：{}",
                parsed.scheme()
            )));
        }
        Ok(parsed)
    }

    /// 校验配置自洽性。
    pub fn validate(&self) -> Result<(), ImageError> {
        self.parsed_source_url()?;

        if self.fetch_timeout_ms == Some(0) || self.transform_timeout_ms == Some(0) {
            return Err(ImageError::Validation("阶段超时不能为 0".to_string()));
        }
        if self.connect_timeout == 0 {
            return Err(ImageError::Validation("connect_timeout 不能为 0".to_string()));
        }
        if self.max_radius == 0 {
            return Err(ImageError::Validation("max_radius 不能为 0".to_string()));
        }
        if !(1..=self.max_radius).contains(&self.default_radius) {
            return Err(ImageError::Validation(format!(
                "default_radius 必须在 1~{} 之间",
                self.max_radius
            )));
        }
        if self.max_file_size == 0 || self.max_decoded_pixels == 0 || self.max_decoded_bytes == 0 {
            return Err(ImageError::Validation("资源上限不能为 0".to_string()));
        }

        Ok(())
    }
}
