//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! 使用 `ImageServiceState` 作为 HTTP 层的注入状态，替代全局单例函数：
//! 1. 生命周期清晰（由 `main.rs` 统一构建）
//! 2. 测试可创建独立实例，指向本地桩服务
//! 3. 不持有任何跨请求的可变状态，并发请求之间互不协调
//!
//! ## 实现思路
//!
//! 对外仅暴露一个入口 `render`：在请求边界校验 `size`，校验失败时不做任何下载或计算。

use super::params::parse_radius;
use super::source::EncodedImage;
use super::{ImageConfig, ImageError, ImageHandler};

/// 图片处理服务状态。
pub struct ImageServiceState {
    handler: ImageHandler,
}

impl ImageServiceState {
    /// 使用给定配置创建服务状态，配置不合法时拒绝。
    pub fn with_config(config: ImageConfig) -> Result<Self, ImageError> {
        Ok(Self {
            handler: ImageHandler::new(config)?,
        })
    }

    pub fn config(&self) -> &ImageConfig {
        self.handler.config()
    }

    /// 执行完整处理流程：校验 → 获取 → 像素化 → 编码。
    ///
    /// `size` 为原始查询参数（可能缺失或不是数字）。
    pub async fn render(&self, size: Option<&str>) -> Result<EncodedImage, ImageError> {
        let radius = parse_radius(size, self.config()).inspect_err(|err| {
            log::warn!("⚠️ size 参数校验失败：{:?} -> {}", size, err);
        })?;

        self.handler.process(radius).await
    }
}
