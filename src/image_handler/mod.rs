//! # 图片处理模块（image_handler）
//!
//! ## 设计思路
//!
//! 该模块将"参数校验 → 下载 → 解码 → 圆形像素化 → 编码"
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：承载可注入状态（`ImageServiceState`），请求边界校验
//! - `handler`：编排两个阶段 + 阶段耗时日志
//! - `loader`：负责从固定远程源下载并校验
//! - `pipeline`：负责解码（含像素限制）与 PNG 编码
//! - `pixelator` / `sampler`：圆形像素化与单点取色
//! - `timeout`：阶段超时守卫与取消标志
//! - `config/error/params/source`：配置、错误、参数解析、中间数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! GET /?size=…
//!    ↓
//! server/routes.rs（参数提取 + 响应映射）
//!    ↓
//! service.rs（parse_radius，失败直接 400）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ fetch：race_with_timeout(loader.rs + pipeline.rs 解码)
//!    └─ transform：race_blocking_with_timeout(pixelator.rs + pipeline.rs 编码)
//!    ↓
//! 返回 EncodedImage / ImageError
//! ```

mod config;
mod error;
mod handler;
mod loader;
mod params;
mod pipeline;
mod pixelator;
mod sampler;
mod service;
mod source;
mod timeout;

pub use config::{DEFAULT_SOURCE_URL, ImageConfig};
pub use error::{ImageError, Stage};
pub use params::parse_radius;
pub use pixelator::{cell_count, cell_grid, pixelate, pixelate_with_cancel};
pub use sampler::sample_rgb;
pub use service::ImageServiceState;
pub use source::{EncodedImage, PixelBuffer, SourceImage};
pub use timeout::{CancelFlag, race_blocking_with_timeout, race_with_timeout};

/// 内部核心编排器，对外通过 `ImageServiceState` 访问。
pub use handler::ImageHandler;
