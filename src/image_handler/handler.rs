//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageHandler` 只负责流程编排，不直接与 HTTP 框架绑定。
//! 单次请求的状态流转固定为：
//!
//! ```text
//! Idle → Fetching → Fetched | FetchFailed | FetchTimedOut
//!      → Transforming → Transformed | TransformFailed | TransformTimedOut
//! ```
//!
//! 两个阶段严格串行，任一阶段失败即终止，不重试，也不会返回半成品。
//!
//! ## 实现思路
//!
//! - 配置在构造时校验一次，之后只读。
//! - HTTP 客户端构造一次并复用。
//! - 获取阶段与变换阶段各自由一个超时守卫约束。
//! - 记录 `fetch/transform/total` 阶段耗时，便于性能诊断。

use std::time::Instant;

use super::error::Stage;
use super::pixelator::pixelate_with_cancel;
use super::source::{EncodedImage, SourceImage};
use super::timeout::{race_blocking_with_timeout, race_with_timeout};
use super::{ImageConfig, ImageError};

/// 图片处理器。
///
/// 封装了配置、已解析的源地址与 HTTP 客户端，并编排各子模块实现完整流程。
pub struct ImageHandler {
    pub(super) config: ImageConfig,
    pub(super) source_url: reqwest::Url,
    pub(super) client: reqwest::Client,
}

impl ImageHandler {
    /// 根据配置创建处理器，配置不合法时直接拒绝。
    pub fn new(config: ImageConfig) -> Result<Self, ImageError> {
        config.validate()?;
        let source_url = config.parsed_source_url()?;
        let client = Self::build_http_client(&config)?;
        Ok(Self {
            config,
            source_url,
            client,
        })
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// 获取阶段：下载并解码远程源图片。
    pub async fn fetch(&self) -> Result<SourceImage, ImageError> {
        let config = &self.config;

        race_with_timeout(
            async {
                let raw = self.download_source().await?;
                let decode_config = config.clone();
                let source =
                    tokio::task::spawn_blocking(move || Self::decode_source(raw, &decode_config))
                        .await
                        .map_err(|e| ImageError::Decode(format!("解码任务异常结束：{}", e)))??;
                Ok::<_, ImageError>(source)
            },
            config.fetch_timeout(),
            Stage::Fetch,
        )
        .await
    }

    /// 变换阶段：圆形像素化并编码为 PNG。
    ///
    /// 除超时与参数错误外，内部失败统一包装为 `Processing`。
    pub async fn transform(
        &self,
        source: SourceImage,
        radius: u32,
    ) -> Result<EncodedImage, ImageError> {
        if radius == 0 {
            return Err(ImageError::InvalidRadius(radius.to_string()));
        }
        if radius > self.config.max_radius {
            return Err(ImageError::RadiusTooLarge {
                max: self.config.max_radius,
            });
        }

        let result = race_blocking_with_timeout(
            move |flag| {
                let canvas = pixelate_with_cancel(&source, radius, || flag.is_cancelled())?;
                Self::encode_png(canvas)
            },
            self.config.transform_timeout(),
            Stage::Transform,
        )
        .await;

        result.map_err(|err| match err {
            ImageError::Timeout { .. } | ImageError::Processing(_) => err,
            other => ImageError::Processing(other.to_string()),
        })
    }

    /// 处理主入口：获取 → 变换。
    pub async fn process(&self, radius: u32) -> Result<EncodedImage, ImageError> {
        let total_start = Instant::now();

        let fetch_start = Instant::now();
        let source = self.fetch().await?;
        let fetch_elapsed = fetch_start.elapsed();

        let transform_start = Instant::now();
        let encoded = self.transform(source, radius).await?;
        let transform_elapsed = transform_start.elapsed();

        log::info!(
            "✅ 图片处理完成 - r={} size={}x{} png={}KB fetch={}ms transform={}ms total={}ms",
            radius,
            encoded.width,
            encoded.height,
            encoded.png.len() / 1024,
            fetch_elapsed.as_millis(),
            transform_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_silent_server, spawn_stub_server, tiny_png};
    use image::{Rgba, RgbaImage};
    use std::time::Duration;

    fn handler_with(url: &str, adjust: impl FnOnce(&mut ImageConfig)) -> ImageHandler {
        let mut config = ImageConfig::default();
        config.source_url = url.to_string();
        adjust(&mut config);
        ImageHandler::new(config).expect("handler init failed")
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut config = ImageConfig::default();
        config.max_radius = 0;

        assert!(matches!(ImageHandler::new(config), Err(ImageError::Validation(_))));
    }

    #[tokio::test]
    async fn fetch_decodes_remote_png() {
        let url = spawn_stub_server("200 OK", "image/png", tiny_png(12, 8));
        let handler = handler_with(&url, |_| {});

        let source = handler.fetch().await.expect("fetch should succeed");

        assert_eq!((source.width(), source.height()), (12, 8));
    }

    #[tokio::test]
    async fn fetch_times_out_against_silent_upstream() {
        let url = spawn_silent_server();
        let handler = handler_with(&url, |config| config.fetch_timeout_ms = Some(50));

        let start = Instant::now();
        let result = handler.fetch().await;

        assert!(matches!(
            result,
            Err(ImageError::Timeout {
                stage: Stage::Fetch,
                timeout_ms: 50
            })
        ));
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn fetch_reports_network_failure() {
        let url = spawn_stub_server("404 Not Found", "text/plain", b"nope".to_vec());
        let handler = handler_with(&url, |_| {});

        let result = handler.fetch().await;

        assert!(result.as_ref().err().is_some_and(ImageError::is_fetch_failure));
    }

    #[tokio::test]
    async fn transform_returns_png_of_source_size() {
        let handler = handler_with("http://127.0.0.1:9/unused.png", |_| {});
        let source = SourceImage::from(RgbaImage::from_pixel(30, 20, Rgba([1, 2, 3, 255])));

        let encoded = handler.transform(source, 5).await.expect("transform should succeed");
        let decoded = image::load_from_memory(&encoded.png).expect("png").to_rgba8();

        assert_eq!(decoded.dimensions(), (30, 20));
        assert_eq!(*decoded.get_pixel(5, 5), Rgba([1, 2, 3, 255]));
    }

    #[tokio::test]
    async fn transform_rejects_out_of_range_radius() {
        let handler = handler_with("http://127.0.0.1:9/unused.png", |_| {});
        let source = SourceImage::from(RgbaImage::new(4, 4));

        assert!(matches!(
            handler.transform(source.clone(), 0).await,
            Err(ImageError::InvalidRadius(_))
        ));
        assert!(matches!(
            handler.transform(source, 101).await,
            Err(ImageError::RadiusTooLarge { max: 100 })
        ));
    }

    #[tokio::test]
    async fn transform_times_out_on_large_work() {
        let handler = handler_with("http://127.0.0.1:9/unused.png", |config| {
            config.transform_timeout_ms = Some(1);
        });
        let source = SourceImage::from(RgbaImage::from_pixel(3000, 3000, Rgba([5, 5, 5, 255])));

        let start = Instant::now();
        let result = handler.transform(source, 1).await;

        assert!(matches!(
            result,
            Err(ImageError::Timeout {
                stage: Stage::Transform,
                ..
            })
        ));
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn process_runs_both_stages() {
        let url = spawn_stub_server("200 OK", "image/png", tiny_png(40, 40));
        let handler = handler_with(&url, |_| {});

        let encoded = handler.process(10).await.expect("process should succeed");

        assert_eq!((encoded.width, encoded.height), (40, 40));
        assert!(!encoded.to_base64().is_empty());
    }
}
