//! # 解码与编码模块
//!
//! ## 设计思路
//!
//! 将"字节 → 图像 → RGBA"与"画布 → PNG"两个方向的转换集中管理，
//! 并在解码前后都做资源上限控制。优先做尺寸检查，再进行完整解码，
//! 降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 解码：
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素 / 内存上限快速拒绝
//! 3. 完整解码并再次校验
//! 4. 转换 RGBA → `SourceImage`
//!
//! 编码：`PixelBuffer` 以 PNG 写出到内存。

use image::{GenericImageView, ImageFormat};
use std::io::Cursor;

use super::source::{EncodedImage, PixelBuffer, RawImageData, SourceImage};
use super::{ImageConfig, ImageError, ImageHandler};

impl ImageHandler {
    /// 将原始字节解码为只读的 RGBA 源图片。
    pub(crate) fn decode_source(
        raw: RawImageData,
        config: &ImageConfig,
    ) -> Result<SourceImage, ImageError> {
        image::guess_format(&raw.bytes)
            .map_err(|e| ImageError::InvalidFormat(format!("不支持的图片格式：{}", e)))?;

        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;
        Self::validate_decoded_memory_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        Self::validate_pixel_limits(config, width, height)?;
        Self::validate_decoded_memory_limits(config, width, height)?;

        let source = SourceImage::from(decoded.to_rgba8());

        log::info!(
            "✅ 图片解码成功 - 来源: {} 尺寸: {}x{}",
            raw.source_hint,
            width,
            height
        );

        Ok(source)
    }

    /// 将像素化画布编码为 PNG。
    pub(crate) fn encode_png(canvas: PixelBuffer) -> Result<EncodedImage, ImageError> {
        let (width, height) = canvas.dimensions();
        let mut cursor = Cursor::new(Vec::new());
        canvas
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| ImageError::Processing(format!("PNG 编码失败：{}", e)))?;

        Ok(EncodedImage {
            width,
            height,
            png: cursor.into_inner(),
        })
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| ImageError::Decode(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(config: &ImageConfig, width: u32, height: u32) -> Result<(), ImageError> {
        let pixels = u64::from(width) * u64::from(height);

        if pixels > config.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        config: &ImageConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let estimated = (u64::from(width) * u64::from(height))
            .checked_mul(4)
            .ok_or_else(|| ImageError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}
