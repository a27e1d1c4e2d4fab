//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将流水线各阶段的产物拆成独立类型，所有权沿链路单向转移：
//! - `RawImageData` 表示已下载但未解码的字节
//! - `SourceImage` 表示解码后的只读 RGBA 像素
//! - `PixelBuffer` 表示像素化阶段正在绘制的画布
//! - `EncodedImage` 表示最终 PNG 字节

use base64::{Engine as _, engine::general_purpose};
use image::RgbaImage;

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 解码后的源图片，行优先 RGBA，长度恒为 `width * height * 4`。
///
/// 构造后只读，由获取阶段独占，再整体移交给变换阶段。
#[derive(Debug, Clone)]
pub struct SourceImage {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl SourceImage {
    /// 长度与尺寸不匹配时返回 `None`。
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (bytes.len() == expected).then_some(Self { width, height, bytes })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<RgbaImage> for SourceImage {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            bytes: image.into_raw(),
        }
    }
}

/// 像素化阶段的输出画布，尺寸与源图片一致。
pub type PixelBuffer = RgbaImage;

/// 编码完成的 PNG 图片。
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl EncodedImage {
    /// 纯 Base64 字符串，不含 `data:image/png;base64,` 前缀。
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_checks_length() {
        assert!(SourceImage::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(SourceImage::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(SourceImage::from_rgba(0, 0, Vec::new()).is_some());
    }

    #[test]
    fn base64_has_no_data_uri_prefix() {
        let encoded = EncodedImage {
            width: 1,
            height: 1,
            png: vec![137, 80, 78, 71],
        };

        let text = encoded.to_base64();
        assert!(!text.starts_with("data:"));
        assert_eq!(text, "iVBORw==");
    }
}
