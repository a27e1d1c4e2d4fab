//! 单点取色。

use super::source::SourceImage;

/// 读取 `(x, y)` 处像素的 RGB，忽略 alpha。
///
/// 前置条件：`x < width` 且 `y < height`。越界属于调用方缺陷，这里不做防御处理。
pub fn sample_rgb(source: &SourceImage, x: u32, y: u32) -> [u8; 3] {
    let idx = (y as usize * source.width() as usize + x as usize) * 4;
    let data = source.as_bytes();
    [data[idx], data[idx + 1], data[idx + 2]]
}
