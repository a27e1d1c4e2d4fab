//! # 圆形像素化模块
//!
//! ## 设计思路
//!
//! 把源图片按 `2r × 2r` 的方格切分，每个方格用一个实心圆替代：
//! 圆心位于方格中心，半径为 `r`，颜色取自方格左上角（方格原点）那一个像素。
//!
//! ## 实现思路
//!
//! 1. 创建与源图片同尺寸、完全透明的画布
//! 2. 按行优先、从上到下、从左到右遍历方格原点
//! 3. 在**源图片**上取色（画布与源分离，不存在"先清空再取色"的问题）
//! 4. 按像素中心判定覆盖，把圆拆成逐行的水平线段，用 `imageproc` 填充，
//!    超出边界的部分由画布自然裁剪
//!
//! 像素 `(i, j)` 属于圆当且仅当 `(i + 0.5 - r)² + (j + 0.5 - r)² <= r²`，
//! 因此每个圆都严格落在自己的 `2r × 2r` 方格内，相邻圆互不重叠。
//!
//! 遍历顺序完全确定，因此同一输入与半径的输出逐字节可复现。
//! 每开始新的一行方格前检查一次取消标志，超时后能及时停下。

use image::Rgba;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use super::sampler::sample_rgb;
use super::source::{PixelBuffer, SourceImage};
use super::ImageError;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// 单个维度上的方格原点序列：`0, 2r, 4r, …`（不含 `extent`）。
fn cell_origins(extent: u32, radius: u32) -> impl Iterator<Item = u32> {
    let step = (u64::from(radius) * 2) as usize;
    (0..extent).step_by(step.max(1))
}

/// 圆在方格内前 `rows` 行各自覆盖的列区间 `(start, len)`，相对方格原点。
fn disk_spans(radius: u32, rows: u32) -> Vec<(u32, u32)> {
    let r = f64::from(radius);
    (0..rows.min(radius * 2))
        .map(|row| {
            let dy = f64::from(row) + 0.5 - r;
            let half = (r * r - dy * dy).sqrt();
            let start = (r - 0.5 - half).ceil().max(0.0) as u32;
            let end = (r - 0.5 + half).floor().min(r * 2.0 - 1.0) as u32;
            (start, end + 1 - start)
        })
        .collect()
}

/// 全部方格原点，行优先。
pub fn cell_grid(width: u32, height: u32, radius: u32) -> impl Iterator<Item = (u32, u32)> {
    cell_origins(height, radius).flat_map(move |y| cell_origins(width, radius).map(move |x| (x, y)))
}

/// 方格数量：`ceil(width / 2r) * ceil(height / 2r)`。
pub fn cell_count(width: u32, height: u32, radius: u32) -> u64 {
    let step = u64::from(radius) * 2;
    if step == 0 {
        return 0;
    }
    u64::from(width).div_ceil(step) * u64::from(height).div_ceil(step)
}

/// 对源图片做圆形像素化。
pub fn pixelate(source: &SourceImage, radius: u32) -> Result<PixelBuffer, ImageError> {
    pixelate_with_cancel(source, radius, || false)
}

/// 可取消版本：`is_cancelled` 在每一行方格开始前被调用一次。
pub fn pixelate_with_cancel<C>(
    source: &SourceImage,
    radius: u32,
    is_cancelled: C,
) -> Result<PixelBuffer, ImageError>
where
    C: Fn() -> bool,
{
    if radius == 0 {
        return Err(ImageError::Processing("像素化半径必须大于 0".to_string()));
    }

    let (width, height) = (source.width(), source.height());
    let limit = i32::MAX as u32 / 4;
    if width > limit || height > limit || radius > limit {
        return Err(ImageError::ResourceLimit(format!(
            "图片尺寸或半径超出绘制范围：{}x{} r={}",
            width, height, radius
        )));
    }

    let mut canvas = PixelBuffer::from_pixel(width, height, TRANSPARENT);
    let spans = disk_spans(radius, height);

    for y in cell_origins(height, radius) {
        if is_cancelled() {
            return Err(ImageError::Cancelled("像素化已取消".to_string()));
        }

        for x in cell_origins(width, radius) {
            let [red, green, blue] = sample_rgb(source, x, y);
            let color = Rgba([red, green, blue, 255]);

            for (row, &(start, len)) in (y..height).zip(spans.iter()) {
                let rect = Rect::at((x + start) as i32, row as i32).of_size(len, 1);
                draw_filled_rect_mut(&mut canvas, rect, color);
            }
        }
    }

    log::debug!(
        "🔵 像素化完成 - {}x{} r={} cells={}",
        width,
        height,
        radius,
        cell_count(width, height, radius)
    );

    Ok(canvas)
}
