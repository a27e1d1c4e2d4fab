//! # 请求参数校验
//!
//! `size` 查询参数只在请求边界解析一次，得到明确的 `Ok(radius)` 或半径错误，
//! 后续阶段只接触已校验的 `u32` 半径。
//!
//! 规则：
//! - 缺失、空串、非数字、`0` → 默认半径
//! - 负数 → 参数无效
//! - 大于上限（含 `inf`）→ 参数过大
//! - 小数向零截断；截断后为 0（如 `0.5`）→ 参数无效

use super::{ImageConfig, ImageError};

/// 解析并校验像素化半径。
pub fn parse_radius(raw: Option<&str>, config: &ImageConfig) -> Result<u32, ImageError> {
    let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(config.default_radius);
    };

    let value = match text.parse::<f64>() {
        Ok(value) if !value.is_nan() => value,
        _ => {
            log::debug!("size 参数不是数字，使用默认半径 {}：{:?}", config.default_radius, text);
            return Ok(config.default_radius);
        }
    };

    if value == 0.0 {
        return Ok(config.default_radius);
    }
    if value < 0.0 {
        return Err(ImageError::InvalidRadius(text.to_string()));
    }
    if value > f64::from(config.max_radius) {
        return Err(ImageError::RadiusTooLarge {
            max: config.max_radius,
        });
    }

    let radius = value.trunc() as u32;
    if radius == 0 {
        return Err(ImageError::InvalidRadius(text.to_string()));
    }

    Ok(radius)
}
