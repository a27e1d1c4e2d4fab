//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图片链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 这里的文案只用于日志诊断，请求边界（`AppError`）不会把它们透传给调用方。

/// 超时发生的阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// 请求参数校验。
    Request,
    /// 下载并解码源图片。
    Fetch,
    /// 圆形像素化并编码。
    Transform,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Fetch => "fetch",
            Self::Transform => "transform",
        }
    }
}

/// 图片处理统一错误类型。
///
/// 该类型会在请求边界被上转为 `AppError`，再映射为 HTTP 状态码。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// 配置或输入不合法。
    #[error("参数错误：{0}")]
    Validation(String),

    /// 半径为负数或截断后为 0。
    #[error("半径无效：{0}")]
    InvalidRadius(String),

    #[error("半径过大：超过上限 {max}")]
    RadiusTooLarge { max: u32 },

    #[error("网络错误：{0}")]
    Network(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("超时错误：{}阶段超过 {timeout_ms}ms", stage.as_str())]
    Timeout { stage: Stage, timeout_ms: u64 },

    #[error("处理错误：{0}")]
    Processing(String),

    #[error("已取消：{0}")]
    Cancelled(String),
}

impl ImageError {
    /// 稳定的错误码，便于日志检索。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidRadius(_) => "invalid_radius",
            Self::RadiusTooLarge { .. } => "radius_too_large",
            Self::Network(_) => "network",
            Self::Decode(_) => "decode",
            Self::InvalidFormat(_) => "invalid_format",
            Self::ResourceLimit(_) => "resource_limit",
            Self::Timeout { .. } => "timeout",
            Self::Processing(_) => "processing",
            Self::Cancelled(_) => "cancelled",
        }
    }

    /// 错误归属阶段。
    pub fn stage(&self) -> Stage {
        match self {
            Self::Validation(_) | Self::InvalidRadius(_) | Self::RadiusTooLarge { .. } => {
                Stage::Request
            }
            Self::Network(_) | Self::Decode(_) | Self::InvalidFormat(_) | Self::ResourceLimit(_) => {
                Stage::Fetch
            }
            Self::Timeout { stage, .. } => *stage,
            Self::Processing(_) | Self::Cancelled(_) => Stage::Transform,
        }
    }

    /// 是否属于调用方输入错误（映射为 400）。
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidRadius(_) | Self::RadiusTooLarge { .. }
        )
    }

    /// 是否属于"获取源图片失败"（网络不可达或无法解码）。
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Decode(_) | Self::InvalidFormat(_) | Self::ResourceLimit(_)
        )
    }
}
