//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义请求边界的统一 `AppError`，所有 HTTP handler 统一返回 `Result<T, AppError>`。
//! 错误在这里被映射为粗粒度的状态码与固定短文案；内部细节只写入日志，不回传给调用方。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息（仅用于日志）。
//! - 为 `ImageError` 提供 `From` 转换，无需手动 map。
//! - 实现 `actix_web::ResponseError`，决定状态码与纯文本响应体。

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};

use crate::image_handler::ImageError;

/// 半径超过上限时返回给调用方的文案。
pub const MSG_TOO_LARGE: &str = "参数过大";
/// 负数等非法取值时返回给调用方的文案。
pub const MSG_INVALID: &str = "参数无效";
/// 非参数错误统一返回给调用方的文案。
pub const MSG_INTERNAL: &str = "服务器内部错误";

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片处理流水线错误（校验 / 下载 / 像素化 / 编码）
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 文件系统 / 网络监听 I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// 返回给调用方的固定短文案。
    fn public_message(&self) -> &'static str {
        match self {
            Self::Image(ImageError::RadiusTooLarge { .. }) => MSG_TOO_LARGE,
            Self::Image(err) if err.is_bad_request() => MSG_INVALID,
            _ => MSG_INTERNAL,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Image(err) if err.is_bad_request() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Image(err) => log::error!(
                "❌ 请求失败 - code={} stage={} detail={}",
                err.code(),
                err.stage().as_str(),
                err
            ),
            Self::Io(err) => log::error!("❌ 请求失败 - {}", err),
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_handler::Stage;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let too_large = AppError::from(ImageError::RadiusTooLarge { max: 100 });
        let invalid = AppError::from(ImageError::InvalidRadius("-5".into()));
        let config = AppError::from(ImageError::Validation("max_radius 不能为 0".into()));

        assert_eq!(too_large.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(too_large.public_message(), MSG_TOO_LARGE);
        assert_eq!(invalid.public_message(), MSG_INVALID);
        assert_eq!(config.public_message(), MSG_INVALID);
    }

    #[test]
    fn pipeline_errors_map_to_opaque_internal_error() {
        let cases = [
            ImageError::Network("dns failure for secret-host".into()),
            ImageError::Decode("bad png".into()),
            ImageError::Timeout {
                stage: Stage::Fetch,
                timeout_ms: 50,
            },
            ImageError::Processing("encoder exploded".into()),
        ];

        for err in cases {
            let app = AppError::from(err);
            assert_eq!(app.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(app.public_message(), MSG_INTERNAL);
        }
    }
}
