//! # 源图片下载
//!
//! 每个请求只向固定的 `source_url` 发起一次 GET，失败即返回，不重试。
//!
//! 拒绝顺序：状态码 → `Content-Length` → 流式累计体积 → 文件签名。
//! 图床常把图片标成 `application/octet-stream`，所以 `Content-Type` 只写日志，
//! 是否为图片以 `infer` 识别的签名为准。
//! 整体耗时上限由外层超时守卫负责，这里只设连接超时。

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use super::source::RawImageData;
use super::{ImageConfig, ImageError, ImageHandler};

/// 签名识别所看的前缀长度。
const SIGNATURE_WINDOW: usize = 4096;

impl ImageHandler {
    pub(super) fn build_http_client(config: &ImageConfig) -> Result<reqwest::Client, ImageError> {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ImageError::Network(format!("HTTP 客户端初始化失败：{}", e)))
    }

    /// 下载源图片的原始字节。
    ///
    /// 一旦凑够 `SIGNATURE_WINDOW` 字节就识别签名，非图片内容不会被完整下载。
    pub(super) async fn download_source(&self) -> Result<RawImageData, ImageError> {
        let cap = self.config.max_file_size;
        // 日志里只保留 host 与 path，query 可能带令牌
        let target = format!(
            "{}{}",
            self.source_url.host_str().unwrap_or("<unknown-host>"),
            self.source_url.path()
        );
        log::info!("🌐 下载源图片 - {}", target);

        let mut response = self
            .client
            .get(self.source_url.clone())
            .send()
            .await
            .map_err(|e| ImageError::Network(format!("请求 {} 失败：{}", target, e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Network(format!(
                "上游 {} 返回 HTTP {}",
                target,
                status.as_u16()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("<none>");
        if !content_type.to_ascii_lowercase().starts_with("image/") {
            log::warn!("⚠️ 上游 Content-Type 为 {}，以文件签名为准", content_type);
        }

        if let Some(declared) = response.content_length().filter(|len| *len > cap) {
            return Err(ImageError::ResourceLimit(format!(
                "Content-Length {} 超过上限 {}",
                declared, cap
            )));
        }

        let mut bytes = Vec::with_capacity(response.content_length().unwrap_or(0).min(cap) as usize);
        let mut signature_checked = false;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ImageError::Network(format!("读取响应体失败：{}", e.without_url())))?
        {
            if (bytes.len() + chunk.len()) as u64 > cap {
                return Err(ImageError::ResourceLimit(format!("响应体超过上限 {}", cap)));
            }
            bytes.extend_from_slice(&chunk);

            if !signature_checked && bytes.len() >= SIGNATURE_WINDOW {
                check_signature(&bytes)?;
                signature_checked = true;
            }
        }

        if !signature_checked {
            check_signature(&bytes)?;
        }

        log::debug!("✅ 下载完成 - {} bytes", bytes.len());
        Ok(RawImageData {
            bytes,
            source_hint: "url",
        })
    }
}

/// 按文件头判断内容是否为图片，只看前 `SIGNATURE_WINDOW` 字节。
fn check_signature(bytes: &[u8]) -> Result<(), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::InvalidFormat("上游返回空内容".to_string()));
    }

    let head = &bytes[..bytes.len().min(SIGNATURE_WINDOW)];
    match infer::get(head) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(()),
        Some(kind) => Err(ImageError::InvalidFormat(format!(
            "内容不是图片：{}",
            kind.mime_type()
        ))),
        None => Err(ImageError::InvalidFormat("无法识别内容类型".to_string())),
    }
}
