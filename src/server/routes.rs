//! # HTTP 路由层
//!
//! ## 设计思路
//!
//! 路由层仅做参数提取与响应拼装，不承载业务逻辑。
//! 图片相关的实际处理交由 `ImageServiceState`，错误统一经 `AppError` 映射为状态码。

use std::collections::HashMap;

use actix_multipart::{Multipart, MultipartError};
use actix_web::error::PayloadError;
use actix_web::http::header::HeaderMap;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use futures_util::{TryStreamExt, stream};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::AppError;
use crate::image_handler::ImageServiceState;

/// 消息接口的固定回执文案。
pub const MSG_RECEIVED: &str = "我们已经收到您的请求";

#[derive(Debug, Serialize)]
struct PixelateResponse {
    /// PNG 的纯 Base64（无 data URI 前缀）。
    url: String,
}

/// `GET /?size=…`：下载远程图片并返回圆形像素化后的 PNG。
pub async fn pixelate_image(
    state: web::Data<ImageServiceState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let size = query.get("size").map(String::as_str);
    let encoded = state.render(size).await?;

    Ok(HttpResponse::Ok().json(PixelateResponse {
        url: encoded.to_base64(),
    }))
}

/// `POST /api/messages`：回显表单字段，总是返回 200。
pub async fn receive_message(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let data = match req.content_type() {
        "multipart/form-data" => match read_multipart_fields(req.headers(), body).await {
            Ok(fields) => Value::Object(fields),
            Err(err) => {
                log::warn!("⚠️ multipart 解析失败：{}", err);
                Value::Object(Map::new())
            }
        },
        other => parse_message_body(other, &body),
    };
    log::info!("📨 收到消息：{}", data);

    HttpResponse::Ok().json(json!({
        "message": "success",
        "msg": MSG_RECEIVED,
        "data": data,
    }))
}

/// 读取 multipart 中的文本字段；带文件名的文件字段被丢弃。
async fn read_multipart_fields(
    headers: &HeaderMap,
    body: web::Bytes,
) -> Result<Map<String, Value>, MultipartError> {
    let mut multipart = Multipart::new(headers, stream::iter([Ok::<_, PayloadError>(body)]));
    let mut fields = Map::new();

    while let Some(mut field) = multipart.try_next().await? {
        let name = field.name().map(str::to_owned);
        let is_file = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .is_some();

        let mut value = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            value.extend_from_slice(&chunk);
        }

        match name {
            Some(name) if !is_file => {
                fields.insert(name, Value::String(String::from_utf8_lossy(&value).into_owned()));
            }
            Some(name) => log::warn!("⚠️ 忽略文件字段：{}", name),
            None => {}
        }
    }

    Ok(fields)
}

/// 解析消息体：表单与 JSON 对象原样回显，其余一律视为空对象。
fn parse_message_body(content_type: &str, body: &[u8]) -> Value {
    let empty = || Value::Object(Map::new());

    match content_type {
        "application/x-www-form-urlencoded" => {
            let Ok(text) = std::str::from_utf8(body) else {
                return empty();
            };
            match web::Query::<Vec<(String, String)>>::from_query(text) {
                Ok(pairs) => Value::Object(
                    pairs
                        .into_inner()
                        .into_iter()
                        .map(|(key, value)| (key, Value::String(value)))
                        .collect(),
                ),
                Err(err) => {
                    log::warn!("⚠️ 表单解析失败：{}", err);
                    empty()
                }
            }
        }
        "application/json" => match serde_json::from_slice::<Value>(body) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => value,
            Ok(_) => empty(),
            Err(err) => {
                log::warn!("⚠️ JSON 解析失败：{}", err);
                empty()
            }
        },
        _ => empty(),
    }
}
