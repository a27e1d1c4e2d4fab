//! # 圆形像素化图片服务 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  server (actix-web)                                      │
//! │    GET /?size=…        → image_handler::ImageServiceState │
//! │    POST /api/messages  → 表单回显                         │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<T, AppError>（状态码 + 固定短文案）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  ┌─ error ────── AppError (请求边界统一错误)               │
//! │  ├─ config ───── AppConfig (启动时构建一次)               │
//! │  └─ image_handler                                        │
//! │      ├─ fetch      下载 + 解码（超时即 drop）              │
//! │      └─ transform  圆形像素化 + PNG 编码（超时即取消）      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，映射 HTTP 状态码 |
//! | [`config`] | 监听地址与图片处理配置 |
//! | [`image_handler`] | 远程图片获取、圆形像素化、超时守卫 |
//! | [`server`] | 路由注册与服务启动 |

pub mod config;
pub mod error;
pub mod image_handler;
pub mod server;

#[cfg(test)]
mod test_support;
