//! # 圆形像素化图片服务 — 进程入口
//!
//! 本文件仅负责日志初始化、配置构建与服务启动。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use circle_pixelate::config::AppConfig;
use circle_pixelate::server;

#[actix_web::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::default();
    log::info!(
        "setup: source={} fetch_timeout_ms={:?} transform_timeout_ms={:?}",
        config.image.source_url,
        config.image.fetch_timeout_ms,
        config.image.transform_timeout_ms
    );

    if let Err(err) = server::run(config).await {
        log::error!("服务启动失败: {err}");
        std::process::exit(1);
    }
}
