//! # HTTP 服务层
//!
//! 基于 actix-web。`configure` 注册全部路由，`run` 负责绑定与启动；
//! 集成测试直接复用 `configure`，保证测试与线上路由一致。

pub mod routes;

use actix_web::{App, HttpServer, middleware, web};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::image_handler::ImageServiceState;

/// 注册全部路由。
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(routes::pixelate_image))
        .route("/api/messages", web::post().to(routes::receive_message));
}

/// 构建服务状态并启动 HTTP 服务，直到进程退出。
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let state = web::Data::new(ImageServiceState::with_config(config.image)?);
    let (host, port) = config.server.bind_addr();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((host, port))?;

    log::info!("🚀 服务已启动：http://localhost:{}（监听 {}:{}）", port, host, port);

    server.run().await?;
    Ok(())
}
