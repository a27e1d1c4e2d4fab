//! 测试辅助：本地桩 HTTP 服务与测试图片。
//!
//! 单元测试经 `crate::test_support` 使用；`tests/` 下的集成测试用 `#[path]` 引入同一文件。

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use std::io::{Cursor, Read, Write};
use std::net::TcpListener;
use std::thread;

pub(crate) fn tiny_png(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        let r = (x % 255) as u8;
        let g = (y % 255) as u8;
        let b = ((x + y) % 255) as u8;
        Rgba([r, g, b, 255])
    });

    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}

/// 对每个连接都返回同一个响应，返回可访问的 URL。
pub(crate) fn spawn_stub_server(status: &str, content_type: &str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
    let addr = listener.local_addr().expect("read local addr failed");
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut req_buf = [0u8; 2048];
            let _ = stream.read(&mut req_buf);
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
            let _ = stream.flush();
        }
    });

    format!("http://{}/image.png", addr)
}

/// 接受连接后既不响应也不关闭，模拟永远不返回的上游。
///
/// 连接一直保存在线程里，直到测试进程退出。
pub(crate) fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
    let addr = listener.local_addr().expect("read local addr failed");

    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });

    format!("http://{}/image.png", addr)
}
