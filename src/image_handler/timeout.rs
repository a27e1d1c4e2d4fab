//! # 超时守卫模块
//!
//! ## 设计思路
//!
//! 操作与计时器赛跑，先结束的一方决定结果。与"只忽略失败方"的做法不同，
//! 这里的失败方会被真正取消：
//!
//! - 异步操作（下载）：`tokio::time::timeout` 到期后直接 drop 掉 future，
//!   reqwest 的连接随之关闭。
//! - 阻塞操作（像素化）：放到 `spawn_blocking` 中执行，并共享一个 `CancelFlag`；
//!   超时（或调用方自身被 drop）时置位，工作循环在下一个检查点退出。
//!
//! 对调用方而言，等待时间永远不会超过设定上限。

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::ImageError;
use super::error::Stage;

/// 跨线程共享的取消标志。
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 离开作用域时置位取消标志。
struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// 让 `operation` 与计时器赛跑。
///
/// - `limit` 为 `None` 时不设上限，直接等待操作结果。
/// - 到期时返回 `ImageError::Timeout`，未完成的 `operation` 被 drop。
pub async fn race_with_timeout<F, T>(
    operation: F,
    limit: Option<Duration>,
    stage: Stage,
) -> Result<T, ImageError>
where
    F: Future<Output = Result<T, ImageError>>,
{
    let Some(limit) = limit else {
        return operation.await;
    };

    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
            log::warn!("⏱️ {} 阶段超时（{}ms），已放弃并取消未完成的操作", stage.as_str(), timeout_ms);
            Err(ImageError::Timeout { stage, timeout_ms })
        }
    }
}

/// 在阻塞线程池中执行 `work`，并受同样的超时约束。
///
/// `work` 应定期检查传入的 `CancelFlag`，一旦置位就尽快返回。
pub async fn race_blocking_with_timeout<F, T>(
    work: F,
    limit: Option<Duration>,
    stage: Stage,
) -> Result<T, ImageError>
where
    F: FnOnce(&CancelFlag) -> Result<T, ImageError> + Send + 'static,
    T: Send + 'static,
{
    let flag = CancelFlag::new();
    let _guard = CancelOnDrop(flag.clone());

    let worker_flag = flag.clone();
    let handle = tokio::task::spawn_blocking(move || work(&worker_flag));

    let joined = async move {
        let output = handle
            .await
            .map_err(|e| ImageError::Processing(format!("后台任务异常结束：{}", e)))??;
        Ok::<T, ImageError>(output)
    };

    race_with_timeout(joined, limit, stage).await
}
