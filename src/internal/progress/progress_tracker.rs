//! # ProgressTracker
//!
//! 原子计数 + watch 通道的进度追踪器，既可作为 [`ProgressReporter`] 交给下载客户端，
//! 也可通过 [`ProgressTracker::watch`] 异步监听进度变化。

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::watch;
use tokio::sync::watch::error::RecvError;

use super::download_progress::{DownloadProgress, ProgressPhase};
use super::progress_reporter::ProgressReporter;

#[derive(Debug, Error)]
pub enum ProgressWatchError {
    /// 追踪器已被销毁
    #[error("progress tracker dropped")]
    Closed(#[from] RecvError),
}

/// 进度追踪器。
///
/// 计数器在回退时饱和到 0，不会出现负数。
#[derive(Debug)]
pub struct ProgressTracker {
    bytes_done: AtomicU64,
    sender: watch::Sender<DownloadProgress>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(DownloadProgress::default());
        Self {
            bytes_done: AtomicU64::new(0),
            sender,
        }
    }

    /// 当前已计入的字节数。
    pub fn bytes_done(&self) -> u64 {
        self.bytes_done.load(Ordering::Acquire)
    }

    /// 当前进度快照（会 clone）。
    pub fn snapshot(&self) -> DownloadProgress {
        self.sender.borrow().clone()
    }

    /// 创建一个监听器，用于异步监听进度变化。
    pub fn watch(&self) -> ProgressWatcher {
        ProgressWatcher {
            receiver: self.sender.subscribe(),
        }
    }

    fn publish(&self) {
        // 在 watch 写锁内读取计数，保证发布顺序与计数顺序一致
        self.sender.send_modify(|progress| {
            progress.bytes_done = self.bytes_done.load(Ordering::Acquire);
        });
    }
}

impl ProgressReporter for ProgressTracker {
    fn set_total(&self, total: u64) {
        self.sender.send_modify(|progress| progress.total = Some(total));
    }

    fn kickoff(&self) {
        self.sender
            .send_modify(|progress| progress.phase = ProgressPhase::Running);
    }

    fn add(&self, delta: i64) {
        let magnitude = delta.unsigned_abs();
        if delta >= 0 {
            self.bytes_done.fetch_add(magnitude, Ordering::AcqRel);
        } else {
            let _ = self.bytes_done.fetch_update(
                Ordering::AcqRel,
                Ordering::Acquire,
                |current| Some(current.saturating_sub(magnitude)),
            );
        }
        self.publish();
    }

    fn finish(&self) {
        self.sender.send_modify(|progress| {
            progress.bytes_done = self.bytes_done.load(Ordering::Acquire);
            progress.phase = ProgressPhase::Finished;
        });
    }
}

/// 进度监听器。
pub struct ProgressWatcher {
    receiver: watch::Receiver<DownloadProgress>,
}

impl ProgressWatcher {
    /// 异步等待进度变化，返回新的快照。
    pub async fn changed(
        &mut self,
    ) -> Result<DownloadProgress, ProgressWatchError> {
        self.receiver.changed().await?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    /// 同步获取当前快照。
    pub fn borrow(&self) -> DownloadProgress {
        self.receiver.borrow().clone()
    }
}
