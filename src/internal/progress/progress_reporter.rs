//! 进度上报接口。

/// 下载过程中的进度回调，所有方法都可能被多个分片任务并发调用。
///
/// 调用顺序：`set_total` → `kickoff` → 若干次 `add` → `finish`。
/// `add` 的增量可以为负：分片重试时会把本次尝试已计入的字节撤回。
pub trait ProgressReporter: Send + Sync {
    fn set_total(&self, total: u64);

    fn kickoff(&self);

    fn add(&self, delta: i64);

    /// 无论下载成功还是失败都会被调用一次。
    fn finish(&self);
}
