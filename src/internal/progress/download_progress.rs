/// 进度所处阶段
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProgressPhase {
    /// 尚未开始传输
    #[default]
    Idle,
    /// 已 kickoff，传输中
    Running,
    /// 已 finish（无论成功与否）
    Finished,
}

/// 下载进度快照：已写入字节数与总大小。
///
/// 进度比例可用 [`DownloadProgress::pct`] 获取。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadProgress {
    /// 已写入目标文件的字节数
    pub bytes_done: u64,
    /// 内容总大小（字节），HEAD 探测前为 `None`
    pub total: Option<u64>,
    pub phase: ProgressPhase,
}

impl DownloadProgress {
    /// 进度百分比（0～100）；总大小为 0 或未知时返回 `f64::NAN`。
    pub fn pct(&self) -> f64 {
        self.total
            .filter(|&t| t > 0)
            .map(|t| (self.bytes_done as f64 / t as f64) * 100.0)
            .unwrap_or(f64::NAN)
    }

    pub fn is_finished(&self) -> bool {
        self.phase == ProgressPhase::Finished
    }
}
