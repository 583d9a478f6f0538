//! 下载进度：上报接口、基于 watch 通道的进度追踪器，以及终端进度条实现。

pub mod download_progress;
pub mod progress_bar_reporter;
pub mod progress_reporter;
pub mod progress_tracker;

pub use download_progress::{DownloadProgress, ProgressPhase};
pub use progress_bar_reporter::ProgressBarReporter;
pub use progress_reporter::ProgressReporter;
pub use progress_tracker::{ProgressTracker, ProgressWatchError, ProgressWatcher};
