//! 基于 indicatif 的终端进度条。

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::progress_reporter::ProgressReporter;

const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK_INTERVAL: Duration = Duration::from_millis(120);

/// 把下载进度渲染成终端进度条。
///
/// 位置不会低于 0。
pub struct ProgressBarReporter {
    bar: ProgressBar,
    /// 串行化读改写，回退时不会与其他分段的增量交错
    position: Mutex<()>,
}

impl ProgressBarReporter {
    pub fn new(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target);
        let bar = match ProgressStyle::with_template(PROGRESS_TEMPLATE) {
            Ok(style) => bar.with_style(style.progress_chars("#>-")),
            Err(_) => bar,
        };
        Self {
            bar,
            position: Mutex::new(()),
        }
    }

    /// 输出到 stderr
    pub fn stderr() -> Self {
        Self::new(ProgressDrawTarget::stderr())
    }

    /// 不渲染，只计数
    pub fn hidden() -> Self {
        Self::new(ProgressDrawTarget::hidden())
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }
}

impl ProgressReporter for ProgressBarReporter {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
    }

    fn kickoff(&self) {
        self.bar.reset_elapsed();
        self.bar.enable_steady_tick(TICK_INTERVAL);
    }

    fn add(&self, delta: i64) {
        let _guard = self.position.lock().unwrap_or_else(PoisonError::into_inner);
        let magnitude = delta.unsigned_abs();
        if delta >= 0 {
            self.bar.inc(magnitude);
        } else {
            // indicatif 的 dec 在下溢时会回绕
            self.bar
                .set_position(self.bar.position().saturating_sub(magnitude));
        }
    }

    fn finish(&self) {
        self.bar.finish();
    }
}
