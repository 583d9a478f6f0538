//! 单个字节区间 `[start, end)` 及其 `Range` 请求头。

use core::fmt;

use reqwest::header::{HeaderValue, InvalidHeaderValue};

/// 生成单段 Range 请求头：end 为不含上界，头部里写入的是闭区间 `bytes=start-(end-1)`。
pub(crate) fn range_header(start: u64, end: u64) -> String {
    format!("bytes={}-{}", start, end.saturating_sub(1))
}

/// 一个连续的字节区间，下载时的最小调度单位。
///
/// - `lower()` 为首字节偏移
/// - `upper()` 为末字节偏移（闭区间），空区间返回 `None`
/// - 创建时即生成 `Range` 请求头，重试时直接复用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    start: u64,
    end: u64,
    header: String,
}

impl ByteRange {
    /// `end` 小于 `start` 时按空区间处理。
    pub fn new(start: u64, end: u64) -> Self {
        let end = end.max(start);
        Self {
            start,
            end,
            header: range_header(start, end),
        }
    }

    pub fn lower(&self) -> u64 {
        self.start
    }

    pub fn upper(&self) -> Option<u64> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }

    /// 不含上界的结束偏移。
    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 形如 `bytes=0-9` 的请求头文本。
    pub fn range_header(&self) -> &str {
        &self.header
    }

    pub fn header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.header)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)
    }
}
