//! 区间规划：按固定份数把 `[0, content_length)` 均分。

use thiserror::Error;

use super::byte_range::ByteRange;

/// 默认切分份数
pub const DEFAULT_HUNKS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangePlanError {
    #[error("hunk count must be greater than zero")]
    ZeroHunks,
}

/// 区间规划器。
///
/// 切分规则：
/// - 内容长度小于份数时只产生一个区间 `[0, len)`（长度为 0 时为一个空区间）
/// - 否则前 `hunks - 1` 段每段 `len / hunks` 字节，余数全部并入最后一段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePlanner {
    hunks: usize,
}

impl Default for RangePlanner {
    fn default() -> Self {
        Self {
            hunks: DEFAULT_HUNKS,
        }
    }
}

impl RangePlanner {
    pub fn new(hunks: usize) -> Self {
        Self { hunks }
    }

    pub fn hunks(&self) -> usize {
        self.hunks
    }

    /// 生成按偏移升序排列的区间列表，区间两两不重叠且并集恰为 `[0, content_length)`。
    pub fn plan(
        &self,
        content_length: u64,
    ) -> Result<Vec<ByteRange>, RangePlanError> {
        if self.hunks == 0 {
            return Err(RangePlanError::ZeroHunks);
        }

        let hunks = self.hunks as u64;
        if content_length < hunks {
            return Ok(vec![ByteRange::new(0, content_length)]);
        }

        let hunk_size = content_length / hunks;
        let mut ranges = Vec::with_capacity(self.hunks);
        let mut start = 0;
        for index in 0..hunks {
            let end = if index == hunks - 1 {
                content_length
            } else {
                start + hunk_size
            };
            ranges.push(ByteRange::new(start, end));
            start = end;
        }
        Ok(ranges)
    }
}
