//! 字节区间划分：把内容长度切成若干个连续、不重叠的 Range 区间。

pub mod byte_range;
pub mod range_planner;

pub use byte_range::ByteRange;
pub use range_planner::{RangePlanError, RangePlanner, DEFAULT_HUNKS};
