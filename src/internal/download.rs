//! 分片并发下载：HEAD 探测长度，按区间并发 GET，每个区间独立重试直至成功或遇到终止性错误。

pub(crate) mod range_fetch;
pub mod structs;
pub mod traits;
