use reqwest::header::HeaderMap;

use crate::internal::range::DEFAULT_HUNKS;

#[derive(Debug, Clone)]
pub struct DownloadClientConfig {
    /// 切分份数
    pub hunks: usize,
    /// 附加在每个 HEAD / GET 请求上的头
    pub headers: HeaderMap,
}

impl Default for DownloadClientConfig {
    fn default() -> Self {
        Self {
            hunks: DEFAULT_HUNKS,
            headers: HeaderMap::new(),
        }
    }
}
