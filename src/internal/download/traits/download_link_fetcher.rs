use async_trait::async_trait;

/// 获取下载链接失败时的错误，由调用方自行定义
pub type LinkFetchError = Box<dyn std::error::Error + Send + Sync>;

/// 下载链接来源。
///
/// 下载开始时调用一次取得初始链接；之后任一区间收到 403 时再调用一次，
/// 以应对带签名、会过期的链接。
#[async_trait]
pub trait DownloadLinkFetcher: Send + Sync {
    async fn new_download_link(&self) -> Result<String, LinkFetchError>;
}
