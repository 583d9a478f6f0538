//! 传输层错误类型。

use thiserror::Error;

use crate::internal::proxy_auth::structs::ProxyAuthError;
use crate::internal::transport::net_errors::{has_temporary_io, is_temporary_io_kind};

#[derive(Debug, Error)]
pub enum TransportError {
    /// 认证器拒绝了请求，请求未被发出
    #[error("proxy authentication failed: {0}")]
    Auth(#[from] ProxyAuthError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("invalid proxy URL {url}: {source}")]
    InvalidProxyUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("proxy auth is configured but the proxy URL is empty")]
    MissingProxyUrl,

    /// 阻塞线程池中的认证任务未能完成
    #[error("proxy authentication task failed: {0}")]
    AuthTask(#[from] tokio::task::JoinError),
}

impl TransportError {
    /// 超时、连接重置等临时性网络错误，可原样重试。
    ///
    /// 连接被拒绝、DNS 失败、认证失败等不算。
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || has_temporary_io(err),
            Self::Io(err) => is_temporary_io_kind(err.kind()),
            _ => false,
        }
    }
}
