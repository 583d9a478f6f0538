//! 代理认证相关错误类型。
//!
//! 错误文本保持英文，便于日志检索与上层按前缀匹配。

use std::path::PathBuf;

use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

use crate::internal::proxy_auth::krb5::KerberosError;

#[derive(Debug, Error)]
pub enum ProxyAuthError {
    #[error("auth type is required")]
    MissingAuthType,

    #[error("unsupported proxy auth type: {0} (supported: basic, spnego)")]
    UnsupportedAuthType(String),

    #[error("username is required for SPNEGO authentication")]
    MissingUsername,

    #[error("password is required for SPNEGO authentication")]
    MissingPassword,

    #[error("proxy URL is required for SPNEGO authentication")]
    MissingProxyUrl,

    #[error("proxy URL must start with http:// or https://, got {0}")]
    InvalidProxyScheme(String),

    #[error("invalid proxy URL {url}: {source}")]
    InvalidProxyUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("proxy URL has no host: {0}")]
    ProxyUrlWithoutHost(String),

    #[error("invalid krb5 config path: path traversal detected in {0}")]
    Krb5PathTraversal(String),

    #[error("failed to load krb5 config from {}: {source}", .path.display())]
    Krb5ConfigLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no default realm found in krb5 config {}", .0.display())]
    MissingDefaultRealm(PathBuf),

    #[error("failed to login to Kerberos: {0}")]
    KerberosLogin(#[source] KerberosError),

    #[error("failed to obtain SPNEGO token for {spn}: {source}")]
    Token {
        spn: String,
        #[source]
        source: KerberosError,
    },

    #[error("invalid Proxy-Authorization header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}
