//! 按配置组装传输：reqwest 客户端 + 可选的代理认证装饰。

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use url::Url;

use crate::internal::proxy_auth::factory::new_proxy_authenticator_with_login;
use crate::internal::proxy_auth::krb5::{KerberosLogin, default_login};
use crate::internal::proxy_auth::structs::ProxyAuthConfig;
use crate::internal::transport::structs::{
    ProxyAuthTransport, ReqwestTransport, ReqwestTransportSettings, TransportError,
};
use crate::internal::transport::traits::Transport;

pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// 默认连接超时
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP 客户端配置
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// 代理及其认证方式，`None` 时沿用系统代理设置且不做代理认证
    pub proxy: Option<ProxyAuthConfig>,
    pub user_agent: String,
    pub skip_ssl_validation: bool,
    /// 单个请求的总超时；分片下载的大文件通常不设
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            skip_ssl_validation: false,
            timeout: None,
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
        }
    }
}

/// 使用默认 Kerberos 后端组装传输。
pub fn build_transport(
    config: &HttpClientConfig,
) -> Result<Arc<dyn Transport>, TransportError> {
    build_transport_with_login(config, default_login().as_ref())
}

pub fn build_transport_with_login(
    config: &HttpClientConfig,
    login: &dyn KerberosLogin,
) -> Result<Arc<dyn Transport>, TransportError> {
    let proxy_url = match &config.proxy {
        Some(proxy) if proxy.proxy_url.is_empty() => {
            return Err(TransportError::MissingProxyUrl);
        }
        Some(proxy) => Some(Url::parse(&proxy.proxy_url).map_err(|source| {
            TransportError::InvalidProxyUrl {
                url: proxy.proxy_url.clone(),
                source,
            }
        })?),
        None => None,
    };

    let settings = ReqwestTransportSettings {
        proxy_url,
        user_agent: Some(config.user_agent.clone()).filter(|ua| !ua.is_empty()),
        skip_ssl_validation: config.skip_ssl_validation,
        timeout: config.timeout,
        connect_timeout: config.connect_timeout,
    };
    let transport = ReqwestTransport::new(settings)?;

    let Some(proxy) = &config.proxy else {
        return Ok(Arc::new(transport));
    };

    let authenticator = new_proxy_authenticator_with_login(proxy, login)?;
    info!(
        proxy = %proxy.proxy_url,
        auth_type = %proxy.auth_type,
        "using authenticated proxy"
    );
    Ok(Arc::new(ProxyAuthTransport::new(transport, authenticator)?))
}
