//! 代理认证装饰器：每个请求发出前先交给认证器处理。

use core::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, PROXY_AUTHORIZATION};
use reqwest::{Method, Request, Response};
use tokio::task;
use tracing::{debug, warn};
use url::Url;

use crate::internal::proxy_auth::structs::ProxyAuthError;
use crate::internal::proxy_auth::traits::ProxyAuthenticator;
use crate::internal::transport::structs::TransportError;
use crate::internal::transport::traits::{ConnectHeaderHook, Transport};

/// 包装任意 [`Transport`]，每个请求恰好调用一次认证器。
///
/// 认证器是同步接口且可能阻塞，在阻塞线程池中执行。
/// 认证失败时请求不会交给内层传输；内层传输的错误原样返回。
pub struct ProxyAuthTransport<T> {
    inner: T,
    authenticator: Arc<dyn ProxyAuthenticator>,
}

impl<T: Transport> ProxyAuthTransport<T> {
    /// 内层传输支持时，同时为 CONNECT 隧道安装认证头钩子。
    pub fn new(
        mut inner: T,
        authenticator: Arc<dyn ProxyAuthenticator>,
    ) -> Result<Self, TransportError> {
        let hook_authenticator = Arc::clone(&authenticator);
        let hook: ConnectHeaderHook = Arc::new(move |proxy_url: &Url| {
            connect_headers(hook_authenticator.as_ref(), proxy_url)
        });
        let installed = inner.install_connect_header_hook(hook)?;
        debug!(installed, ?authenticator, "proxy auth transport ready");

        Ok(Self {
            inner,
            authenticator,
        })
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn authenticator(&self) -> &Arc<dyn ProxyAuthenticator> {
        &self.authenticator
    }
}

/// 用一个临时的 CONNECT 请求取得认证头。
fn connect_headers(
    authenticator: &dyn ProxyAuthenticator,
    proxy_url: &Url,
) -> Result<HeaderMap, ProxyAuthError> {
    let mut connect = Request::new(Method::CONNECT, proxy_url.clone());
    authenticator.authenticate(&mut connect)?;

    let mut headers = HeaderMap::new();
    if let Some(value) = connect.headers().get(PROXY_AUTHORIZATION) {
        headers.insert(PROXY_AUTHORIZATION, value.clone());
    }
    Ok(headers)
}

#[async_trait]
impl<T: Transport> Transport for ProxyAuthTransport<T> {
    async fn round_trip(&self, request: Request) -> Result<Response, TransportError> {
        let authenticator = Arc::clone(&self.authenticator);
        let (request, outcome) = task::spawn_blocking(move || {
            let mut request = request;
            let outcome = authenticator.authenticate(&mut request);
            (request, outcome)
        })
        .await?;

        if let Err(err) = outcome {
            warn!(url = %request.url(), error = %err, "proxy authentication failed");
            return Err(TransportError::Auth(err));
        }
        self.inner.round_trip(request).await
    }
}

impl<T> fmt::Debug for ProxyAuthTransport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyAuthTransport")
            .field("authenticator", &self.authenticator)
            .finish()
    }
}
