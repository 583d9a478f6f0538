//! 基于 reqwest 的传输实现。

use core::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, PROXY_AUTHORIZATION};
use reqwest::{Client, Proxy, Request, Response};
use tokio::task;
use tracing::debug;
use url::Url;

use crate::internal::transport::structs::TransportError;
use crate::internal::transport::traits::{ConnectHeaderHook, Transport};

/// 构建 reqwest 客户端所需的全部参数
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransportSettings {
    /// 未设置时沿用系统代理环境变量
    pub proxy_url: Option<Url>,
    pub user_agent: Option<String>,
    pub skip_ssl_validation: bool,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

/// reqwest 传输。
///
/// reqwest 只在构建客户端时接受代理隧道凭据。安装 CONNECT 钩子后，每个经代理的 https 请求
/// 都先调用钩子，再用一次性客户端建立自己的隧道，因此每条隧道携带新的 `Proxy-Authorization`。
/// 明文 http 请求仍走共享客户端。
pub struct ReqwestTransport {
    client: Client,
    settings: ReqwestTransportSettings,
    connect_hook: Option<ConnectHeaderHook>,
}

impl ReqwestTransport {
    pub fn new(settings: ReqwestTransportSettings) -> Result<Self, TransportError> {
        let client = build_client(&settings, None)?;
        Ok(Self {
            client,
            settings,
            connect_hook: None,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn settings(&self) -> &ReqwestTransportSettings {
        &self.settings
    }

    /// 为一条新隧道取认证头并构建专用客户端。
    ///
    /// 钩子可能阻塞（SPNEGO 需要访问 KDC），放到阻塞线程池执行。
    async fn tunnel_client(
        &self,
        hook: &ConnectHeaderHook,
        proxy_url: &Url,
    ) -> Result<Client, TransportError> {
        let hook = Arc::clone(hook);
        let target = proxy_url.clone();
        let headers = task::spawn_blocking(move || hook(&target)).await??;
        let tunnel_auth = headers.get(PROXY_AUTHORIZATION).cloned();
        debug!(
            proxy = %proxy_url,
            with_auth = tunnel_auth.is_some(),
            "opening CONNECT tunnel"
        );
        build_client(&self.settings, tunnel_auth)
    }
}

/// 经代理访问 https 目标时 reqwest 会建立 CONNECT 隧道
fn needs_tunnel(url: &Url) -> bool {
    url.scheme() == "https"
}

fn build_client(
    settings: &ReqwestTransportSettings,
    tunnel_auth: Option<HeaderValue>,
) -> Result<Client, TransportError> {
    let mut builder = Client::builder();

    if let Some(user_agent) = &settings.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    if settings.skip_ssl_validation {
        builder = builder.danger_accept_invalid_certs(true);
    }
    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(connect_timeout) = settings.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(proxy_url) = &settings.proxy_url {
        let mut proxy = Proxy::all(proxy_url.as_str()).map_err(TransportError::Build)?;
        if let Some(value) = tunnel_auth {
            proxy = proxy.custom_http_auth(value);
            // 一次性客户端不保留空闲隧道
            builder = builder.pool_max_idle_per_host(0);
        }
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(TransportError::Build)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn round_trip(&self, request: Request) -> Result<Response, TransportError> {
        if let (Some(hook), Some(proxy_url)) = (&self.connect_hook, &self.settings.proxy_url) {
            if needs_tunnel(request.url()) {
                let client = self.tunnel_client(hook, proxy_url).await?;
                return Ok(client.execute(request).await?);
            }
        }
        Ok(self.client.execute(request).await?)
    }

    fn install_connect_header_hook(
        &mut self,
        hook: ConnectHeaderHook,
    ) -> Result<bool, TransportError> {
        if self.settings.proxy_url.is_none() {
            return Ok(false);
        }
        self.connect_hook = Some(hook);
        Ok(true)
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("settings", &self.settings)
            .field("connect_hook", &self.connect_hook.is_some())
            .finish()
    }
}
