use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Request, Response};
use url::Url;

use crate::internal::proxy_auth::structs::ProxyAuthError;
use crate::internal::transport::structs::TransportError;

/// CONNECT 隧道请求头钩子：给定代理地址，返回要附加在 CONNECT 请求上的头。
pub type ConnectHeaderHook =
    Arc<dyn Fn(&Url) -> Result<HeaderMap, ProxyAuthError> + Send + Sync>;

/// 执行单个 HTTP 请求，可在多个任务间共享。
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, request: Request) -> Result<Response, TransportError>;

    /// 安装 CONNECT 隧道请求头钩子。
    ///
    /// 返回 `Ok(false)` 表示该传输不经过代理或不支持钩子。
    fn install_connect_header_hook(
        &mut self,
        _hook: ConnectHeaderHook,
    ) -> Result<bool, TransportError> {
        Ok(false)
    }
}

#[async_trait]
impl Transport for Client {
    async fn round_trip(&self, request: Request) -> Result<Response, TransportError> {
        Ok(self.execute(request).await?)
    }
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn round_trip(&self, request: Request) -> Result<Response, TransportError> {
        self.as_ref().round_trip(request).await
    }
}
