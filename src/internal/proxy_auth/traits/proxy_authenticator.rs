use core::fmt;

use reqwest::Request;

use crate::internal::proxy_auth::structs::ProxyAuthError;

/// 代理认证器：在请求发出前写入 `Proxy-Authorization` 头。
///
/// 实现方需要能被多个并发请求共享；Debug 输出不得包含凭据。
pub trait ProxyAuthenticator: Send + Sync + fmt::Debug {
    /// 修改传入的请求。可能阻塞（例如向 KDC 申请服务票据）。
    fn authenticate(&self, request: &mut Request) -> Result<(), ProxyAuthError>;
}
