//! Kerberos 登录与令牌生成的后端接口。
//!
//! [`SpnegoProxyAuth`](crate::internal::proxy_auth::structs::SpnegoProxyAuth)
//! 只依赖这里的 trait；具体协议实现由 `sspi` feature 提供。

use core::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::krb5_config::Krb5Config;

#[derive(Debug, Error)]
pub enum KerberosError {
    #[error("Kerberos support is not compiled in; enable the `sspi` feature")]
    Unsupported,

    #[error("no KDC configured for realm {0}")]
    NoKdc(String),

    #[error("{0}")]
    Backend(String),
}

/// 登录参数
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub realm: &'a str,
    /// 登录后将要访问的服务主体，后端可借此在登录阶段验证凭据
    pub service_principal: &'a str,
    pub config: &'a Krb5Config,
}

impl LoginRequest<'_> {
    /// 完整的用户主体名；用户名未带 realm 时补上默认 realm。
    pub fn principal(&self) -> String {
        if self.username.contains('@') {
            self.username.to_string()
        } else {
            format!("{}@{}", self.username, self.realm)
        }
    }
}

/// 防止debug泄漏密码
impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .field("realm", &self.realm)
            .field("service_principal", &self.service_principal)
            .finish()
    }
}

/// 已登录的 Kerberos 会话，可并发为任意 SPN 生成 SPNEGO 初始令牌。
pub trait KerberosSession: Send + Sync {
    fn negotiation_token(&self, spn: &str) -> Result<Vec<u8>, KerberosError>;
}

/// 基于用户名/密码的 Kerberos 登录。
pub trait KerberosLogin: Send + Sync {
    fn login(
        &self,
        request: &LoginRequest<'_>,
    ) -> Result<Arc<dyn KerberosSession>, KerberosError>;
}

/// 未启用任何 Kerberos 后端时使用，登录总是失败。
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedLogin;

impl KerberosLogin for UnsupportedLogin {
    fn login(
        &self,
        _request: &LoginRequest<'_>,
    ) -> Result<Arc<dyn KerberosSession>, KerberosError> {
        Err(KerberosError::Unsupported)
    }
}

/// 当前编译配置下的默认登录后端。
pub fn default_login() -> Arc<dyn KerberosLogin> {
    #[cfg(feature = "sspi")]
    {
        Arc::new(super::sspi_login::SspiLogin)
    }
    #[cfg(not(feature = "sspi"))]
    {
        Arc::new(UnsupportedLogin)
    }
}
