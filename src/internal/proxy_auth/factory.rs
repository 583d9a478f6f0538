//! 按配置创建代理认证器。

use std::sync::Arc;

use tracing::debug;

use crate::internal::proxy_auth::krb5::{KerberosLogin, default_login};
use crate::internal::proxy_auth::structs::{
    BasicProxyAuth, ProxyAuthConfig, ProxyAuthError, ProxyAuthKind, SpnegoProxyAuth,
};
use crate::internal::proxy_auth::traits::ProxyAuthenticator;

/// 按 `auth_type` 创建认证器，SPNEGO 使用默认 Kerberos 后端。
pub fn new_proxy_authenticator(
    config: &ProxyAuthConfig,
) -> Result<Arc<dyn ProxyAuthenticator>, ProxyAuthError> {
    new_proxy_authenticator_with_login(config, default_login().as_ref())
}

pub fn new_proxy_authenticator_with_login(
    config: &ProxyAuthConfig,
    login: &dyn KerberosLogin,
) -> Result<Arc<dyn ProxyAuthenticator>, ProxyAuthError> {
    let kind = ProxyAuthKind::try_from(config)?;
    build_authenticator(kind, login)
}

pub fn build_authenticator(
    kind: ProxyAuthKind,
    login: &dyn KerberosLogin,
) -> Result<Arc<dyn ProxyAuthenticator>, ProxyAuthError> {
    debug!(auth_type = kind.auth_type(), "creating proxy authenticator");
    match kind {
        ProxyAuthKind::Basic { username, password } => {
            Ok(Arc::new(BasicProxyAuth::new(&username, &password)))
        }
        ProxyAuthKind::Spnego {
            username,
            password,
            proxy_url,
            krb5_config,
        } => {
            let krb5_config = krb5_config
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Arc::new(SpnegoProxyAuth::with_login(
                &username,
                &password,
                &proxy_url,
                &krb5_config,
                login,
            )?))
        }
    }
}
