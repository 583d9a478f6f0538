//! SPNEGO（Kerberos Negotiate）代理认证。

use core::fmt;
use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Request;
use reqwest::header::{HeaderValue, PROXY_AUTHORIZATION};
use tracing::{debug, instrument};
use url::Url;

use crate::internal::proxy_auth::krb5::{
    KerberosLogin, KerberosSession, Krb5Config, LoginRequest, default_login,
    resolve_krb5_config_path,
};
use crate::internal::proxy_auth::structs::ProxyAuthError;
use crate::internal::proxy_auth::traits::ProxyAuthenticator;

/// SPNEGO 代理认证器
///
/// 构造时完成 Kerberos 登录，之后每个请求都为 `HTTP/<代理主机>` 生成新的 Negotiate 令牌。
pub struct SpnegoProxyAuth {
    proxy_url: String,
    realm: String,
    service_principal: String,
    session: Arc<dyn KerberosSession>,
}

impl SpnegoProxyAuth {
    /// 使用默认 Kerberos 后端登录。
    ///
    /// `krb5_config_path` 为空时依次查找 `KRB5_CONFIG` 与平台默认路径。
    pub fn new(
        username: &str,
        password: &str,
        proxy_url: &str,
        krb5_config_path: &str,
    ) -> Result<Self, ProxyAuthError> {
        Self::with_login(
            username,
            password,
            proxy_url,
            krb5_config_path,
            default_login().as_ref(),
        )
    }

    /// 使用指定的 Kerberos 后端登录。
    ///
    /// 参数校验全部在任何 I/O 之前完成。
    #[instrument(level = "debug", skip(password, login))]
    pub fn with_login(
        username: &str,
        password: &str,
        proxy_url: &str,
        krb5_config_path: &str,
        login: &dyn KerberosLogin,
    ) -> Result<Self, ProxyAuthError> {
        validate_fields(username, password, proxy_url)?;

        let path = resolve_krb5_config_path(
            krb5_config_path,
            |key| std::env::var(key).ok(),
            Path::exists,
        )?;
        let config = Krb5Config::load(&path).map_err(|source| {
            ProxyAuthError::Krb5ConfigLoad {
                path: path.clone(),
                source,
            }
        })?;
        let realm = config
            .default_realm
            .clone()
            .ok_or_else(|| ProxyAuthError::MissingDefaultRealm(path.clone()))?;

        let service_principal = service_principal_for(proxy_url)?;

        debug!(
            realm = %realm,
            config = %path.display(),
            spn = %service_principal,
            "logging in to Kerberos"
        );
        let session = login
            .login(&LoginRequest {
                username,
                password,
                realm: &realm,
                service_principal: &service_principal,
                config: &config,
            })
            .map_err(ProxyAuthError::KerberosLogin)?;

        Ok(Self {
            proxy_url: proxy_url.to_string(),
            realm,
            service_principal,
            session,
        })
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// 形如 `HTTP/proxy.example.com`
    pub fn service_principal(&self) -> &str {
        &self.service_principal
    }

    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }
}

/// 构造前的参数校验，不做任何 I/O。
pub(crate) fn validate_fields(
    username: &str,
    password: &str,
    proxy_url: &str,
) -> Result<(), ProxyAuthError> {
    if username.is_empty() {
        return Err(ProxyAuthError::MissingUsername);
    }
    if password.is_empty() {
        return Err(ProxyAuthError::MissingPassword);
    }
    if proxy_url.is_empty() {
        return Err(ProxyAuthError::MissingProxyUrl);
    }
    if !proxy_url.starts_with("http://") && !proxy_url.starts_with("https://") {
        return Err(ProxyAuthError::InvalidProxyScheme(proxy_url.to_string()));
    }
    Ok(())
}

fn service_principal_for(proxy_url: &str) -> Result<String, ProxyAuthError> {
    let parsed =
        Url::parse(proxy_url).map_err(|source| ProxyAuthError::InvalidProxyUrl {
            url: proxy_url.to_string(),
            source,
        })?;
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ProxyAuthError::ProxyUrlWithoutHost(proxy_url.to_string()))?;
    Ok(format!("HTTP/{host}"))
}

impl ProxyAuthenticator for SpnegoProxyAuth {
    fn authenticate(&self, request: &mut Request) -> Result<(), ProxyAuthError> {
        let token = self
            .session
            .negotiation_token(&self.service_principal)
            .map_err(|source| ProxyAuthError::Token {
                spn: self.service_principal.clone(),
                source,
            })?;

        let mut value =
            HeaderValue::from_str(&format!("Negotiate {}", STANDARD.encode(token)))?;
        value.set_sensitive(true);
        request.headers_mut().insert(PROXY_AUTHORIZATION, value);
        Ok(())
    }
}

/// 防止debug泄漏会话
impl fmt::Debug for SpnegoProxyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpnegoProxyAuth")
            .field("proxy_url", &self.proxy_url)
            .field("realm", &self.realm)
            .field("service_principal", &self.service_principal)
            .field("session", &"<Kerberos session>")
            .finish()
    }
}
