//! 代理认证配置。

use core::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::internal::proxy_auth::structs::ProxyAuthError;

pub const AUTH_TYPE_BASIC: &str = "basic";
pub const AUTH_TYPE_SPNEGO: &str = "spnego";

/// 代理认证的原始配置，通常来自配置文件。
///
/// `auth_type` 区分大小写，只接受 `basic` 与 `spnego`。
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProxyAuthConfig {
    pub auth_type: String,
    pub proxy_url: String,
    pub username: String,
    pub password: String,
    /// 为空时自动定位
    pub krb5_config: String,
}

impl ProxyAuthConfig {
    pub fn basic(proxy_url: &str, username: &str, password: &str) -> Self {
        Self {
            auth_type: AUTH_TYPE_BASIC.to_string(),
            proxy_url: proxy_url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            krb5_config: String::new(),
        }
    }

    pub fn spnego(
        proxy_url: &str,
        username: &str,
        password: &str,
        krb5_config: &str,
    ) -> Self {
        Self {
            auth_type: AUTH_TYPE_SPNEGO.to_string(),
            proxy_url: proxy_url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            krb5_config: krb5_config.to_string(),
        }
    }
}

/// 防止debug泄漏密码
impl fmt::Debug for ProxyAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyAuthConfig")
            .field("auth_type", &self.auth_type)
            .field("proxy_url", &self.proxy_url)
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .field("krb5_config", &self.krb5_config)
            .finish()
    }
}

/// 校验过认证类型的配置
#[derive(Clone, PartialEq, Eq)]
pub enum ProxyAuthKind {
    Basic {
        username: String,
        password: String,
    },
    Spnego {
        username: String,
        password: String,
        proxy_url: String,
        krb5_config: Option<PathBuf>,
    },
}

impl ProxyAuthKind {
    pub fn auth_type(&self) -> &'static str {
        match self {
            Self::Basic { .. } => AUTH_TYPE_BASIC,
            Self::Spnego { .. } => AUTH_TYPE_SPNEGO,
        }
    }
}

impl TryFrom<&ProxyAuthConfig> for ProxyAuthKind {
    type Error = ProxyAuthError;

    fn try_from(config: &ProxyAuthConfig) -> Result<Self, Self::Error> {
        match config.auth_type.as_str() {
            "" => Err(ProxyAuthError::MissingAuthType),
            AUTH_TYPE_BASIC => Ok(Self::Basic {
                username: config.username.clone(),
                password: config.password.clone(),
            }),
            AUTH_TYPE_SPNEGO => Ok(Self::Spnego {
                username: config.username.clone(),
                password: config.password.clone(),
                proxy_url: config.proxy_url.clone(),
                krb5_config: Some(config.krb5_config.as_str())
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from),
            }),
            other => Err(ProxyAuthError::UnsupportedAuthType(other.to_string())),
        }
    }
}

impl fmt::Debug for ProxyAuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<hidden>")
                .finish(),
            Self::Spnego {
                username,
                proxy_url,
                krb5_config,
                ..
            } => f
                .debug_struct("Spnego")
                .field("username", username)
                .field("password", &"<hidden>")
                .field("proxy_url", proxy_url)
                .field("krb5_config", krb5_config)
                .finish(),
        }
    }
}
