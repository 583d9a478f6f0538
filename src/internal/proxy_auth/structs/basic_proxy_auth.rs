use core::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Request;
use reqwest::header::{HeaderValue, PROXY_AUTHORIZATION};
use sha2::{Digest, Sha256};

use crate::internal::proxy_auth::structs::ProxyAuthError;
use crate::internal::proxy_auth::traits::ProxyAuthenticator;

/// Basic 代理认证
///
/// - 用户名和密码都为空时不写任何头，请求原样放行
/// - 任意一项非空即写入 `Basic base64(username:password)`，不做其它校验
///
/// 相等性只比较凭据的 sha256 指纹，Debug 不输出凭据。
#[derive(Clone)]
pub struct BasicProxyAuth {
    token: Option<Arc<String>>,
    pub(crate) fingerprint: Arc<String>,
}

impl BasicProxyAuth {
    pub fn new(username: &str, password: &str) -> Self {
        if username.is_empty() && password.is_empty() {
            return Self {
                token: None,
                fingerprint: Arc::new(String::new()),
            };
        }

        let token = STANDARD.encode(format!("{username}:{password}"));
        let fingerprint = fingerprint(&token);
        Self {
            token: Some(Arc::new(token)),
            fingerprint: Arc::new(fingerprint),
        }
    }

    /// 是否为不附加任何头的直通认证器
    pub fn is_passthrough(&self) -> bool {
        self.token.is_none()
    }
}

fn fingerprint(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl ProxyAuthenticator for BasicProxyAuth {
    fn authenticate(&self, request: &mut Request) -> Result<(), ProxyAuthError> {
        let Some(token) = &self.token else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Basic {token}"))?;
        value.set_sensitive(true);
        request.headers_mut().insert(PROXY_AUTHORIZATION, value);
        Ok(())
    }
}

impl PartialEq for BasicProxyAuth {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for BasicProxyAuth {}

/// 防止debug泄漏账号
impl fmt::Debug for BasicProxyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicProxyAuth")
            .field("token", &"<hidden>")
            .field("passthrough", &self.is_passthrough())
            .finish()
    }
}
