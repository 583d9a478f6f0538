pub mod basic_proxy_auth;
pub mod proxy_auth_config;
pub mod proxy_auth_error;
pub mod spnego_proxy_auth;

pub use basic_proxy_auth::BasicProxyAuth;
pub use proxy_auth_config::{
    AUTH_TYPE_BASIC, AUTH_TYPE_SPNEGO, ProxyAuthConfig, ProxyAuthKind,
};
pub use proxy_auth_error::ProxyAuthError;
pub use spnego_proxy_auth::SpnegoProxyAuth;
