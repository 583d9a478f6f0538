pub mod proxy_authenticator;

pub use proxy_authenticator::ProxyAuthenticator;
