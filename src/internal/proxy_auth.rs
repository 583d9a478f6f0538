//! 代理认证：为发往代理的请求附加 `Proxy-Authorization` 头。
//!
//! - `basic`：静态用户名/密码
//! - `spnego`：Kerberos 登录后按请求生成 Negotiate 令牌

pub mod factory;
pub mod krb5;
pub mod structs;
pub mod traits;
