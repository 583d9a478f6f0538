//! HTTP 传输层：可替换的请求执行接口、reqwest 实现、代理认证装饰器与客户端工厂。

pub mod client_factory;
pub(crate) mod net_errors;
pub mod structs;
pub mod traits;
