pub mod proxy_auth_transport;
pub mod reqwest_transport;
pub mod transport_error;

pub use proxy_auth_transport::ProxyAuthTransport;
pub use reqwest_transport::{ReqwestTransport, ReqwestTransportSettings};
pub use transport_error::TransportError;
