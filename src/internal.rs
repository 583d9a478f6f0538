pub mod download;
pub mod progress;
pub mod proxy_auth;
pub mod range;
pub mod transport;
