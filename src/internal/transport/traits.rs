pub mod transport;

pub use transport::{ConnectHeaderHook, Transport};
