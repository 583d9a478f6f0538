pub mod download_client;
pub mod download_client_config;
pub mod download_error;

pub use download_client::DownloadClient;
pub use download_client_config::DownloadClientConfig;
pub use download_error::{ChunkError, CopyError, DownloadError};
