pub mod download_link_fetcher;

pub use download_link_fetcher::{DownloadLinkFetcher, LinkFetchError};
