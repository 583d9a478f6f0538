//! 下载相关错误类型。

use std::path::PathBuf;

use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

use crate::internal::download::traits::LinkFetchError;
use crate::internal::range::RangePlanError;
use crate::internal::transport::net_errors::is_interrupted_transfer;
use crate::internal::transport::structs::TransportError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to fetch the initial download link: {0}")]
    LinkFetch(#[source] LinkFetchError),

    #[error("failed to construct HEAD request: {0}")]
    HeadConstruct(#[source] url::ParseError),

    #[error("failed to make HEAD request: {0}")]
    HeadRequest(#[source] TransportError),

    #[error("HEAD request returned unexpected status code: {}", .0.as_u16())]
    HeadStatus(StatusCode),

    #[error("HEAD response did not include a valid Content-Length")]
    UnknownContentLength,

    #[error("failed to construct range: {0}")]
    RangePlan(#[from] RangePlanError),

    #[error("failed to open file {} for writing: {source}", .path.display())]
    OpenDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed during retryable request for {range}: {source}")]
    Chunk {
        range: String,
        #[source]
        source: ChunkError,
    },

    #[error("range task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// 单个区间的终止性错误
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("failed to seek to correct byte of output file: {0}")]
    Seek(#[source] std::io::Error),

    #[error("failed to construct GET request: {0}")]
    BuildRequest(#[source] InvalidHeaderValue),

    #[error("download request failed: {0}")]
    Request(#[source] TransportError),

    #[error("failed to fetch a new download link: {0}")]
    LinkRefresh(#[source] LinkFetchError),

    #[error("new download link is not a valid URL {link}: {source}")]
    InvalidLink {
        link: String,
        #[source]
        source: url::ParseError,
    },

    #[error("during GET unexpected status code was returned: {}", .0.as_u16())]
    UnexpectedStatus(StatusCode),

    #[error("failed to write file during copy: {0}")]
    Copy(#[source] CopyError),
}

/// 响应体拷贝到文件时的错误
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to write destination: {0}")]
    Write(#[source] std::io::Error),
}

impl CopyError {
    /// 连接在读取响应体时被提前关闭或重置，整个区间可以重来。
    pub fn is_interrupted(&self) -> bool {
        match self {
            Self::Body(err) => is_interrupted_transfer(err),
            Self::Write(_) => false,
        }
    }
}
