//! 单个区间的下载状态机。
//!
//! ```text
//! Seek ─▶ Request ─▶ Inspect ─▶ Copy ─▶ Done
//!  ▲         │          │         │
//!  └─────────┴──────────┴─────────┘   可重试错误回到 Seek
//! ```
//!
//! 可重试：临时性网络错误、403（换新链接）、响应体读取中断（撤回已计入的进度）。
//! 其余错误直接结束该区间。重试不设上限也不退避。

mod body_copy;

use std::io::SeekFrom;
use std::sync::Arc;

use reqwest::header::{HeaderMap, RANGE};
use reqwest::{Method, Request, Response, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncSeekExt;
use tracing::{debug, warn};
use url::Url;

use crate::internal::download::structs::ChunkError;
use crate::internal::download::traits::DownloadLinkFetcher;
use crate::internal::progress::ProgressReporter;
use crate::internal::range::ByteRange;
use crate::internal::transport::traits::Transport;

use body_copy::copy_body;

enum FetchState {
    Seek,
    Request,
    Inspect(Response),
    Copy(Response),
    Done,
    Failed(ChunkError),
}

/// 单个区间任务持有的全部资源（形参超过 3 个，用 struct 承载）。
pub(crate) struct RangeFetch {
    pub transport: Arc<dyn Transport>,
    pub url: Url,
    pub range: ByteRange,
    /// 独占的文件句柄，各区间互不共享偏移
    pub file: File,
    pub link_fetcher: Arc<dyn DownloadLinkFetcher>,
    pub progress: Arc<dyn ProgressReporter>,
    pub headers: HeaderMap,
}

impl RangeFetch {
    pub(crate) async fn run(mut self) -> Result<(), ChunkError> {
        let mut state = FetchState::Seek;
        let mut attempt: u64 = 0;

        loop {
            state = match state {
                FetchState::Seek => self.seek().await,
                FetchState::Request => {
                    attempt += 1;
                    self.request(attempt).await
                }
                FetchState::Inspect(response) => self.inspect(response).await,
                FetchState::Copy(response) => self.copy(response).await,
                FetchState::Done => {
                    debug!(range = %self.range, attempt, "range completed");
                    return Ok(());
                }
                FetchState::Failed(err) => return Err(err),
            };
        }
    }

    async fn seek(&mut self) -> FetchState {
        match self.file.seek(SeekFrom::Start(self.range.lower())).await {
            Ok(_) => FetchState::Request,
            Err(e) => FetchState::Failed(ChunkError::Seek(e)),
        }
    }

    fn build_request(&self) -> Result<Request, ChunkError> {
        let mut request = Request::new(Method::GET, self.url.clone());
        let headers = request.headers_mut();
        headers.extend(self.headers.clone());
        headers.insert(
            RANGE,
            self.range.header_value().map_err(ChunkError::BuildRequest)?,
        );
        Ok(request)
    }

    async fn request(&self, attempt: u64) -> FetchState {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => return FetchState::Failed(e),
        };

        match self.transport.round_trip(request).await {
            Ok(response) => FetchState::Inspect(response),
            Err(err) if err.is_transient() => {
                warn!(range = %self.range, attempt, error = %err, "transient error, retrying range");
                FetchState::Seek
            }
            Err(err) => FetchState::Failed(ChunkError::Request(err)),
        }
    }

    async fn inspect(&mut self, response: Response) -> FetchState {
        match response.status() {
            StatusCode::PARTIAL_CONTENT => FetchState::Copy(response),
            StatusCode::FORBIDDEN => {
                drop(response);
                self.refresh_link().await
            }
            status => FetchState::Failed(ChunkError::UnexpectedStatus(status)),
        }
    }

    async fn refresh_link(&mut self) -> FetchState {
        warn!(range = %self.range, "download link rejected with 403, fetching a new one");
        let link = match self.link_fetcher.new_download_link().await {
            Ok(link) => link,
            Err(e) => return FetchState::Failed(ChunkError::LinkRefresh(e)),
        };
        match Url::parse(&link) {
            Ok(url) => {
                self.url = url;
                FetchState::Seek
            }
            Err(source) => FetchState::Failed(ChunkError::InvalidLink { link, source }),
        }
    }

    async fn copy(&mut self, response: Response) -> FetchState {
        match copy_body(response, &mut self.file, self.progress.as_ref()).await {
            Ok(_) => FetchState::Done,
            Err(failure) if failure.error.is_interrupted() => {
                self.progress.add(-(failure.written as i64));
                warn!(
                    range = %self.range,
                    rewound = failure.written,
                    error = %failure.error,
                    "body interrupted, restarting range"
                );
                FetchState::Seek
            }
            Err(failure) => FetchState::Failed(ChunkError::Copy(failure.error)),
        }
    }
}
