//! 下载客户端入口。

use core::fmt;
use std::path::Path;
use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use reqwest::header::{CONTENT_LENGTH, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Request};
use tokio::fs::{File, OpenOptions};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::internal::download::range_fetch::RangeFetch;
use crate::internal::download::structs::{DownloadClientConfig, DownloadError};
use crate::internal::download::traits::DownloadLinkFetcher;
use crate::internal::progress::ProgressReporter;
use crate::internal::range::{ByteRange, RangePlanner};
use crate::internal::transport::traits::Transport;

/// HEAD 探测结果
struct ContentProbe {
    /// 跟随重定向后的最终地址，GET 请求都发往这里
    url: Url,
    length: u64,
}

/// 分片并发下载客户端。
///
/// 目标文件必须已存在且可写；客户端不创建、不截断也不预分配文件。
#[derive(Clone)]
pub struct DownloadClient {
    transport: Arc<dyn Transport>,
    planner: RangePlanner,
    headers: HeaderMap,
}

impl DownloadClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, DownloadClientConfig::default())
    }

    pub fn with_config(
        transport: Arc<dyn Transport>,
        config: DownloadClientConfig,
    ) -> Self {
        Self {
            transport,
            planner: RangePlanner::new(config.hunks),
            headers: config.headers,
        }
    }

    /// 修改切分份数
    pub fn hunks(mut self, hunks: usize) -> Self {
        self.planner = RangePlanner::new(hunks);
        self
    }

    /// 追加一个随每个请求发送的头
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// 把链接指向的内容下载到 `destination`。
    ///
    /// 流程：取初始链接 → HEAD 取长度 → 规划区间 → 每个区间独立打开文件句柄并发下载。
    /// 任一区间终止性失败时返回按完成顺序最先出现的错误，但仍会等待其余区间结束。
    /// `progress.finish()` 在区间阶段开始后无论成败都会被调用。
    #[instrument(skip(self, destination, link_fetcher, progress), fields(destination = %destination.as_ref().display()))]
    pub async fn get(
        &self,
        destination: impl AsRef<Path>,
        link_fetcher: Arc<dyn DownloadLinkFetcher>,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<(), DownloadError> {
        let destination = destination.as_ref();

        let link = link_fetcher
            .new_download_link()
            .await
            .map_err(DownloadError::LinkFetch)?;
        let probe = self.probe(&link).await?;
        let ranges = self.planner.plan(probe.length)?;
        debug!(
            url = %probe.url,
            length = probe.length,
            ranges = ranges.len(),
            "content probed"
        );

        progress.set_total(probe.length);
        progress.kickoff();

        // 先为所有区间打开句柄，打开失败时不会留下已启动的任务
        let result = match open_range_files(destination, &ranges).await {
            Ok(files) => {
                self.fetch_ranges(probe.url, files, link_fetcher, Arc::clone(&progress))
                    .await
            }
            Err(err) => Err(err),
        };

        progress.finish();
        match &result {
            Ok(()) => info!(length = probe.length, "download finished"),
            Err(err) => warn!(error = %err, "download failed"),
        }
        result
    }

    async fn probe(&self, link: &str) -> Result<ContentProbe, DownloadError> {
        let url = Url::parse(link).map_err(DownloadError::HeadConstruct)?;
        let mut request = Request::new(Method::HEAD, url);
        request.headers_mut().extend(self.headers.clone());

        let response = self
            .transport
            .round_trip(request)
            .await
            .map_err(DownloadError::HeadRequest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HeadStatus(status));
        }

        let length = content_length(response.headers())
            .ok_or(DownloadError::UnknownContentLength)?;
        Ok(ContentProbe {
            url: response.url().clone(),
            length,
        })
    }

    async fn fetch_ranges(
        &self,
        url: Url,
        files: Vec<(ByteRange, File)>,
        link_fetcher: Arc<dyn DownloadLinkFetcher>,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<(), DownloadError> {
        let mut workers = FuturesUnordered::new();
        for (range, file) in files {
            let label = range.to_string();
            let fetch = RangeFetch {
                transport: Arc::clone(&self.transport),
                url: url.clone(),
                range,
                file,
                link_fetcher: Arc::clone(&link_fetcher),
                progress: Arc::clone(&progress),
                headers: self.headers.clone(),
            };
            let handle = tokio::spawn(fetch.run());
            workers.push(async move { (label, handle.await) });
        }

        let mut first_error: Option<DownloadError> = None;
        while let Some((range, joined)) = workers.next().await {
            let outcome = match joined {
                Ok(Ok(())) => continue,
                Ok(Err(source)) => DownloadError::Chunk { range, source },
                Err(join_error) => DownloadError::TaskJoin(join_error),
            };
            if first_error.is_none() {
                first_error = Some(outcome);
            } else {
                warn!(error = %outcome, "additional range failure");
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// 为每个非空区间打开独立的写句柄。
async fn open_range_files(
    destination: &Path,
    ranges: &[ByteRange],
) -> Result<Vec<(ByteRange, File)>, DownloadError> {
    let mut files = Vec::with_capacity(ranges.len());
    for range in ranges.iter().filter(|r| !r.is_empty()) {
        let file = OpenOptions::new()
            .write(true)
            .open(destination)
            .await
            .map_err(|source| DownloadError::OpenDestination {
                path: destination.to_path_buf(),
                source,
            })?;
        files.push((range.clone(), file));
    }
    Ok(files)
}

/// HEAD 响应不带响应体，直接解析 Content-Length 头。
fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

impl fmt::Debug for DownloadClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadClient")
            .field("hunks", &self.planner.hunks())
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}
