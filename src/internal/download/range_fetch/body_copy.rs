//! 把响应体流式写入文件，每写完一块才计入进度。

use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::Response;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::internal::download::structs::CopyError;
use crate::internal::progress::ProgressReporter;

/// 拷贝失败时，附带本次已写入并计入进度的字节数。
pub(super) struct CopyFailure {
    pub written: u64,
    pub error: CopyError,
}

pub(super) async fn copy_body(
    response: Response,
    file: &mut File,
    progress: &dyn ProgressReporter,
) -> Result<u64, CopyFailure> {
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(next) = stream.next().await {
        let chunk: Bytes = next.map_err(|e| CopyFailure {
            written,
            error: CopyError::Body(e),
        })?;
        if chunk.is_empty() {
            continue;
        }

        file.write_all(&chunk).await.map_err(|e| CopyFailure {
            written,
            error: CopyError::Write(e),
        })?;
        written += chunk.len() as u64;
        progress.add(chunk.len() as i64);
    }

    file.flush().await.map_err(|e| CopyFailure {
        written,
        error: CopyError::Write(e),
    })?;
    Ok(written)
}
