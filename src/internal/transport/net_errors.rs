//! 网络错误分类：沿 `source()` 链查找底层 I/O 错误。

use std::error::Error;
use std::io;

/// 传输中断时常见的错误文本，底层未保留 I/O 错误类型时按文本识别
const INTERRUPTED_MESSAGES: [&str; 3] = [
    "connection closed before message completed",
    "unexpected EOF",
    "connection reset",
];

pub(crate) fn error_chain<'a>(
    err: &'a (dyn Error + 'static),
) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    std::iter::successors(Some(err), |&e| e.source())
}

/// 可以原样重试的临时性 I/O 错误
pub(crate) fn is_temporary_io_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::TimedOut
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

pub(crate) fn has_temporary_io(err: &(dyn Error + 'static)) -> bool {
    error_chain(err)
        .filter_map(|e| e.downcast_ref::<io::Error>())
        .any(|e| is_temporary_io_kind(e.kind()))
}

/// 响应体读取过程中连接被提前关闭或重置
pub(crate) fn is_interrupted_transfer(err: &(dyn Error + 'static)) -> bool {
    error_chain(err).any(|e| {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::ConnectionReset
            ) {
                return true;
            }
        }
        let message = e.to_string();
        INTERRUPTED_MESSAGES.iter().any(|m| message.contains(m))
    })
}
