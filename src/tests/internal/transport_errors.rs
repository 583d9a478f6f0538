use std::io;

use thiserror::Error;

use crate::internal::download::structs::CopyError;
use crate::internal::proxy_auth::structs::ProxyAuthError;
use crate::internal::transport::net_errors::{error_chain, is_interrupted_transfer};
use crate::internal::transport::structs::TransportError;
use crate::tests::interrupted_response;

#[derive(Debug, Error)]
#[error("stream wrapper")]
struct Wrapper(#[source] io::Error);

#[derive(Debug, Error)]
#[error("connection closed before message completed")]
struct HyperLikeClose;

#[test]
fn temporary_io_errors_are_transient() {
    for kind in [
        io::ErrorKind::TimedOut,
        io::ErrorKind::ConnectionReset,
        io::ErrorKind::ConnectionAborted,
        io::ErrorKind::Interrupted,
        io::ErrorKind::WouldBlock,
    ] {
        assert!(TransportError::Io(io::Error::new(kind, "x")).is_transient(), "{kind:?}");
    }
}

#[test]
fn permanent_errors_are_not_transient() {
    for kind in [
        io::ErrorKind::ConnectionRefused,
        io::ErrorKind::NotFound,
        io::ErrorKind::PermissionDenied,
    ] {
        assert!(!TransportError::Io(io::Error::new(kind, "x")).is_transient(), "{kind:?}");
    }
    assert!(!TransportError::Auth(ProxyAuthError::MissingUsername).is_transient());
    assert!(!TransportError::MissingProxyUrl.is_transient());
}

#[tokio::test]
async fn refused_connection_is_not_transient() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let err = client
        .get(format!("http://127.0.0.1:{port}/"))
        .send()
        .await
        .unwrap_err();
    assert!(!TransportError::Http(err).is_transient());
}

#[derive(Debug, Error)]
#[error("outer")]
struct Outer(#[source] Wrapper);

#[test]
fn error_chain_walks_every_source() {
    let err = Outer(Wrapper(io::Error::new(io::ErrorKind::TimedOut, "slow")));
    let messages: Vec<String> = error_chain(&err).map(|e| e.to_string()).collect();
    assert_eq!(messages, ["outer", "stream wrapper", "slow"]);
}

#[test]
fn interrupted_transfers_are_detected_through_the_chain() {
    let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "early eof");
    assert!(is_interrupted_transfer(&eof));

    let wrapped = Wrapper(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
    assert!(is_interrupted_transfer(&wrapped));

    assert!(is_interrupted_transfer(&HyperLikeClose));

    let other = Wrapper(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
    assert!(!is_interrupted_transfer(&other));
}

#[tokio::test]
async fn body_errors_from_reqwest_are_classified() {
    let err = interrupted_response(b"partial", io::ErrorKind::UnexpectedEof)
        .bytes()
        .await
        .unwrap_err();
    assert!(CopyError::Body(err).is_interrupted());

    let err = interrupted_response(b"", io::ErrorKind::PermissionDenied)
        .bytes()
        .await
        .unwrap_err();
    assert!(!CopyError::Body(err).is_interrupted());

    let write = CopyError::Write(io::Error::new(io::ErrorKind::UnexpectedEof, "disk"));
    assert!(!write.is_interrupted());
}
