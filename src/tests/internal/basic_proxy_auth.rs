use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{HeaderValue, PROXY_AUTHORIZATION};
use reqwest::{Method, Request};
use url::Url;

use crate::internal::proxy_auth::structs::BasicProxyAuth;
use crate::internal::proxy_auth::traits::ProxyAuthenticator;

fn request() -> Request {
    Request::new(
        Method::GET,
        Url::parse("http://example.com/file.bin").unwrap(),
    )
}

fn proxy_authorization(auth: &BasicProxyAuth) -> Option<String> {
    let mut request = request();
    auth.authenticate(&mut request).unwrap();
    request
        .headers()
        .get(PROXY_AUTHORIZATION)
        .map(|v| v.to_str().unwrap().to_string())
}

#[test]
fn username_and_password() {
    let auth = BasicProxyAuth::new("user", "pass");
    assert_eq!(proxy_authorization(&auth).as_deref(), Some("Basic dXNlcjpwYXNz"));
}

#[test]
fn empty_credentials_pass_through() {
    let auth = BasicProxyAuth::new("", "");
    assert!(auth.is_passthrough());
    assert_eq!(proxy_authorization(&auth), None);
}

#[test]
fn username_only() {
    let auth = BasicProxyAuth::new("user", "");
    assert_eq!(proxy_authorization(&auth).as_deref(), Some("Basic dXNlcjo="));
}

#[test]
fn password_only() {
    let auth = BasicProxyAuth::new("", "pass");
    assert_eq!(proxy_authorization(&auth).as_deref(), Some("Basic OnBhc3M="));
}

#[test]
fn unusual_characters_are_encoded_verbatim() {
    let username = "dom\\üser\n";
    let password = "p@ss:w\0rd";
    let auth = BasicProxyAuth::new(username, password);
    let expected = format!("Basic {}", STANDARD.encode(format!("{username}:{password}")));
    assert_eq!(proxy_authorization(&auth), Some(expected));
}

#[test]
fn replaces_existing_header() {
    let auth = BasicProxyAuth::new("user", "pass");
    let mut request = request();
    request
        .headers_mut()
        .insert(PROXY_AUTHORIZATION, HeaderValue::from_static("Basic stale"));
    auth.authenticate(&mut request).unwrap();

    let values: Vec<_> = request.headers().get_all(PROXY_AUTHORIZATION).iter().collect();
    assert_eq!(values, vec![&HeaderValue::from_static("Basic dXNlcjpwYXNz")]);
}

#[test]
fn equality_uses_fingerprint_and_debug_hides_credentials() {
    let a = BasicProxyAuth::new("alice", "s3cr3t");
    let b = BasicProxyAuth::new("alice", "s3cr3t");
    let c = BasicProxyAuth::new("alice", "other");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.fingerprint.len(), 64);

    let debug = format!("{a:?}");
    assert!(!debug.contains("s3cr3t"));
    assert!(!debug.contains(&STANDARD.encode("alice:s3cr3t")));
}
