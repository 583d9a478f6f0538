use std::cell::Cell;
use std::path::{Path, PathBuf};

use crate::internal::proxy_auth::krb5::{
    DEFAULT_KRB5_CONFIG, KRB5_CONFIG_ENV, Krb5Config, platform_search_paths,
    resolve_krb5_config_path,
};
use crate::internal::proxy_auth::structs::ProxyAuthError;
use crate::tests::SAMPLE_KRB5_CONF;

fn no_env(_: &str) -> Option<String> {
    None
}

fn nothing_exists(_: &Path) -> bool {
    false
}

#[test]
fn parses_libdefaults_and_realms() {
    let config = Krb5Config::parse(SAMPLE_KRB5_CONF);
    assert_eq!(config.default_realm.as_deref(), Some("EXAMPLE.COM"));
    assert!(!config.dns_lookup_kdc);
    assert_eq!(
        config.kdcs_for("EXAMPLE.COM"),
        ["kdc1.example.com", "kdc2.example.com:88"]
    );
    assert_eq!(
        config.realms["EXAMPLE.COM"].admin_server,
        vec!["admin.example.com".to_string()]
    );
    assert!(config.kdcs_for("OTHER.ORG").is_empty());
}

#[test]
fn nested_blocks_do_not_leak_into_realm() {
    let config = Krb5Config::parse(SAMPLE_KRB5_CONF);
    assert_eq!(config.realms.len(), 1);
    assert_eq!(config.realms["EXAMPLE.COM"].kdc.len(), 2);
}

#[test]
fn parses_quoted_values_and_comments() {
    let config = Krb5Config::parse(
        "; comment\n[libdefaults]\n default_realm = \"CORP.LOCAL\"\n dns_lookup_kdc = yes\n",
    );
    assert_eq!(config.default_realm.as_deref(), Some("CORP.LOCAL"));
    assert!(config.dns_lookup_kdc);
    assert!(config.realms.is_empty());
}

#[test]
fn missing_default_realm_parses_as_none() {
    let config = Krb5Config::parse("[realms]\n A.COM = {\n kdc = a\n }\n");
    assert_eq!(config.default_realm, None);
    assert_eq!(config.kdcs_for("A.COM"), ["a"]);
}

#[test]
fn explicit_path_wins_without_consulting_env() {
    let consulted = Cell::new(false);
    let path = resolve_krb5_config_path(
        "/opt/kerberos/krb5.conf",
        |_| {
            consulted.set(true);
            Some("/from/env".into())
        },
        nothing_exists,
    )
    .unwrap();
    assert_eq!(path, PathBuf::from("/opt/kerberos/krb5.conf"));
    assert!(!consulted.get());
}

#[test]
fn explicit_path_with_traversal_is_rejected() {
    let err =
        resolve_krb5_config_path("/etc/../tmp/krb5.conf", no_env, nothing_exists).unwrap_err();
    assert!(matches!(err, ProxyAuthError::Krb5PathTraversal(_)));
    assert!(
        err.to_string()
            .starts_with("invalid krb5 config path: path traversal detected")
    );
}

#[test]
fn env_variable_is_used_when_no_explicit_path() {
    let path = resolve_krb5_config_path(
        "",
        |key| (key == KRB5_CONFIG_ENV).then(|| "/custom/krb5.conf".to_string()),
        nothing_exists,
    )
    .unwrap();
    assert_eq!(path, PathBuf::from("/custom/krb5.conf"));
}

#[test]
fn empty_env_variable_is_ignored() {
    let path =
        resolve_krb5_config_path("", |_| Some(String::new()), nothing_exists).unwrap();
    assert_eq!(path, PathBuf::from(DEFAULT_KRB5_CONFIG));
}

#[test]
fn first_existing_platform_path_is_chosen() {
    let candidates = platform_search_paths();
    assert!(candidates.len() >= 2);
    let target = candidates[1].clone();

    let path = resolve_krb5_config_path("", no_env, |p| p == target.as_path()).unwrap();
    assert_eq!(path, target);
}

#[test]
fn falls_back_to_default_path() {
    let path = resolve_krb5_config_path("", no_env, nothing_exists).unwrap();
    assert_eq!(path, PathBuf::from(DEFAULT_KRB5_CONFIG));
}
