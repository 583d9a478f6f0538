//! krb5.conf 的定位与最小化解析。
//!
//! 只解析 SPNEGO 登录需要的字段：`[libdefaults]` 中的 `default_realm`、`dns_lookup_kdc`，
//! 以及 `[realms]` 中各 realm 的 `kdc` / `admin_server`。其余内容忽略。

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::internal::proxy_auth::structs::ProxyAuthError;

/// 指定 krb5 配置文件的环境变量
pub const KRB5_CONFIG_ENV: &str = "KRB5_CONFIG";

/// 所有候选路径都不存在时的兜底路径
#[cfg(not(windows))]
pub const DEFAULT_KRB5_CONFIG: &str = "/etc/krb5.conf";
#[cfg(windows)]
pub const DEFAULT_KRB5_CONFIG: &str = r"C:\ProgramData\MIT\Kerberos5\krb5.ini";

/// 当前平台上按优先级排列的 krb5 配置候选路径。
pub fn platform_search_paths() -> Vec<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        let mut paths = vec![PathBuf::from("/Library/Preferences/edu.mit.Kerberos")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join("Library/Preferences/edu.mit.Kerberos"));
        }
        paths.extend(
            [
                "/etc/krb5.conf",
                "/usr/local/etc/krb5.conf",
                "/opt/homebrew/etc/krb5.conf",
            ]
            .map(PathBuf::from),
        );
        paths
    }
    #[cfg(windows)]
    {
        [
            r"C:\ProgramData\MIT\Kerberos5\krb5.ini",
            r"C:\Windows\krb5.ini",
        ]
        .map(PathBuf::from)
        .to_vec()
    }
    #[cfg(not(any(target_os = "macos", windows)))]
    {
        [
            "/etc/krb5.conf",
            "/etc/krb5/krb5.conf",
            "/usr/local/etc/krb5.conf",
        ]
        .map(PathBuf::from)
        .to_vec()
    }
}

/// 决定要加载的 krb5 配置文件路径。
///
/// 优先级：显式路径 > `KRB5_CONFIG` 环境变量 > 平台候选路径中第一个存在的 > [`DEFAULT_KRB5_CONFIG`]。
/// 显式路径包含 `..` 时直接拒绝。
///
/// 环境变量读取与文件存在性检查以闭包注入，便于在测试中替换。
pub fn resolve_krb5_config_path<E, X>(
    explicit: &str,
    env_lookup: E,
    exists: X,
) -> Result<PathBuf, ProxyAuthError>
where
    E: Fn(&str) -> Option<String>,
    X: Fn(&Path) -> bool,
{
    if !explicit.is_empty() {
        if explicit.contains("..") {
            return Err(ProxyAuthError::Krb5PathTraversal(explicit.to_string()));
        }
        return Ok(PathBuf::from(explicit));
    }

    if let Some(from_env) = env_lookup(KRB5_CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(from_env));
    }

    Ok(platform_search_paths()
        .into_iter()
        .find(|candidate| exists(candidate))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_KRB5_CONFIG)))
}

/// 单个 realm 的配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RealmConfig {
    pub kdc: Vec<String>,
    pub admin_server: Vec<String>,
}

/// 解析后的 krb5 配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Krb5Config {
    pub default_realm: Option<String>,
    pub dns_lookup_kdc: bool,
    pub realms: BTreeMap<String, RealmConfig>,
}

impl Krb5Config {
    pub fn load(path: &Path) -> Result<Self, io::Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();
        let mut section = String::new();
        let mut current_realm: Option<String> = None;
        let mut depth = 0usize;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if depth == 0 && line.starts_with('[') {
                if let Some(end) = line.find(']') {
                    section = line[1..end].trim().to_ascii_lowercase();
                    current_realm = None;
                }
                continue;
            }

            if line.starts_with('}') {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    current_realm = None;
                }
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if value.starts_with('{') {
                depth += 1;
                if depth == 1 && section == "realms" {
                    config.realms.entry(key.to_string()).or_default();
                    current_realm = Some(key.to_string());
                }
                continue;
            }

            let value = unquote(value);
            match (section.as_str(), depth) {
                ("libdefaults", 0) => match key {
                    "default_realm" => config.default_realm = Some(value.to_string()),
                    "dns_lookup_kdc" => config.dns_lookup_kdc = parse_bool(value),
                    _ => {}
                },
                ("realms", 1) => {
                    if let Some(realm) = &current_realm {
                        let entry = config.realms.entry(realm.clone()).or_default();
                        match key {
                            "kdc" => entry.kdc.push(value.to_string()),
                            "admin_server" => entry.admin_server.push(value.to_string()),
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        config
    }

    /// 指定 realm 配置的 KDC 列表，未配置时为空。
    pub fn kdcs_for(&self, realm: &str) -> &[String] {
        self.realms
            .get(realm)
            .map(|r| r.kdc.as_slice())
            .unwrap_or(&[])
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}
