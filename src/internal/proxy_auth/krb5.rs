//! Kerberos 支撑：krb5 配置文件的定位与解析，以及登录/令牌后端接口。

pub mod kerberos;
pub mod krb5_config;
#[cfg(feature = "sspi")]
pub mod sspi_login;

pub use kerberos::{
    KerberosError, KerberosLogin, KerberosSession, LoginRequest, UnsupportedLogin,
    default_login,
};
pub use krb5_config::{
    DEFAULT_KRB5_CONFIG, KRB5_CONFIG_ENV, Krb5Config, RealmConfig,
    platform_search_paths, resolve_krb5_config_path,
};
#[cfg(feature = "sspi")]
pub use sspi_login::SspiLogin;
