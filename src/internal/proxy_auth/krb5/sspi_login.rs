//! 基于 sspi 的 Kerberos 后端。
//!
//! 登录时取得一次凭据句柄，之后每个令牌只做一次安全上下文初始化。

use std::sync::Arc;
use std::thread;

use sspi::network_client::reqwest_network_client::ReqwestNetworkClient;
use sspi::{
    AuthIdentity, BufferType, ClientRequestFlags, CredentialUse, Credentials,
    DataRepresentation, Kerberos, KerberosConfig, SecurityBuffer, Sspi, SspiImpl,
    Username,
};
use tracing::debug;
use url::Url;

use super::kerberos::{KerberosError, KerberosLogin, KerberosSession, LoginRequest};

/// 默认 KDC 端口
const KDC_PORT: u16 = 88;

#[derive(Debug, Default, Clone, Copy)]
pub struct SspiLogin;

impl KerberosLogin for SspiLogin {
    fn login(
        &self,
        request: &LoginRequest<'_>,
    ) -> Result<Arc<dyn KerberosSession>, KerberosError> {
        let kdc_url = match request.config.kdcs_for(request.realm).first() {
            Some(kdc) => Some(kdc_url(kdc)?),
            None if request.config.dns_lookup_kdc => None,
            None => return Err(KerberosError::NoKdc(request.realm.to_string())),
        };

        let principal = request.principal();
        let credentials = acquire_credentials(&principal, request.password, kdc_url.clone())?;
        let session = SspiSession {
            principal,
            kdc_url,
            credentials,
        };

        // 立即为目标服务申请一次票据，凭据或 KDC 有误时在构造阶段失败
        session.negotiation_token(request.service_principal)?;
        debug!(principal = %session.principal, "Kerberos login succeeded");
        Ok(Arc::new(session))
    }
}

fn kdc_url(kdc: &str) -> Result<Url, KerberosError> {
    let with_scheme = if kdc.contains("://") {
        kdc.to_string()
    } else if kdc.contains(':') {
        format!("tcp://{kdc}")
    } else {
        format!("tcp://{kdc}:{KDC_PORT}")
    };
    Url::parse(&with_scheme)
        .map_err(|e| KerberosError::Backend(format!("invalid KDC address {kdc}: {e}")))
}

type KerberosCredentials = <Kerberos as SspiImpl>::CredentialsHandle;

/// 登录后的会话，只持有 sspi 凭据句柄，不保留明文密码。
struct SspiSession {
    principal: String,
    kdc_url: Option<Url>,
    credentials: KerberosCredentials,
}

impl KerberosSession for SspiSession {
    /// 调用方已在阻塞线程池中；sspi 的阻塞网络客户端不能在 tokio 运行时上下文里使用，
    /// 因此仍在独立线程上完成票据交换。
    fn negotiation_token(&self, spn: &str) -> Result<Vec<u8>, KerberosError> {
        let credentials = self.credentials.clone();
        let kdc_url = self.kdc_url.clone();
        let spn = spn.to_string();

        thread::spawn(move || security_context_token(credentials, kdc_url, &spn))
            .join()
            .map_err(|_| KerberosError::Backend("Kerberos worker thread panicked".into()))?
    }
}

fn backend_error(e: impl std::fmt::Display) -> KerberosError {
    KerberosError::Backend(e.to_string())
}

fn new_client(kdc_url: Option<Url>) -> Result<Kerberos, KerberosError> {
    let config = KerberosConfig {
        kdc_url,
        client_computer_name: None,
    };
    Kerberos::new_client_from_config(config).map_err(backend_error)
}

fn acquire_credentials(
    principal: &str,
    password: &str,
    kdc_url: Option<Url>,
) -> Result<KerberosCredentials, KerberosError> {
    let mut kerberos = new_client(kdc_url)?;
    let identity = AuthIdentity {
        username: Username::parse(principal).map_err(backend_error)?,
        password: password.to_string().into(),
    };
    let credentials = Credentials::AuthIdentity(identity);

    let acquired = kerberos
        .acquire_credentials_handle()
        .with_credential_use(CredentialUse::Outbound)
        .with_auth_data(&credentials)
        .execute(&mut kerberos)
        .map_err(backend_error)?;
    Ok(acquired.credentials_handle)
}

/// 用已取得的凭据句柄为 `spn` 生成一次 SPNEGO 令牌。
fn security_context_token(
    mut credentials: KerberosCredentials,
    kdc_url: Option<Url>,
    spn: &str,
) -> Result<Vec<u8>, KerberosError> {
    let mut kerberos = new_client(kdc_url)?;

    let mut output = vec![SecurityBuffer::new(Vec::new(), BufferType::Token)];
    let mut builder = kerberos
        .initialize_security_context()
        .with_credentials_handle(&mut credentials)
        .with_context_requirements(ClientRequestFlags::MUTUAL_AUTH)
        .with_target_data_representation(DataRepresentation::Native)
        .with_target_name(spn)
        .with_output(&mut output);

    let mut network_client = ReqwestNetworkClient;
    kerberos
        .initialize_security_context_impl(&mut builder)
        .map_err(backend_error)?
        .resolve_with_client(&mut network_client)
        .map_err(backend_error)?;

    output
        .into_iter()
        .next()
        .map(|buffer| buffer.buffer)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| KerberosError::Backend("empty SPNEGO token".into()))
}
