/// 内部导出的模块
mod internal;

#[cfg(test)]
mod tests;

/// 分片并发下载
pub mod download {
    use crate::internal;
    pub use internal::download::structs::*;
    pub use internal::download::traits::*;
}

/// 字节区间规划
pub mod range {
    pub use crate::internal::range::*;
}

/// 进度上报与追踪
pub mod progress {
    pub use crate::internal::progress::*;
}

/// 代理认证：Basic 与 SPNEGO
pub mod proxy_auth {
    use crate::internal;
    pub use internal::proxy_auth::factory::*;
    pub use internal::proxy_auth::structs::*;
    pub use internal::proxy_auth::traits::*;

    /// krb5 配置与 Kerberos 后端接口，自定义后端时使用
    pub mod krb5 {
        pub use crate::internal::proxy_auth::krb5::*;
    }
}

/// HTTP 传输层，对外提供以便调用方注入自己的实现
pub mod transport {
    use crate::internal;
    pub use internal::transport::client_factory::*;
    pub use internal::transport::structs::*;
    pub use internal::transport::traits::*;
}
