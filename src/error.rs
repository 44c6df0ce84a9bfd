use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Header 或 chunk 长度不足
    #[error("invalid format: {0}")]
    Format(&'static str),

    /// 密码错误与数据被篡改在密码学上无法区分，统一为同一个错误
    #[error("bad password or corrupt data")]
    Authentication,

    /// KDF 参数或密钥长度错误，正确构建下不应出现
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("chunk counter exhausted, refusing to reuse a nonce")]
    NonceExhausted,

    #[error("internal error")]
    Internal,
}
