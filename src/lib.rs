//! sec：基于口令的流式分块加密。
//!
//! 容器格式：32 字节 salt + 24 字节 base nonce，之后是
//! XChaCha20-Poly1305 独立认证的 64 KiB chunk 序列。
//! 对外只有两个流接口，文件接口是其上的原子写入封装。

mod decrypt;
mod encrypt;

pub mod crypto;
pub mod error;
pub mod format;
pub mod fs;

pub use decrypt::{decrypt_file, decrypt_stream};
pub use encrypt::{encrypt_file, encrypt_stream};
pub use error::SecError;
