//! 密码学原语：KDF、AEAD 与分块 nonce。

pub mod aead;
pub mod kdf;
pub mod nonce;
