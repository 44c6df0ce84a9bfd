//! sec AEAD 模块
//!
//! 基于 XChaCha20-Poly1305（24 字节 nonce，16 字节 tag），
//! 不使用附加认证数据（AAD）。
//!
//! 安全约束：
//! - 同一密钥下 nonce 严禁复用，由调用方的 `NonceSequence` 保证
//! - 认证未通过前不输出任何明文
//! - 解密失败一律返回 `Authentication`，不区分密码错误与数据损坏

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use zeroize::Zeroizing;

use crate::error::SecError;
use crate::format::header::BASE_NONCE_SIZE;

/// Poly1305 认证标签长度
pub const TAG_SIZE: usize = 16;

/// 单个流使用的 AEAD 实例
pub struct ChunkCipher {
    cipher: XChaCha20Poly1305,
}

impl ChunkCipher {
    /// 密钥长度不是 32 字节时返回配置错误
    pub fn new(key: &[u8]) -> Result<Self, SecError> {
        let cipher = XChaCha20Poly1305::new_from_slice(key)
            .map_err(|_| SecError::Config(format!("invalid key length: {}", key.len())))?;
        Ok(Self { cipher })
    }

    /// 返回 `ciphertext || tag`
    pub fn seal(
        &self,
        nonce: &[u8; BASE_NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, SecError> {
        self.cipher
            .encrypt(XNonce::from_slice(nonce), plaintext)
            .map_err(|_| SecError::Internal)
    }

    pub fn open(
        &self,
        nonce: &[u8; BASE_NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, SecError> {
        self.cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| SecError::Authentication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_key() {
        assert!(matches!(ChunkCipher::new(&[0u8; 16]), Err(SecError::Config(_))));
    }

    #[test]
    fn sealed_length_is_plaintext_plus_tag() {
        let cipher = ChunkCipher::new(&[1u8; 32]).expect("cipher");
        let nonce = [2u8; BASE_NONCE_SIZE];

        assert_eq!(cipher.seal(&nonce, b"").expect("seal").len(), TAG_SIZE);
        assert_eq!(cipher.seal(&nonce, b"hello").expect("seal").len(), 5 + TAG_SIZE);
    }

    #[test]
    fn open_with_other_nonce_fails() {
        let cipher = ChunkCipher::new(&[1u8; 32]).expect("cipher");
        let sealed = cipher.seal(&[2u8; BASE_NONCE_SIZE], b"payload").expect("seal");

        let result = cipher.open(&[3u8; BASE_NONCE_SIZE], &sealed);
        assert!(matches!(result, Err(SecError::Authentication)));
    }
}
