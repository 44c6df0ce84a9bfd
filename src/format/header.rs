//! sec v1 Header 实现
//!
//! Header 是容器的前 56 个字节，明文存储（salt 与 nonce 均不是秘密）：
//!
//! ```text
//! offset  size  field
//! 0       32    salt
//! 32      24    base_nonce
//! 56      ...   chunk 序列
//! ```
//!
//! 没有 magic、版本号和 chunk_size 字段，所有参数都是格式的固定约定。
//! 解密前必须完整读取 Header，长度不足即拒绝继续处理。

use std::io::{self, Read, Write};

use rand::{RngCore, rngs::OsRng};

use crate::error::SecError;

/// KDF 使用的 salt 长度（字节）
pub const SALT_SIZE: usize = 32;

/// XChaCha20-Poly1305 base nonce 长度（字节）
pub const BASE_NONCE_SIZE: usize = 24;

/// Header 固定大小
pub const HEADER_SIZE: usize = SALT_SIZE + BASE_NONCE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub salt: [u8; SALT_SIZE],
    pub base_nonce: [u8; BASE_NONCE_SIZE],
}

impl Header {
    /// 为一次新的加密生成随机 salt 与 base nonce
    pub fn generate() -> Result<Self, SecError> {
        let mut salt = [0u8; SALT_SIZE];
        let mut base_nonce = [0u8; BASE_NONCE_SIZE];

        OsRng.try_fill_bytes(&mut salt).map_err(io::Error::other)?;
        OsRng
            .try_fill_bytes(&mut base_nonce)
            .map_err(io::Error::other)?;

        Ok(Self { salt, base_nonce })
    }

    /// 按 salt、base_nonce 的顺序写入
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), SecError> {
        writer.write_all(&self.salt)?;
        writer.write_all(&self.base_nonce)?;
        Ok(())
    }

    /// 读取 Header，不足 56 字节时返回 `Format("truncated header")`
    pub fn read<R: Read>(mut reader: R) -> Result<Self, SecError> {
        let mut salt = [0u8; SALT_SIZE];
        read_field(&mut reader, &mut salt)?;

        let mut base_nonce = [0u8; BASE_NONCE_SIZE];
        read_field(&mut reader, &mut base_nonce)?;

        Ok(Self { salt, base_nonce })
    }
}

fn read_field<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), SecError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => SecError::Format("truncated header"),
        _ => SecError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_preserves_layout() {
        let header = Header {
            salt: [0x11; SALT_SIZE],
            base_nonce: [0x22; BASE_NONCE_SIZE],
        };

        let mut bytes = Vec::new();
        header.write(&mut bytes).expect("write header");

        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[..SALT_SIZE], &[0x11; SALT_SIZE]);
        assert_eq!(&bytes[SALT_SIZE..], &[0x22; BASE_NONCE_SIZE]);

        let parsed = Header::read(bytes.as_slice()).expect("read header");
        assert_eq!(parsed, header);
    }

    #[test]
    fn every_short_header_is_a_format_error() {
        let bytes = [0u8; HEADER_SIZE];
        for len in 0..HEADER_SIZE {
            let result = Header::read(&bytes[..len]);
            assert!(
                matches!(result, Err(SecError::Format("truncated header"))),
                "length {len} should be rejected"
            );
        }
    }

    #[test]
    fn read_consumes_exactly_the_header() {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes.extend_from_slice(b"rest");

        let mut reader = bytes.as_slice();
        Header::read(&mut reader).expect("read header");
        assert_eq!(reader, b"rest");
    }

    #[test]
    fn generated_headers_differ() {
        let a = Header::generate().expect("generate a");
        let b = Header::generate().expect("generate b");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.base_nonce, b.base_nonce);
    }
}
