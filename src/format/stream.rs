//! sec v1 Stream 实现
//!
//! Header 之后紧跟 chunk 序列，没有长度前缀，也没有结束标记：
//!
//! ```text
//! [chunk 0: ciphertext || tag][chunk 1: ...]...[最后一个 chunk]
//! ```
//!
//! - 明文按 64 KiB 分块，每块独立 seal，密文长度 = 明文长度 + 16
//! - 除最后一块外，每块都是满的；流结束以输入耗尽为准
//! - 第 i 块使用 base_nonce 计数器 + i 作为 nonce，不使用 AAD
//! - 解密必须严格按顺序进行，任一块失败立即终止
//! - 本模块不负责 Header、KDF 与原子写入

use std::io::{self, Read, Write};

use tracing::trace;
use zeroize::Zeroizing;

use crate::crypto::aead::{ChunkCipher, TAG_SIZE};
use crate::crypto::nonce::NonceSequence;
use crate::error::SecError;
use crate::format::header::BASE_NONCE_SIZE;

/// 明文 chunk 大小：64 KiB
pub const CHUNK_SIZE: usize = 64 * 1024;

/// 满 chunk 的密文大小
pub const ENCRYPTED_CHUNK_SIZE: usize = CHUNK_SIZE + TAG_SIZE;

/// 流式加密器
pub struct StreamEncryptor {
    cipher: ChunkCipher,
    nonces: NonceSequence,
}

impl StreamEncryptor {
    /// - key: 32 字节 AEAD 密钥（来自 KDF）
    /// - base_nonce: Header 中的 base nonce
    pub fn new(key: &[u8], base_nonce: [u8; BASE_NONCE_SIZE]) -> Result<Self, SecError> {
        Ok(Self {
            cipher: ChunkCipher::new(key)?,
            nonces: NonceSequence::new(base_nonce),
        })
    }

    /// 从 reader 读取明文直至耗尽，加密后写入 writer
    ///
    /// 返回写出的 chunk 数。空输入不产生任何 chunk。
    pub fn encrypt<R: Read, W: Write>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> Result<u64, SecError> {
        let mut buffer = Zeroizing::new(vec![0u8; CHUNK_SIZE]);

        loop {
            let read_len = read_chunk(&mut reader, &mut buffer)?;
            if read_len == 0 {
                break;
            }

            let ciphertext = self.cipher.seal(self.nonces.current()?, &buffer[..read_len])?;
            writer.write_all(&ciphertext)?;

            trace!(chunk = self.nonces.processed(), len = read_len, "sealed chunk");
            self.nonces.advance();
        }

        Ok(self.nonces.processed())
    }
}

/// 流式解密器
pub struct StreamDecryptor {
    cipher: ChunkCipher,
    nonces: NonceSequence,
}

impl StreamDecryptor {
    pub fn new(key: &[u8], base_nonce: [u8; BASE_NONCE_SIZE]) -> Result<Self, SecError> {
        Ok(Self {
            cipher: ChunkCipher::new(key)?,
            nonces: NonceSequence::new(base_nonce),
        })
    }

    /// 从 reader 读取密文直至耗尽，解密后写入 writer
    ///
    /// 输入恰好在 chunk 边界结束视为成功。
    /// 末尾不足 16 字节的残块返回 `Format("truncated ciphertext")`。
    pub fn decrypt<R: Read, W: Write>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> Result<u64, SecError> {
        let mut buffer = vec![0u8; ENCRYPTED_CHUNK_SIZE];

        loop {
            let read_len = read_chunk(&mut reader, &mut buffer)?;
            if read_len == 0 {
                break;
            }
            if read_len < TAG_SIZE {
                return Err(SecError::Format("truncated ciphertext"));
            }

            let plaintext = self.cipher.open(self.nonces.current()?, &buffer[..read_len])?;
            writer.write_all(&plaintext)?;

            trace!(chunk = self.nonces.processed(), len = plaintext.len(), "opened chunk");
            self.nonces.advance();
        }

        Ok(self.nonces.processed())
    }
}

/// 尽量填满 buf，只有输入耗尽时才返回不足的长度
///
/// 管道可能一次只给出部分数据，必须合并，否则两端分块会错位。
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
