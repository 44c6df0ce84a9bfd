//! sec 解密流程实现
//!
//! 解密流程（严格顺序）：
//! 1. 读取 Header（salt + base_nonce）
//! 2. 使用 Header 中的 salt + 口令派生 AEAD key
//! 3. 使用 StreamDecryptor 流式解密剩余数据
//!
//! 注意：
//! - Header 或任一 chunk 校验失败，必须立即报错
//! - 失败时 sink 中可能已有部分明文，调用方必须将其视为无效输出

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::crypto::kdf::{self, KdfParams};
use crate::error::SecError;
use crate::format::header::Header;
use crate::format::stream::StreamDecryptor;
use crate::fs::atomic::write_atomic;

/// 将 source 中的容器解密写入 sink
pub fn decrypt_stream<R: Read, W: Write>(
    mut source: R,
    mut sink: W,
    passphrase: &[u8],
) -> Result<(), SecError> {
    // ---------- 读取 Header ----------
    let header = Header::read(&mut source)?;

    // ---------- KDF 派生密钥 ----------
    let key = kdf::derive_key(passphrase, &header.salt, &KdfParams::V1)?;

    // ---------- Stream 解密 ----------
    let mut decryptor = StreamDecryptor::new(&key[..], header.base_nonce)?;
    let chunks = decryptor.decrypt(source, &mut sink)?;

    sink.flush()?;

    debug!(chunks, "decryption finished");
    Ok(())
}

/// 解密文件，全部 chunk 认证通过后才原子替换 output
pub fn decrypt_file(input: &Path, output: &Path, passphrase: &[u8]) -> Result<(), SecError> {
    debug!(input = %input.display(), output = %output.display(), "decrypting file");

    write_atomic(output, |tmp| {
        let reader = BufReader::new(File::open(input)?);
        decrypt_stream(reader, BufWriter::new(tmp), passphrase)
    })
}
