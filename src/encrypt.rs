//! sec 加密流程实现
//!
//! 加密流程（严格顺序）：
//! 1. 生成 salt 与 base_nonce
//! 2. 写入 Header
//! 3. 使用 KDF 从口令派生 AEAD key
//! 4. 使用 StreamEncryptor 对输入进行流式加密
//!
//! 注意：
//! - 流接口不负责原子写入，文件接口通过 `fs::atomic` 完成
//! - 不做 UI / 口令输入

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::crypto::kdf::{self, KdfParams};
use crate::error::SecError;
use crate::format::header::Header;
use crate::format::stream::StreamEncryptor;
use crate::fs::atomic::write_atomic;

/// 将 source 中的全部数据加密写入 sink
pub fn encrypt_stream<R: Read, W: Write>(
    source: R,
    mut sink: W,
    passphrase: &[u8],
) -> Result<(), SecError> {
    // ---------- Header ----------
    let header = Header::generate()?;
    header.write(&mut sink)?;

    // ---------- KDF 派生密钥 ----------
    let key = kdf::derive_key(passphrase, &header.salt, &KdfParams::V1)?;

    // ---------- Stream 加密 ----------
    let mut encryptor = StreamEncryptor::new(&key[..], header.base_nonce)?;
    let chunks = encryptor.encrypt(source, &mut sink)?;

    sink.flush()?;

    debug!(chunks, "encryption finished");
    Ok(())
}

/// 加密文件，成功后原子替换 output
///
/// input 与 output 可以是同一路径（原地加密）。
pub fn encrypt_file(input: &Path, output: &Path, passphrase: &[u8]) -> Result<(), SecError> {
    debug!(input = %input.display(), output = %output.display(), "encrypting file");

    write_atomic(output, |tmp| {
        let reader = BufReader::new(File::open(input)?);
        encrypt_stream(reader, BufWriter::new(tmp), passphrase)
    })
}
