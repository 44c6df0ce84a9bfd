//! sec 密钥派生函数（KDF）模块
//!
//! 本模块负责将用户输入的口令，通过 Argon2id 算法
//! 派生为 32 字节对称密钥，供 XChaCha20-Poly1305 使用。
//!
//! 设计约束：
//! - KDF 参数不写入文件，是格式的隐式约定
//! - 参数固定为 `KdfParams::V1`，修改即破坏与旧密文的兼容性
//! - 派生出的密钥在离开作用域后自动清零
//! - salt 直接使用 Header 中的 32 个原始字节

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

use crate::error::SecError;
use crate::format::header::SALT_SIZE;

/// 派生密钥长度（256-bit）
pub const KEY_LEN: usize = 32;

/// Argon2id 参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// 内存成本（KiB）
    pub mem_cost_kib: u32,
    /// 时间成本（迭代次数）
    pub time_cost: u32,
    /// 并行度（lanes）
    pub parallelism: u32,
}

impl KdfParams {
    /// 格式 v1 的固定参数：64 MiB、1 次迭代、4 lanes
    pub const V1: Self = Self {
        mem_cost_kib: 64 * 1024,
        time_cost: 1,
        parallelism: 4,
    };

    fn to_argon2(self) -> Result<Params, SecError> {
        Params::new(
            self.mem_cost_kib,
            self.time_cost,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| SecError::Config(format!("invalid Argon2id params: {e}")))
    }
}

/// 根据口令和 salt 派生对称加密密钥
///
/// 相同 (passphrase, salt) 必然得到相同密钥。
/// 参数非法或内部失败属于配置错误，而不是数据错误。
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; SALT_SIZE],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, SecError> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);

    argon2
        .hash_password_into(passphrase, salt, &mut key[..])
        .map_err(|e| SecError::Config(format!("Argon2id KDF failed: {e}")))?;

    Ok(key)
}
