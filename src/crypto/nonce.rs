//! 分块 nonce 管理
//!
//! 每个 chunk 的 nonce = base_nonce，但最后 8 字节视为小端 u64 计数器，
//! 每处理完一个 chunk 加 1。
//!
//! 计数器本身按 2^64 取模回绕（与已有密文逐字节兼容），
//! 真正防止 nonce 复用的是 `NonceSequence` 对已处理 chunk 数的计数：
//! 处理满 2^64 个 chunk 后，后续 chunk 一律拒绝。

use crate::error::SecError;
use crate::format::header::BASE_NONCE_SIZE;

/// 计数器在 nonce 中的起始偏移
const COUNTER_OFFSET: usize = BASE_NONCE_SIZE - 8;

/// 原地将 nonce 的计数器部分加 1
pub fn increment_nonce(nonce: &mut [u8; BASE_NONCE_SIZE]) {
    let counter = &mut nonce[COUNTER_OFFSET..];
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(counter);
    let value = u64::from_le_bytes(bytes).wrapping_add(1);
    counter.copy_from_slice(&value.to_le_bytes());
}

/// 第 `index` 个 chunk 的 nonce，等价于对 base 调用 `index` 次 `increment_nonce`
pub fn nonce_for_chunk(base: &[u8; BASE_NONCE_SIZE], index: u64) -> [u8; BASE_NONCE_SIZE] {
    let mut nonce = *base;
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&nonce[COUNTER_OFFSET..]);
    let value = u64::from_le_bytes(bytes).wrapping_add(index);
    nonce[COUNTER_OFFSET..].copy_from_slice(&value.to_le_bytes());
    nonce
}

/// 单个流内的 nonce 序列
///
/// 只能在 chunk 的加/解密成功之后调用 `advance`。
pub struct NonceSequence {
    current: [u8; BASE_NONCE_SIZE],
    processed: u64,
    exhausted: bool,
}

impl NonceSequence {
    pub fn new(base_nonce: [u8; BASE_NONCE_SIZE]) -> Self {
        Self {
            current: base_nonce,
            processed: 0,
            exhausted: false,
        }
    }

    /// 当前 chunk 应使用的 nonce
    ///
    /// 所有 2^64 个取值都已用过时返回 `NonceExhausted`。
    pub fn current(&self) -> Result<&[u8; BASE_NONCE_SIZE], SecError> {
        if self.exhausted {
            return Err(SecError::NonceExhausted);
        }
        Ok(&self.current)
    }

    /// 标记当前 chunk 已处理，前进到下一个 nonce
    pub fn advance(&mut self) {
        increment_nonce(&mut self.current);
        match self.processed.checked_add(1) {
            Some(processed) => self.processed = processed,
            None => self.exhausted = true,
        }
    }

    /// 已处理的 chunk 数
    pub fn processed(&self) -> u64 {
        self.processed
    }

    #[cfg(test)]
    fn with_processed(base_nonce: [u8; BASE_NONCE_SIZE], processed: u64) -> Self {
        Self {
            current: nonce_for_chunk(&base_nonce, processed),
            processed,
            exhausted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(nonce: &[u8; BASE_NONCE_SIZE]) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&nonce[COUNTER_OFFSET..]);
        u64::from_le_bytes(bytes)
    }

    #[test]
    fn increment_touches_only_trailing_counter() {
        let mut nonce = [0xAAu8; BASE_NONCE_SIZE];
        nonce[COUNTER_OFFSET..].copy_from_slice(&5u64.to_le_bytes());

        increment_nonce(&mut nonce);

        assert_eq!(&nonce[..COUNTER_OFFSET], &[0xAAu8; COUNTER_OFFSET]);
        assert_eq!(counter(&nonce), 6);
    }

    #[test]
    fn increment_is_little_endian() {
        let mut nonce = [0u8; BASE_NONCE_SIZE];
        nonce[COUNTER_OFFSET] = 0xFF;

        increment_nonce(&mut nonce);

        assert_eq!(nonce[COUNTER_OFFSET], 0x00);
        assert_eq!(nonce[COUNTER_OFFSET + 1], 0x01);
    }

    #[test]
    fn increment_wraps_counter_without_touching_prefix() {
        let mut nonce = [0x11u8; BASE_NONCE_SIZE];
        nonce[COUNTER_OFFSET..].copy_from_slice(&u64::MAX.to_le_bytes());

        increment_nonce(&mut nonce);

        assert_eq!(counter(&nonce), 0);
        assert_eq!(&nonce[..COUNTER_OFFSET], &[0x11u8; COUNTER_OFFSET]);
    }

    #[test]
    fn nonce_for_chunk_matches_repeated_increment() {
        let mut base = [0u8; BASE_NONCE_SIZE];
        base[COUNTER_OFFSET..].copy_from_slice(&(u64::MAX - 2).to_le_bytes());

        let mut running = base;
        for index in 0..6 {
            assert_eq!(nonce_for_chunk(&base, index), running);
            increment_nonce(&mut running);
        }
    }

    #[test]
    fn sequence_advances_by_exactly_one() {
        let base = [9u8; BASE_NONCE_SIZE];
        let mut seq = NonceSequence::new(base);
        let start = counter(seq.current().expect("nonce"));

        for i in 1..=4u64 {
            seq.advance();
            assert_eq!(counter(seq.current().expect("nonce")), start.wrapping_add(i));
            assert_eq!(seq.processed(), i);
        }
    }

    #[test]
    fn sequence_refuses_after_all_nonces_used() {
        let base = [0u8; BASE_NONCE_SIZE];
        let mut seq = NonceSequence::with_processed(base, u64::MAX - 1);

        // 第 2^64 - 1 个 chunk
        assert!(seq.current().is_ok());
        seq.advance();
        // 第 2^64 个 chunk，仍是未使用过的 nonce
        assert!(seq.current().is_ok());
        seq.advance();

        assert!(matches!(seq.current(), Err(SecError::NonceExhausted)));
    }
}
