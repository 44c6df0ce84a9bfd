//! sec v1 容器格式：Header + 分块密文流。

pub mod header;
pub mod stream;
