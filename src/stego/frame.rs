//! # 消息帧模块
//!
//! ## 设计思路
//!
//! 帧格式固定为 `~~~ || UTF-8 消息 || ~~~`，与既有产物保持逐位兼容：
//!
//! ```text
//! [3 bytes] "~~~"
//! [N bytes] 消息的 UTF-8 编码
//! [3 bytes] "~~~"
//! ```
//!
//! 每个字节按大端顺序（最高位在前）展开为 8 位。
//! 解码端没有长度信息，只能在整张图的比特流中查找首尾分隔符。
//!
//! ## 实现思路
//!
//! - `MessageBits` 惰性地产生帧比特，嵌入时无需分配整段比特数组。
//! - `pack_bytes` 将任意比特流按 8 位一组还原字节，尾部不足 8 位的部分直接丢弃。
//! - `locate_payload` 取第一个分隔符之后、最后一个分隔符之前的文本。

use super::config::DELIMITER;

/// 构造完整消息帧字节。
pub fn frame_message(message: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(message.len() + DELIMITER.len() * 2);
    frame.extend_from_slice(DELIMITER.as_bytes());
    frame.extend_from_slice(message.as_bytes());
    frame.extend_from_slice(DELIMITER.as_bytes());
    frame
}

/// 消息帧的比特数（含两端分隔符）。
pub fn framed_bit_len(message: &str) -> u64 {
    (message.len() as u64 + DELIMITER.len() as u64 * 2) * 8
}

/// 按字节顺序、最高位优先产生比特的迭代器。
pub struct MessageBits<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> MessageBits<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }
}

impl Iterator for MessageBits<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.position / 8)?;
        let shift = 7 - (self.position % 8);
        self.position += 1;
        Some((byte >> shift) & 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len() * 8 - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MessageBits<'_> {}

/// 将比特流按 8 位一组（最高位优先）还原为字节。
///
/// 尾部不足 8 位的比特被丢弃。
pub fn pack_bytes<I>(bits: I) -> Vec<u8>
where
    I: IntoIterator<Item = u8>,
{
    let bits = bits.into_iter();
    let mut bytes = Vec::with_capacity(bits.size_hint().0 / 8);
    let mut current = 0u8;
    let mut filled = 0u8;

    for bit in bits {
        current = (current << 1) | (bit & 1);
        filled += 1;
        if filled == 8 {
            bytes.push(current);
            current = 0;
            filled = 0;
        }
    }

    bytes
}

/// 在解码文本中定位消息正文。
///
/// 需要同时存在“首个分隔符”和位于其后的“最后一个分隔符”，
/// 只出现一次（或相互重叠）视为没有消息。
pub fn locate_payload(text: &str) -> Option<&str> {
    let first = text.find(DELIMITER)?;
    let last = text.rfind(DELIMITER)?;
    let start = first + DELIMITER.len();

    if last < start {
        return None;
    }

    Some(&text[start..last])
}
