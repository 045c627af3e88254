//! # LSB 嵌入与提取模块
//!
//! ## 设计思路
//!
//! 只负责“比特 ↔ 像素通道最低位”的纯内存变换，不做任何 I/O。
//! 遍历顺序是兼容契约的一部分，必须固定：
//!
//! ```text
//! 行 0: 像素(0,0) R G B → 像素(1,0) R G B → … → 像素(W-1,0)
//! 行 1: 像素(0,1) R G B → …
//! ```
//!
//! RGBA 图片的 alpha 通道既不写入也不读取。
//!
//! ## 实现思路
//!
//! - 容量在嵌入前由调用方校验；这里遇到比特未写完会返回 `CapacityExceeded`，
//!   作为最后一道保护。
//! - 提取通过 `LsbBits` 惰性迭代整张图片，交给 `frame::pack_bytes` 重组字节。

use super::config::EMBED_CHANNELS;
use super::{PixelImage, StegoError};

/// 将比特依次写入像素通道的最低位，返回写入的比特数。
pub fn embed_bits<I>(image: &mut PixelImage, bits: I) -> Result<u64, StegoError>
where
    I: IntoIterator<Item = u8>,
{
    let capacity = image.capacity_bits();
    let channels = image.channels();
    let mut bits = bits.into_iter().peekable();
    let mut written = 0u64;

    'pixels: for pixel in image.pixels_mut().chunks_exact_mut(channels) {
        for channel in pixel.iter_mut().take(EMBED_CHANNELS) {
            match bits.next() {
                Some(bit) => {
                    *channel = (*channel & !1) | (bit & 1);
                    written += 1;
                }
                None => break 'pixels,
            }
        }
    }

    if bits.peek().is_some() {
        let remaining = bits.count() as u64;
        return Err(StegoError::CapacityExceeded {
            required_bits: written + remaining,
            available_bits: capacity,
        });
    }

    Ok(written)
}

/// 逐通道读取最低位的惰性比特流。
pub struct LsbBits<'a> {
    pixels: &'a [u8],
    channels: usize,
    index: usize,
}

impl<'a> LsbBits<'a> {
    pub fn new(image: &'a PixelImage) -> Self {
        Self {
            pixels: image.pixels(),
            channels: image.channels(),
            index: 0,
        }
    }
}

impl Iterator for LsbBits<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let pixel = self.index / EMBED_CHANNELS;
        let channel = self.index % EMBED_CHANNELS;
        let value = *self.pixels.get(pixel * self.channels + channel)?;
        self.index += 1;
        Some(value & 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.pixels.len() / self.channels * EMBED_CHANNELS;
        let remaining = total.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LsbBits<'_> {}
