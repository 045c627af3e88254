//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入”和“流水线中间结果”解耦：
//! - `RawCarrier` 表示已读取但未解码的载体字节
//! - `PixelImage` 表示通过边界校验的像素网格（行优先，8 位 RGB/RGBA）
//! - `EncodeReport` / `HiddenMessage` 表示编码、解码的最终结果
//!
//! 像素网格只能通过 `from_raw` / `from_dynamic` 构造，
//! 通道数、位深与缓冲长度在构造时一次性校验，后续嵌入逻辑不再重复判断。

use std::fmt;
use std::path::PathBuf;

use image::{DynamicImage, ImageBuffer, Rgb, Rgba};

use super::StegoError;
use super::config::EMBED_CHANNELS;

/// 解码结果为空时展示给用户的固定文案。
pub const NO_HIDDEN_MESSAGE: &str = "No hidden message found.";

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawCarrier {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: String,
    /// 是否为有损格式（需要先转存为 PNG）。
    pub(crate) lossy: bool,
}

/// 行优先的像素网格，每个像素 3（RGB）或 4（RGBA）个 8 位通道。
///
/// 嵌入只触碰前 3 个通道，alpha 通道原样保留。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    channels: usize,
    pixels: Vec<u8>,
}

impl PixelImage {
    /// 从交错排列的原始通道数据构造像素网格。
    ///
    /// # 示例
    /// ```rust
    /// use image_inspector::stego::PixelImage;
    ///
    /// let image = PixelImage::from_raw(2, 1, 3, vec![0; 6])?;
    /// assert_eq!(image.capacity_bits(), 6);
    /// # Ok::<(), image_inspector::stego::StegoError>(())
    /// ```
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: usize,
        pixels: Vec<u8>,
    ) -> Result<Self, StegoError> {
        if !(EMBED_CHANNELS..=4).contains(&channels) {
            return Err(StegoError::UnsupportedSource(format!(
                "expected 3 or 4 channels per pixel, found {}",
                channels
            )));
        }

        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(channels))
            .ok_or_else(|| StegoError::ResourceLimit("image dimensions overflow".to_string()))?;

        if pixels.len() != expected_len {
            return Err(StegoError::UnsupportedSource(format!(
                "pixel buffer does not match dimensions: {}x{}x{} needs {} bytes, found {}",
                width,
                height,
                channels,
                expected_len,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    /// 从 `image` 解码结果构造，仅接受 8 位 RGB / RGBA。
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, StegoError> {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageRgb8(buffer) => Self::from_raw(width, height, 3, buffer.into_raw()),
            DynamicImage::ImageRgba8(buffer) => Self::from_raw(width, height, 4, buffer.into_raw()),
            other => Err(StegoError::UnsupportedSource(format!(
                "expected an 8-bit RGB/RGBA image, found {:?}",
                other.color()
            ))),
        }
    }

    /// 转回 `DynamicImage`，用于 PNG 编码落盘。
    pub fn into_dynamic(self) -> Result<DynamicImage, StegoError> {
        let (width, height) = (self.width, self.height);
        let image = match self.channels {
            3 => ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(width, height, self.pixels)
                .map(DynamicImage::ImageRgb8),
            4 => ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(width, height, self.pixels)
                .map(DynamicImage::ImageRgba8),
            _ => None,
        };

        image.ok_or_else(|| StegoError::Encode("pixel buffer length mismatch".to_string()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// 交错排列的通道数据（行优先）。
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// 单个像素的全部通道，越界返回 `None`。
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * self.channels;
        self.pixels.get(start..start + self.channels)
    }

    /// 可嵌入的总位数：`width * height * 3`。
    pub fn capacity_bits(&self) -> u64 {
        self.width as u64 * self.height as u64 * EMBED_CHANNELS as u64
    }
}

/// 编码成功后的结果。
#[derive(Debug, Clone, serde::Serialize)]
pub struct EncodeReport {
    /// 最终写入的输出文件路径（已去重）。
    pub output_path: PathBuf,
    /// 实际写入的消息帧位数（含两端分隔符）。
    pub embedded_bits: u64,
    /// 载体图片总容量（位）。
    pub capacity_bits: u64,
}

impl fmt::Display for EncodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Message encoded successfully. Output image saved to {}",
            self.output_path.display()
        )
    }
}

/// 解码结果：找到消息，或明确“没有隐藏消息”。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HiddenMessage {
    Found(String),
    NotFound,
}

impl HiddenMessage {
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Found(message) => Some(message),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl fmt::Display for HiddenMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(message) => f.write_str(message),
            Self::NotFound => f.write_str(NO_HIDDEN_MESSAGE),
        }
    }
}
